//! Edit batch construction: per-file, non-overlapping replacement sets,
//! built eagerly and returned as one unit.
//!
//! Offsets always refer to the file's *original* content; application is one
//! atomic substitution pass per file, done by the caller. A failure anywhere
//! during construction discards the whole batch.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::errors::{RefactorError, RefactorResult};
use crate::models::FileStore;

/// One textual replacement against a file's original content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub offset: usize,
    pub length: usize,
    pub text: String,
}

impl TextEdit {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            offset,
            length: 0,
            text: text.into(),
        }
    }

    pub fn replace(offset: usize, length: usize, text: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            text: text.into(),
        }
    }

    pub fn delete(offset: usize, length: usize) -> Self {
        Self::replace(offset, length, "")
    }

    fn overlaps(&self, other: &TextEdit) -> bool {
        self.offset < other.offset + other.length && other.offset < self.offset + self.length
    }
}

/// Edits for one file: the base content they apply to, plus the ordered,
/// non-overlapping replacement set. Created files have an empty base and a
/// single full-content insertion.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FileEdit {
    pub base: String,
    pub edits: Vec<TextEdit>,
}

impl FileEdit {
    /// Render the post-edit content. Edits are applied back to front so
    /// earlier offsets stay valid.
    pub fn apply(&self) -> String {
        let mut result = self.base.clone();
        for edit in self.edits.iter().rev() {
            result.replace_range(edit.offset..edit.offset + edit.length, &edit.text);
        }
        result
    }
}

/// The complete cross-file result of one transformation.
#[derive(Clone, Debug, Default, Serialize)]
pub struct EditBatch {
    pub files: IndexMap<PathBuf, FileEdit>,
}

impl EditBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a replacement for `path`. The first insertion for a file seeds its
    /// edit set with `base`; later insertions must not overlap existing ones.
    pub fn add(&mut self, path: &Path, base: &str, edit: TextEdit) -> RefactorResult<()> {
        let file = self
            .files
            .entry(path.to_path_buf())
            .or_insert_with(|| FileEdit {
                base: base.to_string(),
                edits: Vec::new(),
            });
        if let Some(existing) = file.edits.iter().find(|e| e.overlaps(&edit)) {
            return Err(RefactorError::EditConflict {
                path: path.to_path_buf(),
                detail: format!(
                    "[{}, {}) overlaps [{}, {})",
                    edit.offset,
                    edit.offset + edit.length,
                    existing.offset,
                    existing.offset + existing.length
                ),
            });
        }
        debug!(path = %path.display(), offset = edit.offset, length = edit.length, "edit added");
        let at = file
            .edits
            .partition_point(|e| (e.offset, e.offset + e.length) <= (edit.offset, edit.offset + edit.length));
        file.edits.insert(at, edit);
        Ok(())
    }

    /// Register a brand-new file with fully synthesized content.
    ///
    /// Fails with `DestinationExists` when `store` already holds non-empty
    /// content at `path`, and with `EditConflict` when this batch already
    /// touches the path.
    pub fn create_file(
        &mut self,
        path: &Path,
        content: String,
        store: &dyn FileStore,
    ) -> RefactorResult<()> {
        if store.exists(path) && store.len(path)? > 0 {
            return Err(RefactorError::DestinationExists(path.to_path_buf()));
        }
        if self.files.contains_key(path) {
            return Err(RefactorError::EditConflict {
                path: path.to_path_buf(),
                detail: "file already created in this batch".to_string(),
            });
        }
        debug!(path = %path.display(), bytes = content.len(), "new file in batch");
        self.files.insert(
            path.to_path_buf(),
            FileEdit {
                base: String::new(),
                edits: vec![TextEdit::insert(0, content)],
            },
        );
        Ok(())
    }

    /// Rendered post-edit content of every file, for the caller to apply.
    pub fn preview(&self) -> IndexMap<PathBuf, String> {
        self.files
            .iter()
            .map(|(path, file)| (path.clone(), file.apply()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
