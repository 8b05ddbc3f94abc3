//! Cross-file extraction: move a class declaration and its out-of-line
//! member definitions into a new header/source file pair.
//!
//! Definitions living in the declaration's own file travel with it into the
//! new header. Definitions elsewhere in the project are located through the
//! symbol index, their exact spans recovered with the brace-balanced scanner,
//! and gathered into the new source file together with the includes of the
//! files they came from. Every moved piece is deleted from its original
//! location; nothing is written here, the caller applies the batch.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::engine::braces;
use crate::engine::edits::{EditBatch, TextEdit};
use crate::engine::text;
use crate::errors::{RefactorError, RefactorResult};
use crate::models::{DeclId, FileStore, MemberKind, Snapshot, SourceLocation, SymbolIndex};

/// Per-invocation cache of file contents read during one extraction.
/// Owned exclusively by the running computation and discarded with it.
pub struct FileContentCache<'a> {
    store: &'a dyn FileStore,
    cache: HashMap<PathBuf, String>,
}

impl<'a> FileContentCache<'a> {
    pub fn new(store: &'a dyn FileStore) -> Self {
        Self {
            store,
            cache: HashMap::new(),
        }
    }

    /// Content of `path`, read at most once per invocation.
    pub fn read(&mut self, path: &Path) -> RefactorResult<&str> {
        match self.cache.entry(path.to_path_buf()) {
            Entry::Occupied(entry) => Ok(entry.into_mut().as_str()),
            Entry::Vacant(slot) => {
                let content = self.store.read(path).map_err(|e| {
                    RefactorError::SymbolResolutionFailed(format!(
                        "failed to read {}: {e}",
                        path.display()
                    ))
                })?;
                debug!(path = %path.display(), bytes = content.len(), "file cached");
                Ok(slot.insert(content).as_str())
            }
        }
    }
}

fn open_namespaces(namespaces: &[String]) -> String {
    namespaces
        .iter()
        .map(|ns| format!("namespace {ns}\n{{\n"))
        .collect()
}

fn close_namespaces(namespaces: &[String]) -> String {
    "}\n".repeat(namespaces.len())
}

/// Produce the complete edit batch moving `class_id` into `<Class>.h` and
/// `<Class>.cpp` next to its current file.
pub fn extract_class(
    snapshot: &Snapshot,
    class_id: DeclId,
    index: &dyn SymbolIndex,
    store: &dyn FileStore,
) -> RefactorResult<EditBatch> {
    let decl = snapshot.decl(class_id);
    let file = snapshot.file(decl.file);

    let stem = file.path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    if stem == decl.name {
        return Err(RefactorError::InvalidTarget(format!(
            "class '{}' already lives in its own file",
            decl.name
        )));
    }
    let dir = file.path.parent().unwrap_or_else(|| Path::new(""));
    let header_path = dir.join(format!("{}.h", decl.name));
    let source_path = dir.join(format!("{}.cpp", decl.name));

    let mut batch = EditBatch::new();

    // -- New header: declaration plus same-file out-of-line definitions -----
    let mut class_block = format!("{};\n\n", text::range_text(&file.text, &decl.range));
    for member in &decl.members {
        let MemberKind::Method { .. } = member.kind else {
            continue;
        };
        if let Some(definition) = member.definition {
            class_block.push_str(text::range_text(&file.text, &definition));
            class_block.push_str("\n\n");
            let (offset, length) = text::replace_decl_span(&file.text, &definition);
            batch.add(&file.path, &file.text, TextEdit::delete(offset, length))?;
            debug!(member = %member.name, "same-file definition moved to header");
        }
    }

    let mut header = String::from("#pragma once\n\n");
    for include in &file.includes {
        header.push_str(include);
        header.push('\n');
    }
    header.push('\n');
    header.push_str(&open_namespaces(&decl.namespaces));
    header.push_str(&class_block);
    header.push_str(&close_namespaces(&decl.namespaces));
    batch.create_file(&header_path, header, store)?;

    let (offset, length) = text::replace_decl_span(&file.text, &decl.range);
    batch.add(&file.path, &file.text, TextEdit::delete(offset, length))?;

    // -- New source: definitions found through the symbol index -------------
    let mut cache = FileContentCache::new(store);
    let mut include_lines: Vec<String> = Vec::new();
    let mut definitions: Vec<String> = Vec::new();

    for member in &decl.members {
        let MemberKind::Method { inline_body, .. } = member.kind else {
            continue;
        };
        if inline_body || member.definition.is_some() {
            continue;
        }
        let location = SourceLocation {
            path: file.path.clone(),
            position: text::offset_to_position(&file.text, member.range.start),
        };
        let hits = index.resolve_definition(&location);
        if hits.is_empty() {
            // May be defined in a binary or external unit. Leave it alone.
            debug!(member = %member.name, "no definition found, member kept as-is");
            continue;
        }
        for hit in hits {
            let content = cache.read(&hit.path)?;
            let start = text::position_to_offset(content, hit.start).ok_or_else(|| {
                RefactorError::SymbolResolutionFailed(format!(
                    "definition position {}:{} outside {}",
                    hit.start.line,
                    hit.start.character,
                    hit.path.display()
                ))
            })?;
            let (span_start, span_length) = braces::find_definition_span(content, start)?;
            definitions.push(content[span_start..span_start + span_length].to_string());
            include_lines.extend(text::find_includes(content));
            batch.add(&hit.path, content, TextEdit::delete(span_start, span_length))?;
            debug!(member = %member.name, path = %hit.path.display(), span_start, span_length, "definition extracted");
        }
    }

    let mut source = format!("#include \"{}.h\"\n\n", decl.name);
    for include in &include_lines {
        source.push_str(include);
        source.push('\n');
    }
    source.push('\n');
    source.push_str(&open_namespaces(&decl.namespaces));
    for definition in &definitions {
        source.push('\n');
        source.push_str(definition);
        source.push_str("\n\n");
    }
    source.push_str(&close_namespaces(&decl.namespaces));
    batch.create_file(&source_path, source, store)?;

    Ok(batch)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
