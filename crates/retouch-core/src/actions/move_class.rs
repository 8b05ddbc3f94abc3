//! Move a class declaration into its own header/source file pair.

use tracing::debug;

use crate::actions::{RefactorAction, Selection};
use crate::engine::edits::EditBatch;
use crate::engine::extract;
use crate::errors::{RefactorError, RefactorResult};
use crate::models::{DeclId, DeclKind, FileStore, NodeRef, SymbolIndex};

pub struct MoveClassToOwnFile<'a> {
    index: &'a dyn SymbolIndex,
    store: &'a dyn FileStore,
    target: Option<(DeclId, String)>,
}

impl<'a> MoveClassToOwnFile<'a> {
    pub fn new(index: &'a dyn SymbolIndex, store: &'a dyn FileStore) -> Self {
        Self {
            index,
            store,
            target: None,
        }
    }
}

impl RefactorAction for MoveClassToOwnFile<'_> {
    fn id(&self) -> &'static str {
        "MoveClassToOwnFile"
    }

    fn prepare(&mut self, selection: &Selection) -> bool {
        let Some(NodeRef::Decl(decl_id)) =
            selection.snapshot.node_at(selection.file, selection.offset)
        else {
            return false;
        };
        let decl = selection.snapshot.decl(decl_id);
        if decl.kind != DeclKind::Class {
            return false;
        }
        // Nothing to extract when the file is already named after the class.
        let path = &selection.snapshot.file(decl.file).path;
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        if stem == decl.name {
            return false;
        }
        debug!(class = %decl.name, from = %path.display(), "move accepted");
        self.target = Some((decl_id, decl.name.clone()));
        true
    }

    fn title(&self) -> String {
        let name = self.target.as_ref().map_or("", |(_, name)| name.as_str());
        format!("Move class '{name}' to new header/source file.")
    }

    fn apply(&self, selection: &Selection) -> RefactorResult<EditBatch> {
        let (decl_id, _) = self.target.as_ref().ok_or(RefactorError::NotApplicable)?;
        extract::extract_class(selection.snapshot, *decl_id, self.index, self.store)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Declaration, DefinitionLocation, OsFileStore, Snapshot, SourceFile, SourceLocation,
        SourceRange,
    };
    use std::path::PathBuf;

    struct EmptyIndex;

    impl SymbolIndex for EmptyIndex {
        fn resolve_definition(&self, _d: &SourceLocation) -> Vec<DefinitionLocation> {
            Vec::new()
        }
    }

    const CODE: &str = "\
#pragma once

class Widget
{
public:
    int size() { return 4; }
};
";

    fn snapshot(path: &str) -> Snapshot {
        let start = CODE.find("class Widget").unwrap();
        let end = CODE.find("};").unwrap();
        Snapshot {
            files: vec![SourceFile {
                path: PathBuf::from(path),
                text: CODE.to_string(),
                includes: Vec::new(),
            }],
            decls: vec![Declaration {
                name: "Widget".to_string(),
                kind: DeclKind::Class,
                file: 0,
                range: SourceRange::new(0, start, end),
                namespaces: Vec::new(),
                bases: Vec::new(),
                members: Vec::new(),
            }],
            switches: Vec::new(),
        }
    }

    fn select(snapshot: &Snapshot) -> Selection<'_> {
        Selection {
            snapshot,
            file: 0,
            offset: snapshot.decls[0].range.start + 1,
        }
    }

    #[test]
    fn test_prepare_and_title() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("shapes.h");
        std::fs::write(&path, CODE).unwrap();
        let snapshot = snapshot(path.to_str().unwrap());
        let mut action = MoveClassToOwnFile::new(&EmptyIndex, &OsFileStore);
        assert!(action.prepare(&select(&snapshot)));
        assert_eq!(
            action.title(),
            "Move class 'Widget' to new header/source file."
        );
        let batch = action.apply(&select(&snapshot)).unwrap();
        assert!(batch.files.contains_key(&temp.path().join("Widget.h")));
        assert!(batch.files.contains_key(&temp.path().join("Widget.cpp")));
    }

    #[test]
    fn test_file_named_after_class_is_rejected() {
        let snapshot = snapshot("Widget.h");
        let mut action = MoveClassToOwnFile::new(&EmptyIndex, &OsFileStore);
        assert!(!action.prepare(&select(&snapshot)));
    }

    #[test]
    fn test_apply_without_prepare_is_not_applicable() {
        let snapshot = snapshot("shapes.h");
        let action = MoveClassToOwnFile::new(&EmptyIndex, &OsFileStore);
        let err = action.apply(&select(&snapshot)).unwrap_err();
        assert!(matches!(err, RefactorError::NotApplicable));
    }
}
