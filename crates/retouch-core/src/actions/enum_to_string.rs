//! Generate an inline `<Enum>ToString` function next to an enum declaration.

use tracing::debug;

use crate::actions::{RefactorAction, Selection};
use crate::engine::collect::required_enumerators;
use crate::engine::edits::{EditBatch, TextEdit};
use crate::engine::text;
use crate::errors::{RefactorError, RefactorResult};
use crate::models::{DeclId, DeclKind, NodeRef};

pub struct EnumToString {
    target: Option<DeclId>,
}

impl EnumToString {
    pub fn new() -> Self {
        Self { target: None }
    }
}

impl Default for EnumToString {
    fn default() -> Self {
        Self::new()
    }
}

impl RefactorAction for EnumToString {
    fn id(&self) -> &'static str {
        "EnumToString"
    }

    fn prepare(&mut self, selection: &Selection) -> bool {
        let Some(NodeRef::Decl(decl_id)) =
            selection.snapshot.node_at(selection.file, selection.offset)
        else {
            return false;
        };
        let decl = selection.snapshot.decl(decl_id);
        if !matches!(decl.kind, DeclKind::Enum { .. }) {
            return false;
        }
        debug!(name = %decl.name, "enum accepted");
        self.target = Some(decl_id);
        true
    }

    fn title(&self) -> String {
        "Add EnumToString function.".to_string()
    }

    fn apply(&self, selection: &Selection) -> RefactorResult<EditBatch> {
        let snapshot = selection.snapshot;
        let decl_id = self.target.ok_or(RefactorError::NotApplicable)?;
        let decl = snapshot.decl(decl_id);
        let file = snapshot.file(decl.file);
        let name = &decl.name;
        let indent = text::indentation_at(&file.text, decl.range.start);
        let prefix = match decl.kind {
            DeclKind::Enum { scoped: true } => format!("{name}::"),
            _ => String::new(),
        };

        let mut body = format!(
            "\n\n{indent}inline const char* {name}ToString(const {name} value)\n{indent}{{\n"
        );
        body.push_str(&format!(
            "{indent}\tconst char* result;\n{indent}\tswitch (value)\n{indent}\t{{\n"
        ));
        for enumerator in required_enumerators(snapshot, decl_id) {
            body.push_str(&format!("{indent}\tcase {prefix}{enumerator}:\n"));
            body.push_str(&format!("{indent}\t\tresult = \"{enumerator}\";\n"));
            body.push_str(&format!("{indent}\t\tbreak;\n"));
        }
        body.push_str(&format!("{indent}\tdefault:\n"));
        body.push_str(&format!("{indent}\t\tresult = \"<Undefined>\";\n"));
        body.push_str(&format!("{indent}\t\tbreak;\n"));
        body.push_str(&format!("{indent}\t}}\n"));
        body.push_str(&format!("{indent}\treturn result;\n{indent}}}"));

        // Past the closing brace token and the trailing `;` when present.
        let insert_at = text::after_decl(&file.text, &decl.range);
        let mut batch = EditBatch::new();
        batch.add(&file.path, &file.text, TextEdit::insert(insert_at, body))?;
        Ok(batch)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
