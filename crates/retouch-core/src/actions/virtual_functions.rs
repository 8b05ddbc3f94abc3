//! Insert virtual functions inherited from a class's ancestry into its body.
//!
//! Pure-only mode inserts just the functions the class is forced to
//! implement. All-mode additionally lists inherited functions that already
//! have a default implementation, as commented stubs, and skips those the
//! class implements itself.

use indexmap::IndexMap;
use tracing::debug;

use crate::actions::{RefactorAction, Selection};
use crate::engine::collect::collect_virtuals;
use crate::engine::edits::{EditBatch, TextEdit};
use crate::engine::reconcile::{reconcile, EntryAction, ReconcileOptions, RequiredElement};
use crate::engine::text;
use crate::errors::{RefactorError, RefactorResult};
use crate::models::{DeclId, DeclKind, Declaration, MemberKind, NodeRef, Snapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VirtualMode {
    /// Only functions with no implementation anywhere in the ancestry.
    PureOnly,
    /// Every inherited virtual function; defaulted ones become commented
    /// stubs, self-implemented ones are skipped.
    All,
}

pub struct InsertVirtuals {
    mode: VirtualMode,
    target: Option<(DeclId, String)>,
}

impl InsertVirtuals {
    pub fn new(mode: VirtualMode) -> Self {
        Self { mode, target: None }
    }
}

/// Column to indent inserted functions at: the class's last method, else its
/// last field, else the class column plus one level.
fn insert_indentation(snapshot: &Snapshot, decl: &Declaration) -> String {
    let text = &snapshot.file(decl.file).text;
    let mut column = None;
    for member in &decl.members {
        if matches!(member.kind, MemberKind::Method { .. }) {
            column = Some(text::column_of(text, member.range.start));
        }
    }
    if column.is_none() {
        for member in &decl.members {
            if matches!(member.kind, MemberKind::Field) {
                column = Some(text::column_of(text, member.range.start));
            }
        }
    }
    let column = column.unwrap_or_else(|| text::column_of(text, decl.range.start) + 4);
    " ".repeat(column)
}

impl RefactorAction for InsertVirtuals {
    fn id(&self) -> &'static str {
        match self.mode {
            VirtualMode::PureOnly => "InsertPureVirtualFunctions",
            VirtualMode::All => "InsertAllVirtualFunctions",
        }
    }

    fn prepare(&mut self, selection: &Selection) -> bool {
        let Some(NodeRef::Decl(decl_id)) =
            selection.snapshot.node_at(selection.file, selection.offset)
        else {
            return false;
        };
        let decl = selection.snapshot.decl(decl_id);
        if decl.kind != DeclKind::Class || decl.bases.is_empty() {
            return false;
        }
        debug!(action = self.id(), class = %decl.name, "class accepted");
        self.target = Some((decl_id, decl.name.clone()));
        true
    }

    fn title(&self) -> String {
        let name = self.target.as_ref().map_or("", |(_, name)| name.as_str());
        match self.mode {
            VirtualMode::PureOnly => {
                format!("Insert pure virtual functions for class '{name}'.")
            }
            VirtualMode::All => format!("Insert all virtual functions for class '{name}'."),
        }
    }

    fn apply(&self, selection: &Selection) -> RefactorResult<EditBatch> {
        let snapshot = selection.snapshot;
        let (decl_id, _) = self.target.as_ref().ok_or(RefactorError::NotApplicable)?;
        let decl = snapshot.decl(*decl_id);
        let file = snapshot.file(decl.file);

        let required: Vec<RequiredElement> = collect_virtuals(snapshot, *decl_id)
            .into_values()
            .map(|element| {
                let ancestor_text = &snapshot.file(element.file).text;
                RequiredElement {
                    template: format!(
                        "{} override {{}}",
                        text::range_text(ancestor_text, &element.decl)
                    ),
                    key: element.key,
                    state: element.state,
                }
            })
            .collect();
        let options = ReconcileOptions {
            pure_only: self.mode == VirtualMode::PureOnly,
        };
        let plan = reconcile(snapshot, &required, &IndexMap::new(), options);

        let indent = insert_indentation(snapshot, decl);
        let mut insertion = String::from("\n");
        for entry in &plan {
            if entry.action == EntryAction::Skip {
                continue;
            }
            insertion.push_str(&indent);
            insertion.push_str(&entry.text);
            insertion.push('\n');
        }

        let mut batch = EditBatch::new();
        batch.add(
            &file.path,
            &file.text,
            TextEdit::insert(decl.range.end, insertion),
        )?;
        Ok(batch)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
