//! Reconciliation: merge the collector's required list with the scanner's
//! found ranges into an ordered plan of per-element actions.

use indexmap::IndexMap;
use tracing::debug;

use crate::engine::collect::{ElementKey, ElementState};
use crate::engine::text;
use crate::models::{Snapshot, SourceRange};

/// What to do for one required element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryAction {
    /// A found range exists; its exact original text is re-emitted verbatim.
    Preserve,
    /// Nothing present; new minimal text is generated.
    Synthesize,
    /// A default implementation exists elsewhere; emit a commented-out stub
    /// so the default stays visible but inert.
    CommentStub,
    /// Fully implemented already; emit nothing.
    Skip,
}

/// One entry of the reconciliation plan, in canonical required order.
#[derive(Clone, Debug)]
pub struct ReconcileEntry {
    pub key: ElementKey,
    pub state: ElementState,
    pub found: Option<SourceRange>,
    pub action: EntryAction,
    /// Text to emit for this entry: the verbatim original slice for
    /// `Preserve`, synthesized text otherwise, empty for `Skip`.
    pub text: String,
}

/// One required element going into reconciliation.
#[derive(Clone, Debug)]
pub struct RequiredElement {
    pub key: ElementKey,
    pub state: ElementState,
    /// Minimal synthesized text for the element when nothing is present.
    pub template: String,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ReconcileOptions {
    /// Keep only elements whose state is `RequiresImplementation`,
    /// regardless of found-range status.
    pub pure_only: bool,
}

/// Build the ordered reconciliation plan.
///
/// The output contains exactly one entry per surviving required key, in the
/// required list's order. Found ranges not matching any required key are
/// ignored here; presence scanning already filtered them.
pub fn reconcile(
    snapshot: &Snapshot,
    required: &[RequiredElement],
    found: &IndexMap<String, SourceRange>,
    options: ReconcileOptions,
) -> Vec<ReconcileEntry> {
    let mut plan = Vec::with_capacity(required.len());
    for element in required {
        if options.pure_only && element.state != ElementState::RequiresImplementation {
            continue;
        }
        let found_range = found.get(&element.key.0).copied();
        let (action, text) = match element.state {
            ElementState::FullyImplemented => (EntryAction::Skip, String::new()),
            ElementState::HasDefaultImplementation => {
                (EntryAction::CommentStub, format!("// {}", element.template))
            }
            _ => match found_range {
                Some(range) => {
                    let file = snapshot.file(range.file);
                    let slice = text::range_text(&file.text, &range).to_string();
                    (EntryAction::Preserve, slice)
                }
                None => (EntryAction::Synthesize, element.template.clone()),
            },
        };
        plan.push(ReconcileEntry {
            key: element.key.clone(),
            state: element.state,
            found: found_range,
            action,
            text,
        });
    }
    debug!(entries = plan.len(), "reconciliation plan built");
    plan
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceFile;

    fn required(name: &str, state: ElementState, template: &str) -> RequiredElement {
        RequiredElement {
            key: (name.to_string(), String::new()),
            state,
            template: template.to_string(),
        }
    }

    fn snapshot_with_text(text: &str) -> Snapshot {
        Snapshot {
            files: vec![SourceFile {
                path: "a.cpp".into(),
                text: text.to_string(),
                includes: Vec::new(),
            }],
            decls: Vec::new(),
            switches: Vec::new(),
        }
    }

    #[test]
    fn test_completeness_and_order() {
        let snapshot = snapshot_with_text("");
        let req: Vec<_> = ["Red", "Green", "Blue"]
            .iter()
            .map(|n| required(n, ElementState::Unset, "case"))
            .collect();
        let plan = reconcile(
            &snapshot,
            &req,
            &IndexMap::new(),
            ReconcileOptions::default(),
        );
        let names: Vec<_> = plan.iter().map(|e| e.key.0.as_str()).collect();
        assert_eq!(names, ["Red", "Green", "Blue"]);
        assert!(plan.iter().all(|e| e.action == EntryAction::Synthesize));
    }

    #[test]
    fn test_preserve_emits_verbatim_slice() {
        // Green is already present and must come back byte-for-byte.
        let body = "switch (c) {\n  case Green:\n    handle();\n    break;\n}";
        let snapshot = snapshot_with_text(body);
        let slot_start = body.find("case Green").unwrap();
        let slot_end = body.rfind(';').unwrap();
        let mut found = IndexMap::new();
        found.insert("Green".to_string(), SourceRange::new(0, slot_start, slot_end));

        let req: Vec<_> = ["Red", "Green", "Blue"]
            .iter()
            .map(|n| required(n, ElementState::Unset, "synth"))
            .collect();
        let plan = reconcile(&snapshot, &req, &found, ReconcileOptions::default());

        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].action, EntryAction::Synthesize);
        assert_eq!(plan[1].action, EntryAction::Preserve);
        assert_eq!(plan[1].text, &body[slot_start..slot_end + 1]);
        assert_eq!(plan[2].action, EntryAction::Synthesize);
    }

    #[test]
    fn test_default_implementation_becomes_comment_stub() {
        let snapshot = snapshot_with_text("");
        let req = vec![required(
            "f",
            ElementState::HasDefaultImplementation,
            "virtual void f() override {}",
        )];
        let plan = reconcile(
            &snapshot,
            &req,
            &IndexMap::new(),
            ReconcileOptions::default(),
        );
        assert_eq!(plan[0].action, EntryAction::CommentStub);
        assert_eq!(plan[0].text, "// virtual void f() override {}");
    }

    #[test]
    fn test_fully_implemented_skipped() {
        let snapshot = snapshot_with_text("");
        let req = vec![required("f", ElementState::FullyImplemented, "stub")];
        let plan = reconcile(
            &snapshot,
            &req,
            &IndexMap::new(),
            ReconcileOptions::default(),
        );
        assert_eq!(plan[0].action, EntryAction::Skip);
        assert!(plan[0].text.is_empty());
    }

    #[test]
    fn test_pure_only_filters_everything_else() {
        // In pure-only mode a defaulted element emits nothing.
        let snapshot = snapshot_with_text("");
        let req = vec![
            required("f", ElementState::HasDefaultImplementation, "f-stub"),
            required("g", ElementState::RequiresImplementation, "g-stub"),
            required("h", ElementState::FullyImplemented, "h-stub"),
        ];
        let plan = reconcile(
            &snapshot,
            &req,
            &IndexMap::new(),
            ReconcileOptions { pure_only: true },
        );
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].key.0, "g");
        assert_eq!(plan[0].action, EntryAction::Synthesize);
    }

    #[test]
    fn test_no_duplicate_entries_per_key() {
        let snapshot = snapshot_with_text("case Red: break;");
        let mut found = IndexMap::new();
        found.insert("Red".to_string(), SourceRange::new(0, 0, 15));
        let req = vec![required("Red", ElementState::Unset, "synth")];
        let plan = reconcile(&snapshot, &req, &found, ReconcileOptions::default());
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].action, EntryAction::Preserve);
    }
}
