//! Populate a `switch` over an enumeration with its missing cases.
//!
//! Append mode inserts synthesized arms right after the opening brace and
//! leaves existing arms untouched. Reorder mode permutes the recognized arms
//! in place so they follow the enumeration's declared order, re-emitting each
//! byte-for-byte, and synthesizes the rest after the last recognized arm;
//! everything else in the body stays where it is.

use tracing::debug;

use crate::actions::{RefactorAction, Selection};
use crate::engine::collect::{required_enumerators, ElementState};
use crate::engine::edits::{EditBatch, TextEdit};
use crate::engine::reconcile::{reconcile, EntryAction, ReconcileOptions, RequiredElement};
use crate::engine::scan;
use crate::engine::text;
use crate::errors::{RefactorError, RefactorResult};
use crate::models::{DeclId, DeclKind, NodeRef, Snapshot, SourceRange, SwitchSite};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaseMode {
    /// Insert missing arms after the opening brace; existing arms stay put.
    AppendMissing,
    /// Permute recognized arms into the enumeration's declared order.
    ReorderInPlace,
}

struct Target {
    site: usize,
    subject: DeclId,
    missing: Vec<String>,
}

pub struct PopulateCases {
    mode: CaseMode,
    target: Option<Target>,
}

impl PopulateCases {
    pub fn new(mode: CaseMode) -> Self {
        Self { mode, target: None }
    }

    fn resolve<'a>(&self, snapshot: &'a Snapshot) -> RefactorResult<(&'a SwitchSite, DeclId)> {
        let target = self.target.as_ref().ok_or(RefactorError::NotApplicable)?;
        Ok((&snapshot.switches[target.site], target.subject))
    }

    fn case_template(qualification: &str, name: &str) -> String {
        format!("case {qualification}{name}:\n\tbreak;")
    }
}

impl RefactorAction for PopulateCases {
    fn id(&self) -> &'static str {
        match self.mode {
            CaseMode::AppendMissing => "InsertMissingCases",
            CaseMode::ReorderInPlace => "ReorderCases",
        }
    }

    fn prepare(&mut self, selection: &Selection) -> bool {
        let Some(NodeRef::Switch(site_id)) =
            selection.snapshot.node_at(selection.file, selection.offset)
        else {
            return false;
        };
        let site = &selection.snapshot.switches[site_id];
        let Some(subject) = site.subject else {
            return false;
        };
        let decl = selection.snapshot.decl(subject);
        if !matches!(decl.kind, DeclKind::Enum { .. }) {
            return false;
        }
        let found = scan::scan_switch(site, decl);
        let missing: Vec<String> = required_enumerators(selection.snapshot, subject)
            .into_iter()
            .filter(|name| !found.contains_key(name))
            .collect();
        if missing.is_empty() {
            return false;
        }
        debug!(action = self.id(), missing = missing.len(), "switch accepted");
        self.target = Some(Target {
            site: site_id,
            subject,
            missing,
        });
        true
    }

    fn title(&self) -> String {
        let n = self.target.as_ref().map_or(0, |t| t.missing.len());
        match self.mode {
            CaseMode::AppendMissing => format!("Add {n} missing cases."),
            CaseMode::ReorderInPlace => format!("Add {n} missing cases in declaration order."),
        }
    }

    fn apply(&self, selection: &Selection) -> RefactorResult<EditBatch> {
        let snapshot = selection.snapshot;
        let (site, subject_id) = self.resolve(snapshot)?;
        let subject = snapshot.decl(subject_id);
        let file = snapshot.file(site.file);
        let indent = text::indentation_at(&file.text, site.range.start);
        let qualification = scan::qualification(&site.namespaces, subject);

        let mut batch = EditBatch::new();
        match self.mode {
            CaseMode::AppendMissing => {
                let target = self.target.as_ref().ok_or(RefactorError::NotApplicable)?;
                let mut insertion = String::from("\n");
                for name in &target.missing {
                    insertion.push_str(&indent);
                    insertion.push_str(&Self::case_template(&qualification, name));
                    insertion.push('\n');
                }
                if site.arms.is_empty() {
                    insertion.push_str(&indent);
                    insertion.push_str("default:\n\tbreak;\n");
                }
                batch.add(
                    &file.path,
                    &file.text,
                    TextEdit::insert(site.body.start + 1, insertion),
                )?;
            }
            CaseMode::ReorderInPlace => {
                let found = scan::scan_switch(site, subject);
                let required: Vec<RequiredElement> = required_enumerators(snapshot, subject_id)
                    .into_iter()
                    .map(|name| RequiredElement {
                        template: Self::case_template(&qualification, &name),
                        key: (name, String::new()),
                        state: ElementState::RequiresImplementation,
                    })
                    .collect();
                let plan = reconcile(snapshot, &required, &found, ReconcileOptions::default());

                // The rewrite touches only recognized arm slots: the i-th
                // slot in body order receives the i-th preserved arm in
                // declaration order. Comments, arms over other subjects, and
                // default arms keep their bytes and their positions.
                let mut slots: Vec<&SourceRange> = found.values().collect();
                slots.sort_by_key(|slot| slot.start);
                let preserved = plan.iter().filter(|e| e.action == EntryAction::Preserve);
                for (slot, entry) in slots.iter().zip(preserved) {
                    batch.add(
                        &file.path,
                        &file.text,
                        TextEdit::replace(
                            slot.start,
                            text::range_length(&file.text, slot),
                            entry.text.clone(),
                        ),
                    )?;
                }

                // Missing arms go after the last recognized arm, or right
                // after the opening brace when the switch has none.
                let mut insertion = String::new();
                for entry in plan.iter().filter(|e| e.action == EntryAction::Synthesize) {
                    insertion.push('\n');
                    insertion.push_str(&indent);
                    insertion.push_str(&entry.text);
                }
                if !insertion.is_empty() {
                    let at = slots.last().map_or(site.body.start + 1, |slot| {
                        slot.start + text::range_length(&file.text, slot)
                    });
                    batch.add(&file.path, &file.text, TextEdit::insert(at, insertion))?;
                }
            }
        }
        Ok(batch)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
