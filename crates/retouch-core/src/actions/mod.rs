//! User-facing refactoring actions.
//!
//! Each action is a thin entry point: `prepare` is the cheap applicability
//! check against the node under the cursor, `apply` runs the full computation
//! and returns a complete edit batch. Both run sequentially against the same
//! read-only snapshot; the caller applies or discards the batch wholesale.

pub mod enum_to_string;
pub mod missing_cases;
pub mod move_class;
pub mod virtual_functions;

use crate::engine::edits::EditBatch;
use crate::errors::RefactorResult;
use crate::models::{FileId, FileStore, Snapshot, SymbolIndex};

pub use enum_to_string::EnumToString;
pub use missing_cases::{CaseMode, PopulateCases};
pub use move_class::MoveClassToOwnFile;
pub use virtual_functions::{InsertVirtuals, VirtualMode};

/// Cursor context one action invocation runs against.
pub struct Selection<'a> {
    pub snapshot: &'a Snapshot,
    pub file: FileId,
    pub offset: usize,
}

/// One refactoring action.
///
/// `prepare` must be called first; it resolves and caches the target so that
/// `title` and `apply` can describe and transform it. `apply` on an
/// unprepared action returns `NotApplicable`.
pub trait RefactorAction {
    /// Stable identifier, for registration and logging.
    fn id(&self) -> &'static str;

    /// Cheap applicability check; caches the resolved target on success.
    fn prepare(&mut self, selection: &Selection) -> bool;

    /// One-line human-readable description of the pending action.
    fn title(&self) -> String;

    /// Full computation pass producing the complete edit batch.
    fn apply(&self, selection: &Selection) -> RefactorResult<EditBatch>;
}

/// All actions applicable at `selection`, prepared and ready to apply.
pub fn available<'a>(
    selection: &Selection<'a>,
    index: &'a dyn SymbolIndex,
    store: &'a dyn FileStore,
) -> Vec<Box<dyn RefactorAction + 'a>> {
    let mut actions: Vec<Box<dyn RefactorAction + 'a>> = vec![
        Box::new(PopulateCases::new(CaseMode::AppendMissing)),
        Box::new(PopulateCases::new(CaseMode::ReorderInPlace)),
        Box::new(EnumToString::new()),
        Box::new(InsertVirtuals::new(VirtualMode::PureOnly)),
        Box::new(InsertVirtuals::new(VirtualMode::All)),
        Box::new(MoveClassToOwnFile::new(index, store)),
    ];
    actions.retain_mut(|action| action.prepare(selection));
    actions
}
