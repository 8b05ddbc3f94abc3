//! Retouch core library — reconciliation and edit synthesis for
//! cursor-triggered refactoring actions.
//!
//! The engine compares a required element set derived from a declaration
//! (an enumeration's constants, a class ancestry's virtual functions)
//! against what a dependent construct already contains, and synthesizes a
//! non-overlapping, possibly cross-file edit batch that reconciles the two
//! while keeping existing code byte-for-byte intact. Parsing, symbol
//! indexing, and file writes stay with the caller: the engine consumes a
//! read-only [`models::Snapshot`] plus the [`models::SymbolIndex`] and
//! [`models::FileStore`] traits, and hands back an
//! [`engine::edits::EditBatch`] to apply or discard wholesale.

pub mod actions;
pub mod engine;
pub mod errors;
pub mod models;

pub use actions::{available, RefactorAction, Selection};
pub use engine::edits::{EditBatch, FileEdit, TextEdit};
pub use errors::{RefactorError, RefactorResult};
pub use models::{Snapshot, SymbolIndex};
