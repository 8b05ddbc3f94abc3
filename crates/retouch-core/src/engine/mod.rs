//! Mechanics shared by the refactoring actions: text and range helpers,
//! inherited-element collection, switch-arm scanning, reconciliation of
//! required versus present elements, edit batching, and the brace-balanced
//! definition scanner.

pub mod braces;
pub mod collect;
pub mod edits;
pub mod extract;
pub mod reconcile;
pub mod scan;
pub mod text;
