//! Error types for the retouch core library.

use std::path::PathBuf;

/// Top-level error enum for the retouch core library.
///
/// Every operation returns one typed result; there is no sentinel-value or
/// empty-string signaling anywhere in the crate.
#[derive(Debug, thiserror::Error)]
pub enum RefactorError {
    /// The applicability check failed. A negative result, not a fault.
    #[error("refactoring is not applicable at this location")]
    NotApplicable,

    /// Preconditions of a transformation are violated.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// Two computed replacements for one file overlap.
    #[error("conflicting edits for {path}: {detail}")]
    EditConflict { path: PathBuf, detail: String },

    /// A file the transformation would create already exists with content.
    #[error("destination file exists already: {0}")]
    DestinationExists(PathBuf),

    /// The symbol index returned an unreadable file or an unusable definition
    /// where one was structurally expected.
    #[error("symbol resolution failed: {0}")]
    SymbolResolutionFailed(String),

    /// The brace-balanced scan could not recover a definition span.
    #[error("malformed source: {0}")]
    MalformedSource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RefactorResult<T> = Result<T, RefactorError>;
