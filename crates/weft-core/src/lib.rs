//! Shared error taxonomy used across Weft crates.

use thiserror::Error;

/// Result alias used across the workspace.
pub type WeftResult<T> = Result<T, WeftError>;

/// Top-level error type for the render pipeline.
///
/// Every variant is a fatal construction-time or API-misuse failure; the
/// pipeline itself has no recoverable errors. Unmapped layout vocabulary is
/// deliberately absent here — it falls back to the engine default and is only
/// logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeftError {
    /// The document contains an element tag the tree builder does not know.
    #[error("unknown markup element `{tag}` under parent `{parent_kind}`")]
    UnknownElement { tag: String, parent_kind: String },

    /// `schedule()` was called before a root document was wired in.
    #[error("pipeline has no root document; call set_root before schedule")]
    PipelineNotReady,
}
