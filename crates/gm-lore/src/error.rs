//! Error types for lore tooling.

use gm_core::StateError;
use thiserror::Error;

/// Result type for lore operations.
pub type LoreResult<T> = Result<T, LoreError>;

/// Errors from canon, branching, and inference operations.
#[derive(Debug, Error)]
pub enum LoreError {
    /// No inferred bonus exists for this PC and flag.
    #[error("no relationship bonus {flag} for {pc_id}")]
    UnknownBonus {
        /// PC id.
        pc_id: String,
        /// Inference flag.
        flag: String,
    },

    /// A PC document carries no usable id.
    #[error("PC document has no id")]
    MissingPcId,

    /// Branch snapshot could not be serialized.
    #[error("cannot record timeline branch: {0}")]
    Snapshot(#[source] serde_json::Error),

    /// State or file access failed.
    #[error("{0}")]
    State(#[from] StateError),
}
