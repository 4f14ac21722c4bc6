//! Error types for the trigger engine.

use gm_core::StateError;
use thiserror::Error;

/// Result type for trigger operations.
pub type TriggerResult<T> = Result<T, TriggerError>;

/// Errors that reach the caller of a turn.
///
/// Rule content never produces these; only boundary problems do.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// The location token was empty, blank, or not a string.
    #[error("invalid location token: {0:?}")]
    InvalidLocation(String),

    /// No hold module is registered under this name.
    #[error("unknown hold module: {0}")]
    UnknownHold(String),

    /// State store failure (load, save, or a malformed document).
    #[error("{0}")]
    State(#[from] StateError),
}

impl TriggerError {
    /// Render as an in-band output line.
    pub fn to_line(&self) -> String {
        format!("Error: {self}")
    }
}
