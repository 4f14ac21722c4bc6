use std::path::PathBuf;

/// Alias for `Result<T, StateError>`.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur when loading, saving, or mutating campaign state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file does not exist where a document was required.
    #[error("file not found: {}", path.display())]
    NotFound {
        /// Missing file.
        path: PathBuf,
    },

    /// The state file is not UTF-8 (with or without BOM).
    #[error("{} is not valid UTF-8", path.display())]
    Decode {
        /// File that failed to decode.
        path: PathBuf,
    },

    /// The file decoded but is not valid JSON.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        /// File with the parse error.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// The document root is not a JSON object.
    #[error("campaign state root must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// Writing or renaming the state file failed. The previous file is intact.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Target path of the write.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document could not be serialized.
    #[error("failed to serialize campaign state: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A clock id that does not exist in `clocks` or `campaign_clocks`.
    #[error("unknown clock: {0}")]
    UnknownClock(String),

    /// A dotted path runs through a value that is not an object or list.
    #[error("path conflict at \"{path}\": \"{segment}\" holds a {found}")]
    PathConflict {
        /// Full dotted path being written.
        path: String,
        /// Segment that holds the wrong type.
        segment: String,
        /// JSON type found at the segment.
        found: &'static str,
    },

    /// A quest phase token outside `hidden|memory|active|resolved`.
    #[error("invalid quest phase: {0}")]
    InvalidPhase(String),
}
