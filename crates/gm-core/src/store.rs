//! Load and save the campaign-state file.
//!
//! The file path is injected at construction; nothing here is global. Saving
//! writes a temporary file next to the target and renames it over the old
//! one, so a failed or interrupted save leaves the previous document intact.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::decode::decode_utf8;
use crate::error::{StateError, StateResult};
use crate::state::CampaignState;

/// File-backed storage for one campaign-state document.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Create a store for the document at `path`. The file need not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document.
    ///
    /// A missing or blank file yields an empty document. UTF-8 with or without
    /// a BOM is accepted; anything else reports the cause.
    pub fn load(&self) -> StateResult<CampaignState> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no state file, starting empty");
                return Ok(CampaignState::new());
            }
            Err(source) => {
                return Err(StateError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let (text, encoding) = decode_utf8(&bytes).ok_or_else(|| StateError::Decode {
            path: self.path.clone(),
        })?;
        if text.trim().is_empty() {
            return Ok(CampaignState::new());
        }

        let value: Value = serde_json::from_str(text).map_err(|source| StateError::Json {
            path: self.path.clone(),
            source,
        })?;
        let state = CampaignState::from_value(value)?;
        tracing::debug!(
            path = %self.path.display(),
            %encoding,
            keys = state.as_map().len(),
            "loaded campaign state"
        );
        Ok(state)
    }

    /// Save the document with two-space indentation, atomically.
    pub fn save(&self, state: &CampaignState) -> StateResult<()> {
        let mut text = to_pretty_json(state)?;
        text.push('\n');

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let write_err = |source| StateError::Write {
            path: self.path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(text.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|err| write_err(err.error))?;

        tracing::info!(path = %self.path.display(), bytes = text.len(), "saved campaign state");
        Ok(())
    }
}

/// Serialize a document the way [`StateStore::save`] writes it (no trailing newline).
pub fn to_pretty_json(state: &CampaignState) -> StateResult<String> {
    serde_json::to_string_pretty(state.as_map()).map_err(StateError::Serialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn blank_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "  \n").unwrap();
        assert!(StateStore::new(path).load().unwrap().is_empty());
    }

    #[test]
    fn bom_is_accepted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(br#"{"active_pc_id": "pc_1"}"#);
        fs::write(&path, bytes).unwrap();
        let state = StateStore::new(path).load().unwrap();
        assert_eq!(state.str_at("active_pc_id"), Some("pc_1"));
    }

    #[test]
    fn non_utf8_reports_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"{\"a\": \"\x92\"}").unwrap();
        let err = StateStore::new(path).load().unwrap_err();
        assert!(matches!(err, StateError::Decode { .. }));
    }

    #[test]
    fn bad_json_reports_cause() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();
        let err = StateStore::new(path).load().unwrap_err();
        assert!(matches!(err, StateError::Json { .. }));
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn array_root_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "[]").unwrap();
        let err = StateStore::new(path).load().unwrap_err();
        assert!(matches!(err, StateError::NotAnObject { found: "array" }));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        let state = CampaignState::from_value(json!({"scene_flags": {"a": true}})).unwrap();
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn failed_save_keeps_old_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{\"old\": true}").unwrap();

        // Target directory does not exist, so the temp file cannot be created.
        let store = StateStore::new(dir.path().join("missing").join("state.json"));
        let err = store.save(&CampaignState::new()).unwrap_err();
        assert!(matches!(err, StateError::Write { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"old\": true}");
    }
}
