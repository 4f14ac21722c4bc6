//! Configuration for the trigger engine and turn session.

use std::path::PathBuf;

use crate::location::MatchMode;

/// Configuration for an [`Engine`](crate::Engine) and [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Campaign-state document.
    pub state_path: PathBuf,
    /// Directory holding `races.json` and the other static tables.
    pub data_dir: PathBuf,
    /// Keyword matching mode for dispatch and location guards.
    pub match_mode: MatchMode,
    /// Upper bound on settle passes per invocation.
    pub max_settle_passes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("campaign_state.json"),
            data_dir: PathBuf::from("data"),
            match_mode: MatchMode::Coarse,
            max_settle_passes: 32,
        }
    }
}

impl EngineConfig {
    /// Set the state document path.
    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = path.into();
        self
    }

    /// Set the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the matching mode.
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Set the settle pass limit (at least 1).
    pub fn with_max_settle_passes(mut self, passes: usize) -> Self {
        self.max_settle_passes = passes.max(1);
        self
    }
}
