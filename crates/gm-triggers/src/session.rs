//! Turn management over a state file.
//!
//! A `Session` owns the loaded document. Each turn runs the engine on a
//! scratch copy and commits it with one save; if the save fails, neither the
//! file nor the in-memory state changes.

use gm_core::{CampaignState, DataTables, StateStore};

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::{TriggerError, TriggerResult};
use crate::location::LocationToken;

/// A GM session bound to one campaign-state file.
#[derive(Debug)]
pub struct Session {
    store: StateStore,
    engine: Engine,
    state: CampaignState,
}

impl Session {
    /// Load the state named in the config and build the standard engine.
    pub fn open(config: EngineConfig) -> TriggerResult<Self> {
        let store = StateStore::new(&config.state_path);
        let state = store.load()?;
        tracing::info!(path = %store.path().display(), "session opened");
        Ok(Self {
            store,
            engine: Engine::new(config),
            state,
        })
    }

    /// Build from parts (custom engine or pre-loaded state).
    pub fn from_parts(store: StateStore, engine: Engine, state: CampaignState) -> Self {
        Self {
            store,
            engine,
            state,
        }
    }

    /// Current committed state.
    pub fn state(&self) -> &CampaignState {
        &self.state
    }

    /// The engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The store.
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Load the static data tables from the configured data directory.
    pub fn load_tables(&self) -> TriggerResult<DataTables> {
        Ok(DataTables::load_dir(&self.engine.config().data_dir)?)
    }

    /// Run one location and commit.
    pub fn take_turn(&mut self, location: &str) -> TriggerResult<Vec<String>> {
        self.run_batch(&[location])
    }

    /// Run several locations in order and commit them with one save.
    ///
    /// Any invalid token rejects the whole batch before anything runs.
    pub fn run_batch(&mut self, locations: &[&str]) -> TriggerResult<Vec<String>> {
        let tokens = locations
            .iter()
            .map(|raw| {
                LocationToken::parse(raw).ok_or_else(|| TriggerError::InvalidLocation(raw.to_string()))
            })
            .collect::<TriggerResult<Vec<_>>>()?;

        let mut scratch = self.state.clone();
        let mut lines = Vec::new();
        for token in &tokens {
            lines.extend(self.engine.run_token(token, &mut scratch));
        }
        self.commit(scratch)?;
        Ok(lines)
    }

    /// Apply an external mutation (clock correction, inference, branching) and commit.
    pub fn apply<T, E>(&mut self, f: impl FnOnce(&mut CampaignState) -> Result<T, E>) -> TriggerResult<T>
    where
        TriggerError: From<E>,
    {
        let mut scratch = self.state.clone();
        let out = f(&mut scratch)?;
        self.commit(scratch)?;
        Ok(out)
    }

    /// Like [`take_turn`](Self::take_turn), but failures become a single `Error: ` line.
    pub fn turn_lines(&mut self, location: &str) -> Vec<String> {
        match self.take_turn(location) {
            Ok(lines) => lines,
            Err(err) => {
                tracing::warn!(error = %err, "turn failed");
                vec![err.to_line()]
            }
        }
    }

    fn commit(&mut self, next: CampaignState) -> TriggerResult<()> {
        if next != self.state {
            self.store.save(&next)?;
            self.state = next;
        }
        Ok(())
    }
}
