//! One trigger invocation across the global layer and every matching hold.

use gm_core::{CampaignState, clock};
use serde_json::Value;

use crate::config::EngineConfig;
use crate::dispatch::{Dispatcher, HoldModule};
use crate::error::{TriggerError, TriggerResult};
use crate::location::LocationToken;
use crate::rule::{Pass, RuleContext, RuleSet};
use crate::{global, holds};

/// Runs trigger rules against a campaign state.
///
/// Each invocation syncs the clock alias, runs the global layer and then the
/// matching holds in registration order, and repeats that pass while any rule
/// fired. Calling again with the resulting state emits nothing.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    global: RuleSet,
    dispatcher: Dispatcher,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Engine with the standard global layer and hold modules.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_holds(config, global::rules(), holds::standard())
    }

    /// Engine with a custom global layer and holds.
    pub fn with_holds(config: EngineConfig, global: RuleSet, holds: Vec<HoldModule>) -> Self {
        Self {
            config,
            global,
            dispatcher: Dispatcher::new(holds),
        }
    }

    /// Configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The dispatcher and its modules.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run for a raw token. Empty tokens yield nothing and leave the state alone.
    pub fn run(&self, location: &str, state: &mut CampaignState) -> Vec<String> {
        match LocationToken::parse(location) {
            Some(token) => self.run_token(&token, state),
            None => Vec::new(),
        }
    }

    /// Run for a JSON token. Non-strings yield nothing.
    pub fn run_value(&self, location: &Value, state: &mut CampaignState) -> Vec<String> {
        match LocationToken::from_value(location) {
            Some(token) => self.run_token(&token, state),
            None => Vec::new(),
        }
    }

    /// Run for a parsed token.
    pub fn run_token(&self, location: &LocationToken, state: &mut CampaignState) -> Vec<String> {
        if clock::sync_alias(state) {
            tracing::debug!("clock alias synchronised");
        }
        let ctx = RuleContext {
            location,
            mode: self.config.match_mode,
        };
        let holds = self.dispatcher.matching(location, ctx.mode);

        let mut lines = Vec::new();
        for pass_no in 0..self.config.max_settle_passes {
            let mut pass = self.global.run_pass(&ctx, state);
            for hold in &holds {
                pass.absorb(hold.run_pass(&ctx, state));
            }
            let Pass { lines: emitted, fired } = pass;
            lines.extend(emitted);
            if fired == 0 {
                tracing::debug!(
                    location = location.normalized(),
                    passes = pass_no + 1,
                    lines = lines.len(),
                    "triggers settled"
                );
                return lines;
            }
        }
        tracing::warn!(
            location = location.normalized(),
            max_passes = self.config.max_settle_passes,
            "triggers still firing at pass limit"
        );
        lines
    }

    /// Run a single named hold (plus the global layer) for a token.
    pub fn run_hold(
        &self,
        name: &str,
        location: &str,
        state: &mut CampaignState,
    ) -> TriggerResult<Vec<String>> {
        let hold = self
            .dispatcher
            .hold(name)
            .ok_or_else(|| TriggerError::UnknownHold(name.to_string()))?;
        let token = LocationToken::parse(location)
            .ok_or_else(|| TriggerError::InvalidLocation(location.to_string()))?;
        clock::sync_alias(state);
        let ctx = RuleContext {
            location: &token,
            mode: self.config.match_mode,
        };
        let mut lines = Vec::new();
        for _ in 0..self.config.max_settle_passes {
            let mut pass = self.global.run_pass(&ctx, state);
            pass.absorb(hold.run_pass(&ctx, state));
            lines.extend(pass.lines);
            if pass.fired == 0 {
                break;
            }
        }
        Ok(lines)
    }
}
