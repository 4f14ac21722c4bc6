//! Countdown clocks.
//!
//! A clock is a bounded counter stored as
//! `clocks.<id> = {current_progress, max, name}`. Older documents keep the same
//! mapping under `campaign_clocks`; [`sync_alias`] folds legacy-only entries
//! into `clocks` and re-points the legacy key at an identical copy, and every
//! write through this module keeps the two in step.

use serde_json::{Map, Value};

use crate::error::{StateError, StateResult};
use crate::state::{CampaignState, as_int};

/// Canonical root key for clocks.
pub const CLOCKS: &str = "clocks";
/// Legacy alias for [`CLOCKS`].
pub const LEGACY_CLOCKS: &str = "campaign_clocks";

/// A typed view of one clock record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    /// Clock id (the key under `clocks`).
    pub id: String,
    /// Display name; falls back to the id.
    pub name: String,
    /// Current progress.
    pub current_progress: i64,
    /// Upper bound, if the record declares one.
    pub max: Option<i64>,
}

impl Clock {
    /// Read a clock record. Non-object records are ignored.
    pub fn from_value(id: &str, value: &Value) -> Option<Self> {
        let record = value.as_object()?;
        Some(Self {
            id: id.to_string(),
            name: record
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(id)
                .to_string(),
            current_progress: record.get("current_progress").and_then(as_int).unwrap_or(0),
            max: record.get("max").and_then(as_int),
        })
    }

    /// Clamp a value into `[0, max]`. A clock without `max` only has a floor.
    pub fn clamp(&self, value: i64) -> i64 {
        let floored = value.max(0);
        match self.max {
            Some(max) => floored.min(max.max(0)),
            None => floored,
        }
    }

    /// True once progress has reached `max`.
    pub fn is_full(&self) -> bool {
        self.max.is_some_and(|max| self.current_progress >= max)
    }
}

/// The outcome of changing a clock's progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockAdvance {
    /// Clock id.
    pub clock_id: String,
    /// Progress before the change.
    pub previous: i64,
    /// Progress after clamping.
    pub current: i64,
    /// Upper bound in effect.
    pub max: Option<i64>,
}

impl ClockAdvance {
    /// True if this change moved progress from below `threshold` to at or above it.
    pub fn crossed(&self, threshold: i64) -> bool {
        self.previous < threshold && self.current >= threshold
    }

    /// True if progress actually changed.
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Copy legacy-only clocks into `clocks`, then make `campaign_clocks` an
/// identical mapping. Does nothing when no legacy object exists.
///
/// Returns `true` if the document changed.
pub fn sync_alias(state: &mut CampaignState) -> bool {
    let Some(legacy) = state.get(LEGACY_CLOCKS).and_then(Value::as_object).cloned() else {
        return false;
    };
    let canonical = match state.object_mut(CLOCKS) {
        Ok(canonical) => canonical,
        Err(err) => {
            tracing::warn!(error = %err, "cannot sync campaign_clocks into clocks");
            return false;
        }
    };
    let mut changed = false;
    for (id, record) in legacy.iter() {
        if !canonical.contains_key(id) {
            canonical.insert(id.clone(), record.clone());
            changed = true;
        }
    }
    let mirrored = canonical.clone();
    if legacy != mirrored {
        state.insert(LEGACY_CLOCKS, Value::Object(mirrored));
        changed = true;
    }
    if changed {
        tracing::debug!("synchronised clocks with campaign_clocks");
    }
    changed
}

/// Look up a clock, preferring `clocks` over `campaign_clocks`. Never mutates.
pub fn get(state: &CampaignState, id: &str) -> Option<Clock> {
    [CLOCKS, LEGACY_CLOCKS].iter().find_map(|root| {
        state
            .get(root)
            .and_then(Value::as_object)
            .and_then(|clocks| clocks.get(id))
            .and_then(|record| Clock::from_value(id, record))
    })
}

/// Current progress of a clock.
pub fn progress(state: &CampaignState, id: &str) -> Option<i64> {
    get(state, id).map(|clock| clock.current_progress)
}

/// All clocks, canonical first, then legacy-only ones.
pub fn all(state: &CampaignState) -> Vec<Clock> {
    let mut out: Vec<Clock> = Vec::new();
    for root in [CLOCKS, LEGACY_CLOCKS] {
        let Some(clocks) = state.get(root).and_then(Value::as_object) else {
            continue;
        };
        for (id, record) in clocks {
            if out.iter().any(|c| &c.id == id) {
                continue;
            }
            if let Some(clock) = Clock::from_value(id, record) {
                out.push(clock);
            }
        }
    }
    out
}

/// Create a clock if it does not exist yet. Returns `true` if created.
pub fn ensure(state: &mut CampaignState, id: &str, name: &str, max: i64) -> StateResult<bool> {
    sync_alias(state);
    let clocks = state.object_mut(CLOCKS)?;
    if clocks.contains_key(id) {
        return Ok(false);
    }
    let mut record = Map::new();
    record.insert("current_progress".into(), Value::from(0));
    record.insert("max".into(), Value::from(max.max(0)));
    record.insert("name".into(), Value::from(name));
    clocks.insert(id.to_string(), Value::Object(record));
    mirror(state);
    tracing::debug!(clock = id, max, "clock created");
    Ok(true)
}

/// Add `delta` to a clock's progress, clamped into `[0, max]`.
pub fn advance(state: &mut CampaignState, id: &str, delta: i64) -> StateResult<ClockAdvance> {
    let current = get(state, id)
        .ok_or_else(|| StateError::UnknownClock(id.to_string()))?
        .current_progress;
    set_progress(state, id, current.saturating_add(delta))
}

/// Set a clock's progress directly (admin correction), clamped into `[0, max]`.
pub fn set_progress(state: &mut CampaignState, id: &str, value: i64) -> StateResult<ClockAdvance> {
    sync_alias(state);
    let clocks = state.object_mut(CLOCKS)?;
    let record = clocks
        .get_mut(id)
        .and_then(Value::as_object_mut)
        .ok_or_else(|| StateError::UnknownClock(id.to_string()))?;
    let clock = Clock::from_value(id, &Value::Object(record.clone()))
        .ok_or_else(|| StateError::UnknownClock(id.to_string()))?;
    let next = clock.clamp(value);
    record.insert("current_progress".into(), Value::from(next));
    mirror(state);

    let outcome = ClockAdvance {
        clock_id: id.to_string(),
        previous: clock.current_progress,
        current: next,
        max: clock.max,
    };
    tracing::debug!(
        clock = id,
        previous = outcome.previous,
        current = outcome.current,
        "clock progress set"
    );
    Ok(outcome)
}

/// Keep `campaign_clocks` identical to `clocks` when the legacy key exists.
fn mirror(state: &mut CampaignState) {
    if !state.contains_key(LEGACY_CLOCKS) {
        return;
    }
    if let Some(clocks) = state.get(CLOCKS).cloned() {
        state.insert(LEGACY_CLOCKS, clocks);
    }
}
