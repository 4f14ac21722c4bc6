//! Timeline branching (the Dragonbreak protocol).
//!
//! When play contradicts canon, the GM branches the timeline. A branch keeps
//! a snapshot of the state as it stood, so the canon line can be restored or
//! compared later.

use chrono::{DateTime, Utc};
use gm_core::CampaignState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::canon::DRAGONBREAK_FLAG;
use crate::error::{LoreError, LoreResult};

/// Root key holding branch records.
pub const TIMELINE_BRANCHES: &str = "timeline_branches";

/// One recorded branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchRecord {
    /// Unique branch id.
    pub branch_id: Uuid,
    /// When the branch was recorded.
    pub created_at: DateTime<Utc>,
    /// What broke canon.
    pub reason: String,
    /// The state just before branching, without earlier branch records.
    pub snapshot: Value,
}

/// Records timeline branches into the campaign state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dragonbreak;

impl Dragonbreak {
    /// Branch now.
    pub fn branch(state: &mut CampaignState, reason: &str) -> LoreResult<BranchRecord> {
        Self::branch_at(state, reason, Utc::now())
    }

    /// Branch with an explicit timestamp.
    ///
    /// Appends `reason` to `major_events`, pushes a record onto
    /// `timeline_branches`, and sets the root `dragonbreak_occurred` flag. On
    /// error the state is unchanged.
    pub fn branch_at(
        state: &mut CampaignState,
        reason: &str,
        now: DateTime<Utc>,
    ) -> LoreResult<BranchRecord> {
        let mut snapshot = state.clone();
        snapshot.remove(TIMELINE_BRANCHES);
        let record = BranchRecord {
            branch_id: Uuid::new_v4(),
            created_at: now,
            reason: reason.to_string(),
            snapshot: snapshot.into_value(),
        };
        let encoded = serde_json::to_value(&record).map_err(LoreError::Snapshot)?;

        let mut next = state.clone();
        next.array_mut("major_events")?
            .push(Value::String(reason.to_string()));
        next.array_mut(TIMELINE_BRANCHES)?.push(encoded);
        next.insert(DRAGONBREAK_FLAG, Value::Bool(true));
        *state = next;

        tracing::info!(branch = %record.branch_id, reason, "timeline branched");
        Ok(record)
    }

    /// All readable branch records, oldest first.
    pub fn branches(state: &CampaignState) -> Vec<BranchRecord> {
        state
            .array_at(TIMELINE_BRANCHES)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}
