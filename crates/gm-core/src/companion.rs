//! Companion descriptors.

use serde_json::Value;

use crate::state::{CampaignState, as_int};

/// Dotted path of the active companion list.
pub const ACTIVE_COMPANIONS: &str = "companions.active_companions";

/// A travelling companion, from either a bare name or a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Companion {
    /// Display name.
    pub name: String,
    /// NPC sheet id, if recorded.
    pub npc_id: Option<String>,
    /// Loyalty score, if recorded.
    pub loyalty: Option<i64>,
}

impl Companion {
    /// Read a companion. A record without `name` falls back to `npc_id`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => Some(Self {
                name: name.clone(),
                npc_id: None,
                loyalty: None,
            }),
            Value::Object(record) => {
                let npc_id = record.get("npc_id").and_then(Value::as_str).map(String::from);
                let name = record
                    .get("name")
                    .and_then(Value::as_str)
                    .map(String::from)
                    .or_else(|| npc_id.clone())?;
                Some(Self {
                    name,
                    npc_id,
                    loyalty: record.get("loyalty").and_then(as_int),
                })
            }
            _ => None,
        }
    }

    /// Case-insensitive substring match on the name.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        !needle.is_empty() && self.name.to_lowercase().contains(&needle)
    }
}

/// Active companions in party order.
pub fn active(state: &CampaignState) -> Vec<Companion> {
    state
        .array_at(ACTIVE_COMPANIONS)
        .map(|items| items.iter().filter_map(Companion::from_value).collect())
        .unwrap_or_default()
}

/// True if any active companion's name contains `name`, ignoring case.
pub fn is_present(state: &CampaignState, name: &str) -> bool {
    active(state).iter().any(|c| c.matches(name))
}
