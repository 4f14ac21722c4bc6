//! Quest lists and companion quest phases.
//!
//! `quests.active` and `quests.completed` hold either bare id strings or
//! records with at least an `id`. Both forms are treated alike, and record
//! fields survive a move from active to completed. A quest never returns from
//! completed to active.
//!
//! Companion quest lines additionally carry a phase under
//! `companions_state.quest_progress`, which only ever moves forward along
//! `hidden → memory → active → resolved`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{StateError, StateResult};
use crate::state::CampaignState;

/// Dotted path of the companion quest phase map.
pub const QUEST_PROGRESS: &str = "companions_state.quest_progress";

/// One entry of a quest list.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestEntry {
    /// A bare quest id.
    Id(String),
    /// A quest record carrying at least `id`.
    Record(Map<String, Value>),
}

impl QuestEntry {
    /// Read an entry. Records without a string `id` are ignored.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(id) => Some(Self::Id(id.clone())),
            Value::Object(record) if record.get("id").is_some_and(Value::is_string) => {
                Some(Self::Record(record.clone()))
            }
            _ => None,
        }
    }

    /// The quest id.
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Record(record) => record.get("id").and_then(Value::as_str).unwrap_or_default(),
        }
    }

    /// Convert back into a JSON value.
    pub fn into_value(self) -> Value {
        match self {
            Self::Id(id) => Value::String(id),
            Self::Record(record) => Value::Object(record),
        }
    }
}

/// Which quest list to look in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestList {
    /// `quests.active`
    Active,
    /// `quests.completed`
    Completed,
}

impl QuestList {
    /// Dotted path of the list.
    pub fn path(self) -> &'static str {
        match self {
            Self::Active => "quests.active",
            Self::Completed => "quests.completed",
        }
    }
}

fn entry_id(value: &Value) -> Option<&str> {
    match value {
        Value::String(id) => Some(id),
        Value::Object(record) => record.get("id").and_then(Value::as_str),
        _ => None,
    }
}

/// Entries of a list, skipping malformed ones.
pub fn entries(state: &CampaignState, list: QuestList) -> Vec<QuestEntry> {
    state
        .array_at(list.path())
        .map(|items| items.iter().filter_map(QuestEntry::from_value).collect())
        .unwrap_or_default()
}

/// True if the list contains `id` in either form.
pub fn contains(state: &CampaignState, list: QuestList, id: &str) -> bool {
    state
        .array_at(list.path())
        .is_some_and(|items| items.iter().any(|v| entry_id(v) == Some(id)))
}

/// True if `id` is in `quests.active`.
pub fn is_active(state: &CampaignState, id: &str) -> bool {
    contains(state, QuestList::Active, id)
}

/// True if `id` is in `quests.completed`.
pub fn is_completed(state: &CampaignState, id: &str) -> bool {
    contains(state, QuestList::Completed, id)
}

/// Push a bare id onto `quests.active`. See [`activate_entry`].
pub fn activate(state: &mut CampaignState, id: &str) -> StateResult<bool> {
    activate_entry(state, QuestEntry::Id(id.to_string()))
}

/// Push an entry onto `quests.active` unless its id is already active or
/// completed. Returns `true` if the list changed.
pub fn activate_entry(state: &mut CampaignState, entry: QuestEntry) -> StateResult<bool> {
    let id = entry.id().to_string();
    if id.is_empty() || is_active(state, &id) || is_completed(state, &id) {
        return Ok(false);
    }
    state.array_mut(QuestList::Active.path())?.push(entry.into_value());
    tracing::debug!(quest = %id, "quest activated");
    Ok(true)
}

/// Move `id` to `quests.completed`, keeping its record if it had one.
///
/// A quest that was never active is recorded as a bare id. Returns `true` if
/// the document changed.
pub fn complete(state: &mut CampaignState, id: &str) -> StateResult<bool> {
    if is_completed(state, id) {
        return Ok(false);
    }
    // Validate the destination before touching the source list.
    state.array_mut(QuestList::Completed.path())?;

    let mut moved = None;
    if let Some(active) = state
        .get_path(QuestList::Active.path())
        .and_then(Value::as_array)
        .cloned()
    {
        let (matching, rest): (Vec<Value>, Vec<Value>) =
            active.into_iter().partition(|v| entry_id(v) == Some(id));
        if !matching.is_empty() {
            moved = matching.into_iter().next();
            *state.array_mut(QuestList::Active.path())? = rest;
        }
    }
    let entry = moved.unwrap_or_else(|| Value::String(id.to_string()));
    state.array_mut(QuestList::Completed.path())?.push(entry);
    tracing::debug!(quest = id, "quest completed");
    Ok(true)
}

/// Phase of a companion quest line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestPhase {
    /// Not yet known to the party.
    Hidden,
    /// Seeded through a memory or vision.
    Memory,
    /// In progress.
    Active,
    /// Finished.
    Resolved,
}

impl QuestPhase {
    /// The token stored in the document.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Memory => "memory",
            Self::Active => "active",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for QuestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestPhase {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hidden" => Ok(Self::Hidden),
            "memory" => Ok(Self::Memory),
            "active" => Ok(Self::Active),
            "resolved" => Ok(Self::Resolved),
            _ => Err(StateError::InvalidPhase(s.to_string())),
        }
    }
}

/// Current phase of a companion quest. Unknown tokens read as `None`.
pub fn phase(state: &CampaignState, quest: &str) -> Option<QuestPhase> {
    state
        .object_at(QUEST_PROGRESS)?
        .get(quest)?
        .as_str()?
        .parse()
        .ok()
}

/// Move a companion quest forward to `to`.
///
/// Returns `false` (and leaves the document alone) if the quest is already at
/// or beyond `to`.
pub fn advance_phase(state: &mut CampaignState, quest: &str, to: QuestPhase) -> StateResult<bool> {
    if phase(state, quest).is_some_and(|current| current >= to) {
        return Ok(false);
    }
    state
        .object_mut(QUEST_PROGRESS)?
        .insert(quest.to_string(), Value::from(to.as_str()));
    tracing::debug!(quest, phase = %to, "quest phase advanced");
    Ok(true)
}
