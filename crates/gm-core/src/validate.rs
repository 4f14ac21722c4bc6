//! Invariant checks over a campaign-state document.
//!
//! Validation never mutates; it reports what a careful GM would want to fix
//! by hand after editing the file outside the engine.

use std::fmt;

use serde_json::Value;

use crate::clock;
use crate::quest::{self, QUEST_PROGRESS, QuestList, QuestPhase};
use crate::state::{CampaignState, json_type};

/// A single problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateIssue {
    /// A clock's progress lies outside `[0, max]`.
    ClockOutOfRange {
        /// Clock id.
        clock: String,
        /// Stored progress.
        progress: i64,
        /// Declared maximum.
        max: Option<i64>,
    },
    /// A quest id sits in both `quests.active` and `quests.completed`.
    QuestInBothLists(String),
    /// A companion quest phase token is not a known phase.
    UnknownPhase {
        /// Quest id.
        quest: String,
        /// Offending token.
        token: String,
    },
    /// A reserved key holds the wrong JSON type.
    WrongType {
        /// Dotted path of the key.
        key: String,
        /// Type the engine expects.
        expected: &'static str,
        /// Type found.
        found: &'static str,
    },
}

impl fmt::Display for StateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClockOutOfRange {
                clock,
                progress,
                max,
            } => match max {
                Some(max) => write!(f, "clock {clock}: progress {progress} outside 0..={max}"),
                None => write!(f, "clock {clock}: negative progress {progress}"),
            },
            Self::QuestInBothLists(id) => write!(f, "quest {id} is both active and completed"),
            Self::UnknownPhase { quest, token } => {
                write!(f, "quest {quest}: unknown phase \"{token}\"")
            }
            Self::WrongType {
                key,
                expected,
                found,
            } => write!(f, "{key}: expected {expected}, found {found}"),
        }
    }
}

const OBJECT_KEYS: &[&str] = &[
    "scene_flags",
    "clocks",
    "campaign_clocks",
    "quests",
    "companions_state",
    "companions",
    "player",
    "civil_war_state",
    "relationship_inference",
];

const ARRAY_KEYS: &[&str] = &[
    "quests.active",
    "quests.completed",
    "companions.active_companions",
    "major_events",
];

/// Collect every invariant violation in the document.
pub fn validate_state(state: &CampaignState) -> Vec<StateIssue> {
    let mut issues = Vec::new();

    for key in OBJECT_KEYS {
        check_type(state, key, "object", Value::is_object, &mut issues);
    }
    for key in ARRAY_KEYS {
        check_type(state, key, "array", Value::is_array, &mut issues);
    }

    for c in clock::all(state) {
        let too_high = c.max.is_some_and(|max| c.current_progress > max);
        if c.current_progress < 0 || too_high {
            issues.push(StateIssue::ClockOutOfRange {
                clock: c.id,
                progress: c.current_progress,
                max: c.max,
            });
        }
    }

    for entry in quest::entries(state, QuestList::Active) {
        if quest::is_completed(state, entry.id()) {
            issues.push(StateIssue::QuestInBothLists(entry.id().to_string()));
        }
    }

    if let Some(progress) = state.object_at(QUEST_PROGRESS) {
        for (quest, token) in progress {
            let known = token
                .as_str()
                .is_some_and(|t| t.parse::<QuestPhase>().is_ok());
            if !known {
                issues.push(StateIssue::UnknownPhase {
                    quest: quest.clone(),
                    token: token.as_str().map_or_else(|| token.to_string(), String::from),
                });
            }
        }
    }

    issues
}

fn check_type(
    state: &CampaignState,
    key: &str,
    expected: &'static str,
    ok: fn(&Value) -> bool,
    issues: &mut Vec<StateIssue>,
) {
    if let Some(value) = state.get_path(key)
        && !ok(value)
    {
        issues.push(StateIssue::WrongType {
            key: key.to_string(),
            expected,
            found: json_type(value),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clean_document() {
        let s = CampaignState::from_value(json!({
            "clocks": {"war": {"current_progress": 3, "max": 8}},
            "quests": {"active": ["a"], "completed": ["b"]},
            "companions_state": {"quest_progress": {"g": "memory"}}
        }))
        .unwrap();
        assert!(validate_state(&s).is_empty());
    }

    #[test]
    fn reports_each_problem() {
        let s = CampaignState::from_value(json!({
            "scene_flags": [],
            "clocks": {"war": {"current_progress": 12, "max": 8}},
            "quests": {"active": ["a"], "completed": [{"id": "a"}]},
            "companions_state": {"quest_progress": {"g": "someday"}}
        }))
        .unwrap();
        let issues = validate_state(&s);
        assert!(issues.contains(&StateIssue::WrongType {
            key: "scene_flags".into(),
            expected: "object",
            found: "array",
        }));
        assert!(issues.contains(&StateIssue::ClockOutOfRange {
            clock: "war".into(),
            progress: 12,
            max: Some(8),
        }));
        assert!(issues.contains(&StateIssue::QuestInBothLists("a".into())));
        assert!(issues.contains(&StateIssue::UnknownPhase {
            quest: "g".into(),
            token: "someday".into(),
        }));
    }

    #[test]
    fn validation_does_not_mutate() {
        let s = CampaignState::from_value(json!({"clocks": {"x": {"current_progress": -1}}})).unwrap();
        let before = s.clone();
        assert_eq!(validate_state(&s).len(), 1);
        assert_eq!(s, before);
    }
}
