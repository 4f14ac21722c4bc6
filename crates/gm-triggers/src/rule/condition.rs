//! Guards evaluated against the location token and campaign state.

use gm_core::quest::{self, QuestPhase};
use gm_core::state::as_int;
use gm_core::{CampaignState, clock, companion, flags, time};
use serde_json::Value;

use super::RuleContext;

/// A guard on a trigger rule.
#[derive(Debug, Clone, Default)]
pub enum Condition {
    /// Any keyword matches the token under the context's match mode.
    At(Vec<String>),
    /// Every keyword matches the token under the context's match mode.
    AtAll(Vec<String>),
    /// Any keyword matches as a whole-word run, regardless of mode.
    AtExact(Vec<String>),
    /// Scene flag is truthy.
    FlagSet(String),
    /// Scene flag is absent or falsy.
    FlagUnset(String),
    /// Scene flag equals a value (strings compare case-insensitively).
    FlagEquals {
        /// Flag name.
        flag: String,
        /// Expected value.
        value: Value,
    },
    /// Quest id sits in `quests.active`.
    QuestActive(String),
    /// Quest id sits in `quests.completed`.
    QuestCompleted(String),
    /// Companion quest is exactly at a phase.
    PhaseIs {
        /// Quest id.
        quest: String,
        /// Phase.
        phase: QuestPhase,
    },
    /// Companion quest has reached at least a phase.
    PhaseAtLeast {
        /// Quest id.
        quest: String,
        /// Phase.
        phase: QuestPhase,
    },
    /// A companion whose name or id contains the needle is in the party.
    Companion(String),
    /// Time of day falls at night.
    Night,
    /// `player.<key>` is truthy.
    Player(String),
    /// A clock's progress is at least a value.
    ClockAtLeast {
        /// Clock id.
        clock: String,
        /// Threshold.
        value: i64,
    },
    /// A clock has reached its maximum.
    ClockFull(String),
    /// The value at a dotted path equals a value (strings compare case-insensitively).
    PathEquals {
        /// Dotted path.
        path: String,
        /// Expected value.
        value: Value,
    },
    /// The integer at a dotted path is at least a value.
    PathAtLeast {
        /// Dotted path.
        path: String,
        /// Threshold.
        value: i64,
    },
    /// The value at a dotted path is the JSON literal `false`. Absence does not count.
    PathIsFalse(String),
    /// Logical NOT.
    Not(Box<Condition>),
    /// Logical AND.
    And(Vec<Condition>),
    /// Logical OR.
    Or(Vec<Condition>),
    /// Always true.
    #[default]
    Always,
}

impl Condition {
    /// Evaluate against the current token and state.
    pub fn evaluate(&self, ctx: &RuleContext<'_>, state: &CampaignState) -> bool {
        match self {
            Condition::At(keywords) => ctx.location.matches_any(keywords, ctx.mode),
            Condition::AtAll(keywords) => ctx.location.matches_all(keywords, ctx.mode),
            Condition::AtExact(keywords) => {
                ctx.location.matches_any(keywords, crate::MatchMode::Exact)
            }
            Condition::FlagSet(flag) => flags::seen(state, flag),
            Condition::FlagUnset(flag) => !flags::seen(state, flag),
            Condition::FlagEquals { flag, value } => {
                flags::value(state, flag).is_some_and(|v| loose_eq(v, value))
            }
            Condition::QuestActive(id) => quest::is_active(state, id),
            Condition::QuestCompleted(id) => quest::is_completed(state, id),
            Condition::PhaseIs { quest: q, phase } => quest::phase(state, q) == Some(*phase),
            Condition::PhaseAtLeast { quest: q, phase } => {
                quest::phase(state, q).is_some_and(|p| p >= *phase)
            }
            Condition::Companion(name) => companion::is_present(state, name),
            Condition::Night => time::is_night(state),
            Condition::Player(key) => state.player_flag(key),
            Condition::ClockAtLeast { clock: id, value } => {
                clock::progress(state, id).is_some_and(|p| p >= *value)
            }
            Condition::ClockFull(id) => clock::get(state, id).is_some_and(|c| c.is_full()),
            Condition::PathEquals { path, value } => {
                state.get_path(path).is_some_and(|v| loose_eq(v, value))
            }
            Condition::PathAtLeast { path, value } => state
                .get_path(path)
                .and_then(as_int)
                .is_some_and(|n| n >= *value),
            Condition::PathIsFalse(path) => state.bool_at(path) == Some(false),
            Condition::Not(inner) => !inner.evaluate(ctx, state),
            Condition::And(all) => all.iter().all(|c| c.evaluate(ctx, state)),
            Condition::Or(any) => any.iter().any(|c| c.evaluate(ctx, state)),
            Condition::Always => true,
        }
    }

    /// Token matches any keyword.
    pub fn at<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Condition::At(keywords.into_iter().map(Into::into).collect())
    }

    /// Token matches every keyword.
    pub fn at_all<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Condition::AtAll(keywords.into_iter().map(Into::into).collect())
    }

    /// Token matches any keyword as whole words.
    pub fn at_exact<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Condition::AtExact(keywords.into_iter().map(Into::into).collect())
    }

    /// Scene flag set.
    pub fn flag(flag: impl Into<String>) -> Self {
        Condition::FlagSet(flag.into())
    }

    /// Scene flag unset.
    pub fn unset(flag: impl Into<String>) -> Self {
        Condition::FlagUnset(flag.into())
    }

    /// Companion in the party.
    pub fn companion(name: impl Into<String>) -> Self {
        Condition::Companion(name.into())
    }

    /// `player.<key>` truthy.
    pub fn player(key: impl Into<String>) -> Self {
        Condition::Player(key.into())
    }

    /// Clock at or past a threshold.
    pub fn clock_at_least(clock: impl Into<String>, value: i64) -> Self {
        Condition::ClockAtLeast {
            clock: clock.into(),
            value,
        }
    }

    /// Dotted path equals a value.
    pub fn path_eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::PathEquals {
            path: path.into(),
            value: value.into(),
        }
    }

    /// `civil_war_state.player_alliance` equals a faction.
    pub fn alliance(faction: &str) -> Self {
        Self::path_eq("civil_war_state.player_alliance", faction)
    }

    /// Companion quest at exactly a phase.
    pub fn phase_is(quest: impl Into<String>, phase: QuestPhase) -> Self {
        Condition::PhaseIs {
            quest: quest.into(),
            phase,
        }
    }

    /// Negate a condition.
    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Condition) -> Self {
        Condition::Not(Box::new(inner))
    }
}

/// Equality that ignores ASCII case between two strings.
fn loose_eq(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::String(a), Value::String(b)) => a.eq_ignore_ascii_case(b),
        _ => actual == expected,
    }
}
