//! Effects applied when a rule fires.
//!
//! Effects never fail the invocation. A write that hits a wrong-typed
//! container is logged and skipped.

use gm_core::quest::{self, QuestPhase};
use gm_core::{CampaignState, StateResult, clock, flags};
use serde_json::Value;

use super::RuleContext;
use super::condition::Condition;

/// Computes narrative lines from the state (voice tables, rumor pickers).
pub type LineFn = fn(&CampaignState) -> Vec<String>;

/// A mutation or emission performed by a firing rule.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Emit a fixed narrative line.
    Emit(String),
    /// Emit lines computed from the state at firing time.
    EmitWith(LineFn),
    /// Set a scene flag to `true`.
    SetFlag(String),
    /// Set a scene flag to a scalar.
    SetFlagValue {
        /// Flag name.
        flag: String,
        /// Value.
        value: Value,
    },
    /// Create a clock if it does not exist.
    EnsureClock {
        /// Clock id.
        clock: String,
        /// Display name.
        name: String,
        /// Maximum progress.
        max: i64,
    },
    /// Advance a clock by a (possibly negative) delta.
    AdvanceClock {
        /// Clock id.
        clock: String,
        /// Delta.
        delta: i64,
    },
    /// Push a quest id onto `quests.active` unless already present.
    ActivateQuest(String),
    /// Move a quest to `quests.completed`.
    CompleteQuest(String),
    /// Push a quest record onto `quests.active` unless already present.
    SeedQuest(Value),
    /// Move a companion quest forward to a phase.
    AdvancePhase {
        /// Quest id.
        quest: String,
        /// Target phase.
        phase: QuestPhase,
    },
    /// Set the value at a dotted path.
    SetPath {
        /// Dotted path.
        path: String,
        /// New value.
        value: Value,
    },
    /// Append a line to `major_events`.
    RecordEvent(String),
    /// Apply nested effects only if the condition holds at this point.
    When(Condition, Vec<Effect>),
}

impl Effect {
    /// Apply the effect, appending any emitted lines to `out`.
    pub fn apply(&self, ctx: &RuleContext<'_>, state: &mut CampaignState, out: &mut Vec<String>) {
        let result: StateResult<()> = match self {
            Effect::Emit(line) => {
                out.push(line.clone());
                Ok(())
            }
            Effect::EmitWith(lines) => {
                out.extend(lines(state));
                Ok(())
            }
            Effect::SetFlag(flag) => {
                flags::mark(state, flag);
                Ok(())
            }
            Effect::SetFlagValue { flag, value } => {
                flags::mark_value(state, flag, value.clone());
                Ok(())
            }
            Effect::EnsureClock { clock: id, name, max } => {
                clock::ensure(state, id, name, *max).map(drop)
            }
            Effect::AdvanceClock { clock: id, delta } => {
                clock::advance(state, id, *delta).map(|step| {
                    tracing::debug!(
                        clock = %id,
                        previous = step.previous,
                        current = step.current,
                        "clock advanced"
                    );
                })
            }
            Effect::ActivateQuest(id) => quest::activate(state, id).map(drop),
            Effect::CompleteQuest(id) => quest::complete(state, id).map(drop),
            Effect::SeedQuest(record) => match quest::QuestEntry::from_value(record) {
                Some(entry) => quest::activate_entry(state, entry).map(drop),
                None => {
                    tracing::warn!(record = %record, "quest record without id");
                    Ok(())
                }
            },
            Effect::AdvancePhase { quest: q, phase } => {
                quest::advance_phase(state, q, *phase).map(drop)
            }
            Effect::SetPath { path, value } => state.set_path(path, value.clone()).map(drop),
            Effect::RecordEvent(event) => state
                .array_mut("major_events")
                .map(|events| events.push(Value::String(event.clone()))),
            Effect::When(condition, effects) => {
                if condition.evaluate(ctx, state) {
                    for effect in effects {
                        effect.apply(ctx, state, out);
                    }
                }
                Ok(())
            }
        };
        if let Err(err) = result {
            tracing::warn!(error = %err, "effect skipped");
        }
    }

    /// Emit a fixed line.
    pub fn emit(line: impl Into<String>) -> Self {
        Effect::Emit(line.into())
    }

    /// Set a dotted path.
    pub fn set_path(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Effect::SetPath {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Advance a clock.
    pub fn advance_clock(clock: impl Into<String>, delta: i64) -> Self {
        Effect::AdvanceClock {
            clock: clock.into(),
            delta,
        }
    }

    /// Conditional group.
    pub fn when(condition: Condition, effects: Vec<Effect>) -> Self {
        Effect::When(condition, effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LocationToken, MatchMode};
    use serde_json::json;

    fn run(effects: &[Effect], s: &mut CampaignState) -> Vec<String> {
        let location = LocationToken::parse("whiterun").unwrap();
        let ctx = RuleContext {
            location: &location,
            mode: MatchMode::Coarse,
        };
        let mut out = Vec::new();
        for e in effects {
            e.apply(&ctx, s, &mut out);
        }
        out
    }

    #[test]
    fn emits_in_order() {
        let mut s = CampaignState::new();
        let out = run(
            &[
                Effect::emit("one"),
                Effect::EmitWith(|_| vec!["two".into(), "three".into()]),
            ],
            &mut s,
        );
        assert_eq!(out, vec!["one", "two", "three"]);
        assert!(s.is_empty());
    }

    #[test]
    fn quest_and_clock_effects() {
        let mut s = CampaignState::new();
        run(
            &[
                Effect::EnsureClock {
                    clock: "hunt".into(),
                    name: "Hunt".into(),
                    max: 4,
                },
                Effect::advance_clock("hunt", 9),
                Effect::ActivateQuest("q".into()),
                Effect::SeedQuest(json!({"id": "r", "giver": "Aela"})),
                Effect::CompleteQuest("q".into()),
                Effect::AdvancePhase {
                    quest: "g".into(),
                    phase: QuestPhase::Memory,
                },
                Effect::set_path("civil_war_state.battle_of_whiterun_status", "underway"),
                Effect::RecordEvent("the march began".into()),
            ],
            &mut s,
        );
        assert_eq!(clock::progress(&s, "hunt"), Some(4));
        assert!(quest::is_completed(&s, "q"));
        assert!(quest::is_active(&s, "r"));
        assert_eq!(quest::phase(&s, "g"), Some(QuestPhase::Memory));
        assert_eq!(s.str_at("civil_war_state.battle_of_whiterun_status"), Some("underway"));
        assert_eq!(s.get("major_events"), Some(&json!(["the march began"])));
    }

    #[test]
    fn missing_clock_is_skipped() {
        let mut s = CampaignState::new();
        let out = run(&[Effect::advance_clock("nope", 1), Effect::emit("after")], &mut s);
        assert_eq!(out, vec!["after"]);
        assert!(s.get("clocks").is_none());
    }

    #[test]
    fn conditional_group_sees_earlier_writes() {
        let mut s = CampaignState::new();
        let out = run(
            &[
                Effect::SetFlag("a".into()),
                Effect::when(Condition::flag("a"), vec![Effect::emit("saw a")]),
                Effect::when(Condition::flag("b"), vec![Effect::emit("saw b")]),
            ],
            &mut s,
        );
        assert_eq!(out, vec!["saw a"]);
    }

    #[test]
    fn wrong_typed_container_is_left_alone() {
        let mut s = CampaignState::from_value(json!({"major_events": "lots"})).unwrap();
        run(&[Effect::RecordEvent("x".into())], &mut s);
        assert_eq!(s.get("major_events"), Some(&json!("lots")));
    }
}
