//! Declarative trigger rules and their evaluator.
//!
//! A rule is an id, one or more once-flags, a conjunction of guards, and an
//! ordered list of effects. The evaluator is the only place that checks and
//! marks once-flags, so every rule is at-most-once per flag by construction.

mod condition;
mod effect;

pub use condition::Condition;
pub use effect::{Effect, LineFn};

use gm_core::{CampaignState, flags};

use crate::location::{LocationToken, MatchMode};

/// What a rule sees besides the state.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// The normalised location token.
    pub location: &'a LocationToken,
    /// Keyword matching mode.
    pub mode: MatchMode,
}

/// A once-only trigger rule.
#[derive(Debug, Clone)]
pub struct Rule {
    id: String,
    once: Vec<String>,
    guards: Vec<Condition>,
    effects: Vec<Effect>,
}

impl Rule {
    /// Start a rule owning `flag`. The flag doubles as the rule id.
    pub fn once(flag: impl Into<String>) -> Self {
        let flag = flag.into();
        Self {
            id: flag.clone(),
            once: vec![flag],
            guards: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Also own another flag; the rule is blocked if any owned flag is set.
    pub fn and_once(mut self, flag: impl Into<String>) -> Self {
        self.once.push(flag.into());
        self
    }

    /// Add a guard.
    pub fn when(mut self, condition: Condition) -> Self {
        self.guards.push(condition);
        self
    }

    /// Guard on the token matching any keyword.
    pub fn at<I, S>(self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.when(Condition::at(keywords))
    }

    /// Guard on night time.
    pub fn at_night(self) -> Self {
        self.when(Condition::Night)
    }

    /// Guard on another scene flag being unset.
    pub fn unless(self, flag: impl Into<String>) -> Self {
        self.when(Condition::unset(flag))
    }

    /// Add an effect.
    pub fn then(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Emit a fixed line.
    pub fn emit(self, line: impl Into<String>) -> Self {
        self.then(Effect::emit(line))
    }

    /// Emit lines computed from the state.
    pub fn emit_with(self, lines: LineFn) -> Self {
        self.then(Effect::EmitWith(lines))
    }

    /// Emit a line only if a condition holds when the rule fires.
    pub fn emit_if(self, condition: Condition, line: impl Into<String>) -> Self {
        self.then(Effect::when(condition, vec![Effect::emit(line)]))
    }

    /// Rule id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Owned once-flags.
    pub fn once_flags(&self) -> &[String] {
        &self.once
    }

    /// Guards.
    pub fn guards(&self) -> &[Condition] {
        &self.guards
    }

    /// Effects.
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// No owned flag is set and every guard holds.
    pub fn is_ready(&self, ctx: &RuleContext<'_>, state: &CampaignState) -> bool {
        !self.once.iter().any(|flag| flags::seen(state, flag))
            && self.guards.iter().all(|g| g.evaluate(ctx, state))
    }

    /// Fire the rule if ready. Returns the emitted lines, or `None` if it did not fire.
    ///
    /// Once-flags are marked before effects run. If no flag could be marked
    /// (wrong-typed `scene_flags`) the rule does not fire.
    pub fn fire(&self, ctx: &RuleContext<'_>, state: &mut CampaignState) -> Option<Vec<String>> {
        if !self.is_ready(ctx, state) {
            return None;
        }
        let mut claimed = false;
        for flag in &self.once {
            claimed |= flags::mark(state, flag);
        }
        if !claimed {
            return None;
        }
        let mut out = Vec::new();
        for effect in &self.effects {
            effect.apply(ctx, state, &mut out);
        }
        tracing::debug!(rule = %self.id, lines = out.len(), "rule fired");
        Some(out)
    }
}

/// Result of one pass over a rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pass {
    /// Emitted lines in order.
    pub lines: Vec<String>,
    /// Number of rules that fired.
    pub fired: usize,
}

impl Pass {
    /// Fold another pass into this one.
    pub fn absorb(&mut self, other: Pass) {
        self.lines.extend(other.lines);
        self.fired += other.fired;
    }
}

/// An ordered list of rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build from rules in declaration order.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Rules in order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run each rule once in declaration order. Later rules see earlier mutations.
    pub fn run_pass(&self, ctx: &RuleContext<'_>, state: &mut CampaignState) -> Pass {
        let mut pass = Pass::default();
        for rule in &self.rules {
            if let Some(lines) = rule.fire(ctx, state) {
                pass.lines.extend(lines);
                pass.fired += 1;
            }
        }
        pass
    }

    /// Repeat passes until none fires, up to `max_passes`.
    pub fn settle(
        &self,
        ctx: &RuleContext<'_>,
        state: &mut CampaignState,
        max_passes: usize,
    ) -> Vec<String> {
        let mut lines = Vec::new();
        for _ in 0..max_passes {
            let pass = self.run_pass(ctx, state);
            lines.extend(pass.lines);
            if pass.fired == 0 {
                return lines;
            }
        }
        tracing::warn!(max_passes, "rule set still firing at pass limit");
        lines
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(location: &LocationToken) -> RuleContext<'_> {
        RuleContext {
            location,
            mode: MatchMode::Coarse,
        }
    }

    #[test]
    fn fires_once() {
        let loc = LocationToken::parse("whiterun").unwrap();
        let rule = Rule::once("arrival_done").at(["whiterun"]).emit("The gates open.");
        let mut s = CampaignState::new();
        assert_eq!(rule.fire(&ctx(&loc), &mut s), Some(vec!["The gates open.".to_string()]));
        assert!(flags::seen(&s, "arrival_done"));
        assert_eq!(rule.fire(&ctx(&loc), &mut s), None);
    }

    #[test]
    fn guard_failure_leaves_state_alone() {
        let loc = LocationToken::parse("riften").unwrap();
        let rule = Rule::once("arrival_done").at(["whiterun"]).emit("x");
        let mut s = CampaignState::new();
        assert_eq!(rule.fire(&ctx(&loc), &mut s), None);
        assert!(s.is_empty());
    }

    #[test]
    fn any_owned_flag_blocks() {
        let loc = LocationToken::parse("whiterun").unwrap();
        let rule = Rule::once("a").and_once("legacy_a").emit("x");
        let mut s = CampaignState::from_value(json!({"scene_flags": {"legacy_a": true}})).unwrap();
        assert_eq!(rule.fire(&ctx(&loc), &mut s), None);
    }

    #[test]
    fn broken_flag_container_blocks_firing() {
        let loc = LocationToken::parse("whiterun").unwrap();
        let rule = Rule::once("a").emit("x").then(Effect::ActivateQuest("q".into()));
        let mut s = CampaignState::from_value(json!({"scene_flags": "oops"})).unwrap();
        let before = s.clone();
        assert_eq!(rule.fire(&ctx(&loc), &mut s), None);
        assert_eq!(s, before);
    }

    #[test]
    fn later_rules_observe_earlier_mutations() {
        let loc = LocationToken::parse("whiterun").unwrap();
        let set = RuleSet::new(vec![
            Rule::once("first").emit("1"),
            Rule::once("second").when(Condition::flag("first")).emit("2"),
        ]);
        let mut s = CampaignState::new();
        let pass = set.run_pass(&ctx(&loc), &mut s);
        assert_eq!(pass.lines, vec!["1", "2"]);
        assert_eq!(pass.fired, 2);
    }

    #[test]
    fn settle_picks_up_rules_enabled_later() {
        let loc = LocationToken::parse("whiterun").unwrap();
        let set = RuleSet::new(vec![
            Rule::once("second").when(Condition::flag("first")).emit("2"),
            Rule::once("first").emit("1"),
        ]);
        let mut s = CampaignState::new();
        assert_eq!(set.run_pass(&ctx(&loc), &mut s.clone()).lines, vec!["1"]);
        assert_eq!(set.settle(&ctx(&loc), &mut s, 8), vec!["1", "2"]);
        assert!(set.settle(&ctx(&loc), &mut s, 8).is_empty());
    }
}
