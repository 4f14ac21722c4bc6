//! Hold modules and the location dispatcher.

use gm_core::CampaignState;

use crate::location::{LocationToken, MatchMode};
use crate::rule::{Pass, RuleContext, RuleSet};

/// Pass limit used when a hold module runs on its own.
pub const DEFAULT_SETTLE_PASSES: usize = 32;

/// A named group of rules selected by location keywords.
#[derive(Debug, Clone)]
pub struct HoldModule {
    name: &'static str,
    keywords: Vec<&'static str>,
    rules: RuleSet,
}

impl HoldModule {
    /// Create a module.
    pub fn new(name: &'static str, keywords: &[&'static str], rules: RuleSet) -> Self {
        Self {
            name,
            keywords: keywords.to_vec(),
            rules,
        }
    }

    /// Module name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registered keywords.
    pub fn keywords(&self) -> &[&'static str] {
        &self.keywords
    }

    /// The module's rules.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// True if the token hits any registered keyword.
    pub fn matches(&self, location: &LocationToken, mode: MatchMode) -> bool {
        location.matches_any(&self.keywords, mode)
    }

    /// One pass over the module's rules. The caller has already dispatched.
    pub fn run_pass(&self, ctx: &RuleContext<'_>, state: &mut CampaignState) -> Pass {
        self.rules.run_pass(ctx, state)
    }

    /// Run this module alone for a raw token, settling its rules.
    ///
    /// Returns nothing if the token is empty or does not hit the module's keywords.
    pub fn triggers(&self, location: &str, state: &mut CampaignState) -> Vec<String> {
        let Some(location) = LocationToken::parse(location) else {
            return Vec::new();
        };
        let mode = MatchMode::Coarse;
        if !self.matches(&location, mode) {
            return Vec::new();
        }
        let ctx = RuleContext {
            location: &location,
            mode,
        };
        self.rules.settle(&ctx, state, DEFAULT_SETTLE_PASSES)
    }
}

/// Routes a token to every matching hold module, in registration order.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    holds: Vec<HoldModule>,
}

impl Dispatcher {
    /// Build from modules in registration order.
    pub fn new(holds: Vec<HoldModule>) -> Self {
        Self { holds }
    }

    /// Register another module after the existing ones.
    pub fn register(&mut self, hold: HoldModule) {
        self.holds.push(hold);
    }

    /// All modules in registration order.
    pub fn holds(&self) -> &[HoldModule] {
        &self.holds
    }

    /// Module by name.
    pub fn hold(&self, name: &str) -> Option<&HoldModule> {
        self.holds.iter().find(|h| h.name.eq_ignore_ascii_case(name))
    }

    /// Modules whose keywords match the token.
    pub fn matching(&self, location: &LocationToken, mode: MatchMode) -> Vec<&HoldModule> {
        let selected: Vec<_> = self
            .holds
            .iter()
            .filter(|h| h.matches(location, mode))
            .collect();
        tracing::debug!(
            location = location.normalized(),
            holds = ?selected.iter().map(|h| h.name).collect::<Vec<_>>(),
            "dispatched"
        );
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(vec![
            HoldModule::new("solitude", &["solitude", "blue palace"], RuleSet::default()),
            HoldModule::new("windhelm", &["windhelm", "palace of the kings"], RuleSet::default()),
        ])
    }

    fn names(d: &Dispatcher, token: &str, mode: MatchMode) -> Vec<&'static str> {
        let t = LocationToken::parse(token).unwrap();
        d.matching(&t, mode).into_iter().map(HoldModule::name).collect()
    }

    #[test]
    fn registration_order() {
        let d = dispatcher();
        assert_eq!(names(&d, "solitude and windhelm", MatchMode::Coarse), vec!["solitude", "windhelm"]);
        assert_eq!(names(&d, "blue_palace", MatchMode::Coarse), vec!["solitude"]);
        assert!(names(&d, "markarth", MatchMode::Coarse).is_empty());
    }

    #[test]
    fn coarse_short_token_hits_several() {
        let d = dispatcher();
        assert_eq!(names(&d, "palace", MatchMode::Coarse), vec!["solitude", "windhelm"]);
        assert!(names(&d, "palace", MatchMode::Exact).is_empty());
    }

    #[test]
    fn module_triggers_require_its_keywords() {
        let hold = HoldModule::new(
            "solitude",
            &["solitude"],
            RuleSet::new(vec![Rule::once("s").emit("Solitude.")]),
        );
        let mut s = CampaignState::new();
        assert!(hold.triggers("riften", &mut s).is_empty());
        assert!(hold.triggers("   ", &mut s).is_empty());
        assert!(s.is_empty());
        assert_eq!(hold.triggers("solitude", &mut s), vec!["Solitude."]);
    }

    #[test]
    fn lookup_by_name() {
        let d = dispatcher();
        assert!(d.hold("Windhelm").is_some());
        assert!(d.hold("markarth").is_none());
    }
}
