//! Saarthal excavation.

use gm_core::CampaignState;

use crate::dispatch::HoldModule;
use crate::holds::college::SAARTHAL_QUEST;
use crate::rule::{Condition, Effect, Rule, RuleSet};

/// Module name.
pub const NAME: &str = "saarthal";

/// Dispatch keywords.
pub const KEYWORDS: &[&str] = &["saarthal"];

/// Build the module.
pub fn module() -> HoldModule {
    HoldModule::new(NAME, KEYWORDS, rules())
}

/// Run the Saarthal rules for a token.
pub fn triggers(location: &str, state: &mut CampaignState) -> Vec<String> {
    module().triggers(location, state)
}

fn rules() -> RuleSet {
    let on_quest = || Condition::QuestActive(SAARTHAL_QUEST.into());
    RuleSet::new(vec![
        Rule::once("saarthal_entrance_done")
            .at(["saarthal"])
            .emit(
                "Scaffolding and picks litter the mouth of Saarthal. Cold air breathes out of \
                 the ruin like something asleep.",
            )
            .emit_if(
                on_quest(),
                "Tolfdir waves the apprentices forward. \"Mind the walls. Nords didn't build \
                 with visitors in mind.\"",
            ),
        Rule::once("saarthal_amulet_done")
            .at(["amulet", "eye", "orb", "depths"])
            .emit(
                "[FORESHADOW] Behind a collapsed wall, a great orb of light turns slowly in a \
                 ring of stone. The Eye of Magnus has been waiting.",
            )
            .emit(
                "GM NOTE: Time stops for the nearest PC. A Psijic monk, Nerien, delivers his \
                 warning and vanishes.",
            )
            .then(Effect::RecordEvent("The Eye of Magnus was found in Saarthal".into()))
            .then(Effect::when(
                on_quest(),
                vec![
                    Effect::CompleteQuest(SAARTHAL_QUEST.into()),
                    Effect::emit("GM NOTE: Under Saarthal is complete. Tolfdir sends word to the Arch-Mage."),
                ],
            )),
        Rule::once("saarthal_jyrik_done")
            .at(["jyrik", "depths"])
            .when(Condition::flag("saarthal_amulet_done"))
            .emit(
                "Jyrik Gauldurson breaks from his ice and rises, wreathed in warding magic \
                 drawn from the Eye.",
            ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use gm_core::quest;
    use serde_json::json;

    #[test]
    fn entrance_with_quest() {
        let mut s = CampaignState::from_value(json!({"quests": {"active": [SAARTHAL_QUEST]}})).unwrap();
        let out = triggers("saarthal", &mut s);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn depths_complete_quest_and_wake_jyrik() {
        let mut s = CampaignState::from_value(json!({"quests": {"active": [SAARTHAL_QUEST]}})).unwrap();
        let out = triggers("saarthal depths", &mut s);
        assert!(out[0].starts_with("Scaffolding"));
        assert!(out.iter().any(|l| l.starts_with("[FORESHADOW]")));
        assert!(out.last().is_some_and(|l| l.starts_with("Jyrik")));
        assert!(quest::is_completed(&s, SAARTHAL_QUEST));
        assert!(triggers("saarthal depths", &mut s).is_empty());
    }

    #[test]
    fn jyrik_waits_for_the_eye() {
        let mut s = CampaignState::new();
        let out = triggers("saarthal_jyrik", &mut s);
        assert_eq!(out.len(), 1);
    }
}
