//! Winterhold and the College of Winterhold.

use gm_core::CampaignState;

use crate::dispatch::HoldModule;
use crate::rule::{Condition, Effect, Rule, RuleSet};

/// Module name.
pub const NAME: &str = "winterhold";

/// Dispatch keywords.
pub const KEYWORDS: &[&str] = &[
    "winterhold",
    "college",
    "arcanaeum",
    "hall of the elements",
    "frozen hearth",
    "midden",
];

/// Quest the College hands its new members.
pub const SAARTHAL_QUEST: &str = "under_saarthal";

/// Build the module.
pub fn module() -> HoldModule {
    HoldModule::new(NAME, KEYWORDS, rules())
}

/// Run the Winterhold rules for a token.
pub fn triggers(location: &str, state: &mut CampaignState) -> Vec<String> {
    module().triggers(location, state)
}

fn member() -> Condition {
    Condition::player("college_member")
}

fn rules() -> RuleSet {
    RuleSet::new(vec![
        Rule::once("winterhold_arrival_done")
            .at(["winterhold"])
            .emit(
                "What is left of Winterhold huddles at the cliff's edge. Half the town slid \
                 into the Sea of Ghosts during the Great Collapse.",
            )
            .emit_if(
                Condition::Night,
                "The aurora ripples green over the College bridge, bright enough to cast shadows.",
            ),
        Rule::once("college_gate_test_done")
            .at(["college"])
            .when(Condition::not(member()))
            .emit(
                "Faralda blocks the broken bridge. \"The College is open to those with talent. \
                 Show me a spell, and you may pass.\"",
            ),
        Rule::once("college_member_welcome_done")
            .at(["college", "hall of the elements"])
            .when(member())
            .emit("Apprentices nod as you cross the courtyard. The Hall of the Elements hums with practice.")
            .emit_if(
                Condition::PathAtLeast {
                    path: "player.college_rank".into(),
                    value: 3,
                },
                "Tolfdir bows, half joking. \"Arch-Mage. The Council is waiting for you, \
                 whenever you can spare them a minute.\"",
            ),
        Rule::once(format!("{SAARTHAL_QUEST}_seeded"))
            .at(["college", "hall of the elements"])
            .when(member())
            .when(Condition::not(Condition::QuestCompleted(SAARTHAL_QUEST.into())))
            .then(Effect::ActivateQuest(SAARTHAL_QUEST.into()))
            .emit(
                "[QUEST ACTIVATED] Under Saarthal: Tolfdir is leading apprentices to the \
                 excavation at Saarthal and wants you along.",
            ),
        Rule::once("staff_of_cinders_resonance_done")
            .at(["college", "hall of the elements", "arcanaeum"])
            .when(Condition::player("has_staff_of_cinders"))
            .emit(
                "[FORESHADOW] The Staff of Cinders grows warm in your hands. Somewhere beneath \
                 the College, something answers.",
            ),
        Rule::once("arcanaeum_urag_done")
            .at(["arcanaeum"])
            .emit(
                "Urag gro-Shub glares over a stack of tomes. \"Touch nothing without asking. \
                 Ask nothing without a reason.\"",
            ),
        Rule::once("midden_night_done")
            .at(["midden"])
            .at_night()
            .emit("Below the College, the Midden drips. Something scuttles in the ice where the torchlight ends.")
            .emit("GM NOTE: An atronach forge sits unattended in the Midden Dark. Nobody up top admits to using it."),
        Rule::once("frozen_hearth_done")
            .at(["frozen hearth"])
            .emit("Dagur tends the fire at the Frozen Hearth, complaining about mages who never pay for their mead."),
    ])
}
