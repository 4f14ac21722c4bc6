//! Windhelm: Ulfric Stormcloak's seat.

use gm_core::CampaignState;

use crate::dispatch::HoldModule;
use crate::global::{BATTLE_CLOCK, MARCH_THRESHOLD};
use crate::rule::{Condition, Rule, RuleSet};

/// Module name.
pub const NAME: &str = "windhelm";

/// Dispatch keywords.
pub const KEYWORDS: &[&str] = &[
    "windhelm",
    "palace of the kings",
    "gray quarter",
    "grey quarter",
    "candlehearth",
];

/// Build the module.
pub fn module() -> HoldModule {
    HoldModule::new(NAME, KEYWORDS, rules())
}

/// Run the Windhelm rules for a token.
pub fn triggers(location: &str, state: &mut CampaignState) -> Vec<String> {
    module().triggers(location, state)
}

fn rules() -> RuleSet {
    RuleSet::new(vec![
        Rule::once("windhelm_arrival_done")
            .at(["windhelm"])
            .emit("Windhelm's black stone walls loom over the frozen White River. The bridge guards look you over twice.")
            .emit_if(
                Condition::Night,
                "Snow hisses in the braziers. Somewhere in the Stone Quarter a woman screams, \
                 then silence.",
            ),
        Rule::once("palace_of_the_kings_audience_done")
            .at(["palace of the kings"])
            .emit("Ulfric Stormcloak sits beneath the Jagged Crown's empty niche, Galmar Stone-Fist at his side.")
            .emit_if(
                Condition::alliance("Stormcloak"),
                "Ulfric rises to clasp your arm. \"A true son of Skyrim. Galmar has work for you.\"",
            )
            .emit_if(
                Condition::alliance("Imperial"),
                "Galmar spits at your feet. \"The Empire's dog walks into our hall. Bold, or stupid.\"",
            ),
        Rule::once("windhelm_war_council_done")
            .at(["palace of the kings"])
            .when(Condition::alliance("Stormcloak"))
            .when(Condition::clock_at_least(BATTLE_CLOCK, MARCH_THRESHOLD))
            .emit(
                "[FORESHADOW] Ulfric traces a line to Whiterun on the map. \"Balgruuf had his \
                 chance. Now he has an army at his gate.\"",
            ),
        Rule::once("gray_quarter_done")
            .at(["gray quarter", "grey quarter"])
            .emit("Dunmer refugees crowd the Gray Quarter. A Nord drunk shouts at them to go back to Morrowind."),
        Rule::once("candlehearth_night_done")
            .at(["candlehearth"])
            .at_night()
            .emit("Rumor: Elda Early-Dawn hears the Butcher struck again near the Hall of the Dead."),
    ])
}
