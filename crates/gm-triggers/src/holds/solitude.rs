//! Solitude: capital of Haafingar and seat of the Imperial Legion.

use gm_core::CampaignState;

use crate::dispatch::HoldModule;
use crate::global::{BATTLE_CLOCK, MARCH_THRESHOLD};
use crate::rule::{Condition, Rule, RuleSet};

/// Module name.
pub const NAME: &str = "solitude";

/// Dispatch keywords.
pub const KEYWORDS: &[&str] = &[
    "solitude",
    "blue palace",
    "castle dour",
    "east empire",
    "winking skeever",
];

/// Build the module.
pub fn module() -> HoldModule {
    HoldModule::new(NAME, KEYWORDS, rules())
}

/// Run the Solitude rules for a token.
pub fn triggers(location: &str, state: &mut CampaignState) -> Vec<String> {
    module().triggers(location, state)
}

fn rules() -> RuleSet {
    RuleSet::new(vec![
        Rule::once("solitude_execution_done")
            .at(["solitude"])
            .emit(
                "A crowd fills the square below the arch. Roggvir kneels at the block for \
                 opening the gates to Ulfric.",
            )
            .emit_if(
                Condition::alliance("Stormcloak"),
                "Roggvir's last words ring out: \"Skyrim should be free!\" A few in the crowd \
                 glance at your colours and look away.",
            ),
        Rule::once("blue_palace_audience_done")
            .at(["blue palace"])
            .emit("High Queen Elisif receives petitioners in the Blue Palace, Falk Firebeard at her shoulder.")
            .emit_if(
                Condition::alliance("Imperial"),
                "GM NOTE: Elisif asks the party to recover Torygg's war horn from Wolfskull Cave.",
            ),
        Rule::once("castle_dour_enlist_done")
            .at(["castle dour"])
            .when(Condition::alliance("Imperial"))
            .emit("General Tullius looks up from his war map. \"Good. I need soldiers, not speeches.\"")
            .emit_if(
                Condition::clock_at_least(BATTLE_CLOCK, MARCH_THRESHOLD),
                "[FORESHADOW] Tullius taps Whiterun on the map. \"Balgruuf chose too late. We \
                 march within the week.\"",
            ),
        Rule::once("castle_dour_stormcloak_warning_done")
            .at(["castle dour"])
            .when(Condition::alliance("Stormcloak"))
            .emit("Legionaries at Castle Dour's gate cross their spears. \"Not one step further, rebel.\""),
        Rule::once("east_empire_docks_done")
            .at(["east empire"])
            .emit("Ships crowd the East Empire Company docks. Thalmor agents watch every cargo that comes ashore."),
        Rule::once("winking_skeever_night_done")
            .at(["winking skeever"])
            .at_night()
            .emit("Rumor: Sorex Vinius swears a bard's ghost haunts the Wolf Queen's old tower."),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn palace_without_city_word() {
        let mut s = CampaignState::new();
        let out = triggers("blue_palace", &mut s);
        assert_eq!(out.len(), 1);
        assert!(out[0].contains("Elisif"));
    }

    #[test]
    fn multi_concept_token_runs_all_rules() {
        let mut s = CampaignState::from_value(json!({
            "civil_war_state": {"player_alliance": "Imperial"}
        }))
        .unwrap();
        let out = triggers("solitude blue palace", &mut s);
        assert_eq!(out.len(), 3);
        assert!(out[2].starts_with("GM NOTE:"));
    }

    #[test]
    fn castle_dour_by_faction() {
        let mut s = CampaignState::from_value(json!({
            "civil_war_state": {"player_alliance": "Stormcloak"},
            "clocks": {BATTLE_CLOCK: {"current_progress": 7, "max": 10}}
        }))
        .unwrap();
        let out = triggers("castle dour", &mut s);
        assert_eq!(out.len(), 1);
        assert!(out[0].contains("rebel"));
    }
}
