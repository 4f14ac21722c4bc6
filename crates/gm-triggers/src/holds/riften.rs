//! Riften and the Thieves Guild.

use gm_core::CampaignState;

use crate::dispatch::HoldModule;
use crate::rule::{Condition, Rule, RuleSet};

/// Module name.
pub const NAME: &str = "riften";

/// Dispatch keywords.
pub const KEYWORDS: &[&str] = &[
    "riften",
    "ratway",
    "ragged flagon",
    "mistveil",
    "bee and barb",
];

/// Build the module.
pub fn module() -> HoldModule {
    HoldModule::new(NAME, KEYWORDS, rules())
}

/// Run the Riften rules for a token.
pub fn triggers(location: &str, state: &mut CampaignState) -> Vec<String> {
    module().triggers(location, state)
}

fn guild() -> Condition {
    Condition::player("thieves_guild_member")
}

fn rules() -> RuleSet {
    RuleSet::new(vec![
        Rule::once("riften_arrival_done")
            .at(["riften"])
            .emit_if(
                Condition::not(guild()),
                "The gate guard holds out a palm. \"Visitor's tax. Everyone pays.\" It is \
                 obviously a shakedown.",
            )
            .emit_if(
                guild(),
                "The gate guard sees the Guild's mark on you and waves you through without a word.",
            ),
        Rule::once("ragged_flagon_intro_done")
            .at(["ragged flagon", "ratway"])
            .when(Condition::not(guild()))
            .emit("Brynjolf leans on the Flagon's bar. \"Never done an honest day's work, have you? I can tell.\""),
        Rule::once("ragged_flagon_member_done")
            .at(["ragged flagon"])
            .when(guild())
            .emit("Delvin Mallory slides a list of jobs across the table. Vekel pours without being asked."),
        Rule::once("mistveil_keep_done")
            .at(["mistveil"])
            .emit("Jarl Laila Law-Giver holds court in Mistveil Keep while her steward Anuriel counts coin.")
            .emit_if(
                Condition::alliance("Imperial"),
                "Laila's housecarl Unmid mutters that the Legion has no friends in the Rift.",
            ),
        Rule::once("bee_and_barb_rumors_done")
            .at(["bee and barb"])
            .emit("Rumor: Keerava says Maven Black-Briar owns half the guards and all the mead."),
    ])
}
