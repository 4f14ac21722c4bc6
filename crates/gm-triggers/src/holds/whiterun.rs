//! Whiterun: the city, Jorrvaskr, and Dragonsreach.

use gm_core::{CampaignState, QuestPhase};

use crate::dispatch::HoldModule;
use crate::global::{BATTLE_CLOCK, GREYMANE_QUEST};
use crate::rule::{Condition, Effect, Rule, RuleSet};

/// Module name.
pub const NAME: &str = "whiterun";

/// Dispatch keywords.
pub const KEYWORDS: &[&str] = &[
    "whiterun",
    "dragonsreach",
    "jorrvaskr",
    "plains district",
    "wind district",
    "cloud district",
    "bannered mare",
    "gildergreen",
    "skyforge",
];

/// Build the module.
pub fn module() -> HoldModule {
    HoldModule::new(NAME, KEYWORDS, rules())
}

/// Run the Whiterun rules for a token.
pub fn triggers(location: &str, state: &mut CampaignState) -> Vec<String> {
    module().triggers(location, state)
}

fn rules() -> RuleSet {
    RuleSet::new(vec![
        Rule::once("whiterun_arrival_done")
            .at(["whiterun"])
            .emit_if(
                Condition::not(Condition::Night),
                "Whiterun rises from the tundra, Dragonsreach crowning the hill. Guards in \
                 yellow watch the gate with bored suspicion.",
            )
            .emit_if(
                Condition::Night,
                "Torches gutter along Whiterun's walls. The gate guard holds up a lantern and \
                 asks your business in the city at this hour.",
            ),
        Rule::once("whiterun_battle_prep_done")
            .at(["whiterun", "dragonsreach"])
            .when(Condition::clock_at_least(BATTLE_CLOCK, 8))
            .emit(
                "GM NOTE: Barricades of carts and timber choke the Plains District. Irileth \
                 is drilling the guard at the gate.",
            ),
        Rule::once("plains_district_night_done")
            .at(["plains district"])
            .at_night()
            .emit(
                "The market stalls are shuttered. A drunk argues with the Gildergreen's \
                 shadow and a guard steers him home.",
            ),
        Rule::once("bannered_mare_rumors_done")
            .at(["bannered mare"])
            .emit("Hulda wipes the bar of the Bannered Mare and leans in with the latest talk.")
            .emit_with(bannered_mare_rumor),
        Rule::once("gildergreen_done")
            .at(["gildergreen", "wind district"])
            .emit(
                "The Gildergreen's blossoms drift over the Wind District. Danica Pure-Spring \
                 tends its roots and frets over its health.",
            ),
        Rule::once("jorrvaskr_intro_done")
            .at(["jorrvaskr"])
            .emit(
                "Mead hall noise spills out of Jorrvaskr: a brawl on the long tables, \
                 Companions cheering both sides.",
            )
            .emit_if(
                Condition::companion("aela"),
                "Aela catches your eye from the fight and grins. \"Home. Try to keep up.\"",
            )
            .emit_if(
                Condition::companion("farkas"),
                "Farkas wades in to break up the brawl, laughing.",
            ),
        Rule::once("greymane_jorrvaskr_foreshadow_done")
            .at(["jorrvaskr", "skyforge"])
            .when(Condition::phase_is(GREYMANE_QUEST, QuestPhase::Active))
            .emit(
                "[FORESHADOW] Eorlund Gray-Mane sets down his hammer at the Skyforge. \"My \
                 son is with the Legion's prisoners. If the walls fall, he dies in chains.\"",
            ),
        Rule::once("dragonsreach_audience_done")
            .at(["dragonsreach"])
            .emit(
                "Jarl Balgruuf the Greater lounges on his throne in Dragonsreach while \
                 Proventus Avenicci hovers with ledgers.",
            )
            .emit_if(
                Condition::alliance("Imperial"),
                "Balgruuf eyes your Legion colours. \"Tullius sent you? Then you know what \
                 he asks of me.\"",
            )
            .emit_if(
                Condition::alliance("Stormcloak"),
                "Irileth's hand drifts to her sword hilt as she notes your Stormcloak blue.",
            ),
        Rule::once("silver_hand_whiterun_contact_done")
            .at(["whiterun"])
            .when(Condition::QuestActive("silver_hand_contact".into()))
            .emit(
                "[SEED] A hooded figure brushes past in the market and presses a silver \
                 coin stamped with a hand into your palm.",
            )
            .then(Effect::RecordEvent(
                "The Silver Hand made contact in Whiterun".into(),
            )),
    ])
}

fn bannered_mare_rumor(state: &CampaignState) -> Vec<String> {
    let line = if state
        .str_at("post_dragon_crisis.status")
        .is_some_and(|s| s.eq_ignore_ascii_case("alduin_defeated"))
    {
        "\"They say the World-Eater is gone. Mikael's already writing a ballad, gods help us.\""
    } else if state
        .str_at("political_situation.skyrim_status")
        .is_some_and(|s| s.eq_ignore_ascii_case("civil_war"))
    {
        "\"The Jarl won't pick a side. Someone will pick it for him soon enough.\""
    } else {
        "\"Giants have been driving cattle off the Pelagia farm again.\""
    };
    vec![format!("Rumor: {line}")]
}
