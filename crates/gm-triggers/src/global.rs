//! Cross-hold events that run ahead of any hold module.

use gm_core::QuestPhase;

use crate::rule::{Condition, Effect, Rule, RuleSet};

/// Countdown to the Battle of Whiterun.
pub const BATTLE_CLOCK: &str = "battle_of_whiterun_countdown";
/// Countdown to the Silver Hand's reprisal against the Companions.
pub const RETALIATION_CLOCK: &str = "silver_hand_retaliation";
/// Companion quest unlocked by the march announcement.
pub const GREYMANE_QUEST: &str = "greymane_and_the_greater";
/// Once-flag of the march announcement.
pub const MARCH_FLAG: &str = "battle_of_whiterun_march_announcement_done";
/// Progress at which the armies march.
pub const MARCH_THRESHOLD: i64 = 6;

/// Tokens that count as a settlement for announcements.
pub const SETTLEMENT_KEYWORDS: &[&str] = &[
    "whiterun",
    "windhelm",
    "riften",
    "solitude",
    "markarth",
    "winterhold",
    "morthal",
    "falkreath",
    "dawnstar",
    "city",
    "town",
    "village",
    "district",
    "gate",
    "market",
    "inn",
    "keep",
    "dragonsreach",
];

fn in_settlement() -> Condition {
    Condition::at(SETTLEMENT_KEYWORDS.iter().copied())
}

/// The global rule set, in firing order.
pub fn rules() -> RuleSet {
    RuleSet::new(vec![
        Rule::once(MARCH_FLAG)
            .when(Condition::clock_at_least(BATTLE_CLOCK, MARCH_THRESHOLD))
            .emit_if(
                in_settlement(),
                "[TOWN CRIER] \"Hear ye! The Legion and the Stormcloaks both march on Whiterun! \
                 Jarl Balgruuf calls every able sword to the walls!\"",
            )
            .emit_if(
                Condition::not(in_settlement()),
                "[COURIER] A winded courier flags the party down: \"Armies on the move toward \
                 Whiterun. The Jarl wants anyone who can hold a blade.\"",
            )
            .then(Effect::when(
                Condition::phase_is(GREYMANE_QUEST, QuestPhase::Memory),
                vec![
                    Effect::AdvancePhase {
                        quest: GREYMANE_QUEST.into(),
                        phase: QuestPhase::Active,
                    },
                    Effect::emit(
                        "[QUEST ACTIVATED] Greymane and the Greater: Eorlund Gray-Mane asks the \
                         party to find his son before the fighting reaches the gates.",
                    ),
                ],
            )),
        Rule::once("battle_of_whiterun_foreshadow_done")
            .when(Condition::clock_at_least(BATTLE_CLOCK, 3))
            .when(Condition::not(Condition::clock_at_least(
                BATTLE_CLOCK,
                MARCH_THRESHOLD,
            )))
            .emit(
                "[FORESHADOW] Patrols thicken on the Whiterun roads. Legion and Stormcloak \
                 scouts pass each other without a word.",
            ),
        Rule::once("battle_of_whiterun_begins_done")
            .when(Condition::ClockFull(BATTLE_CLOCK.into()))
            .emit(
                "GM NOTE: The Battle of Whiterun begins. Run the siege at the next scene change \
                 regardless of where the party stands.",
            )
            .then(Effect::set_path(
                "civil_war_state.battle_of_whiterun_status",
                "underway",
            ))
            .then(Effect::RecordEvent("The Battle of Whiterun began".into())),
        Rule::once("silver_hand_retaliation_foreshadow_done")
            .when(Condition::clock_at_least(RETALIATION_CLOCK, 2))
            .emit(
                "[FORESHADOW] A Silver Hand scout watches the party from a ridge and is gone \
                 before anyone can give chase.",
            ),
        Rule::once("silver_hand_retaliation_strike_done")
            .when(Condition::ClockFull(RETALIATION_CLOCK.into()))
            .emit(
                "GM NOTE: The Silver Hand strikes Jorrvaskr while the Circle is away. Queue the \
                 aftermath scene for the party's next visit to Whiterun.",
            )
            .then(Effect::RecordEvent("The Silver Hand attacked Jorrvaskr".into())),
    ])
}
