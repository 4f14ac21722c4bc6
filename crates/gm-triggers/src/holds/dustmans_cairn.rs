//! Dustman's Cairn: the Companions' proving barrow.
//!
//! Every room is one-shot. The shield-sibling who came along (Aela, Vilkas,
//! or Farkas) comments in each room; see [`partner`] for how they are chosen.

use gm_core::{CampaignState, companion, flags};
use serde_json::json;

use crate::dispatch::HoldModule;
use crate::global::RETALIATION_CLOCK;
use crate::rule::{Condition, Effect, Rule, RuleSet};

/// Module name.
pub const NAME: &str = "dustmans_cairn";

/// Dispatch keywords.
pub const KEYWORDS: &[&str] = &["dustman"];

/// Scene flag naming the partner for this run.
pub const PARTNER_FLAG: &str = "dustmans_partner";

/// Quest seeded at the Silver Hand camp.
pub const SILVER_HAND_QUEST: &str = "silver_hand_contact";

/// The shield-sibling accompanying the party.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partner {
    /// Aela the Huntress.
    Aela,
    /// Vilkas.
    Vilkas,
    /// Farkas.
    Farkas,
}

impl Partner {
    const ALL: [Partner; 3] = [Partner::Aela, Partner::Vilkas, Partner::Farkas];

    fn key(self) -> &'static str {
        match self {
            Partner::Aela => "aela",
            Partner::Vilkas => "vilkas",
            Partner::Farkas => "farkas",
        }
    }

    fn find_in(text: &str) -> Option<Self> {
        let text = text.to_lowercase();
        Self::ALL.into_iter().find(|p| text.contains(p.key()))
    }
}

/// `scene_flags.dustmans_partner`, else the first shield-sibling in the
/// party, else Farkas.
pub fn partner(state: &CampaignState) -> Partner {
    if let Some(p) = flags::str_value(state, PARTNER_FLAG).and_then(Partner::find_in) {
        return p;
    }
    companion::active(state)
        .iter()
        .find_map(|c| Partner::find_in(&c.name).or_else(|| c.npc_id.as_deref().and_then(Partner::find_in)))
        .unwrap_or(Partner::Farkas)
}

#[derive(Debug, Clone, Copy)]
enum Room {
    Entrance,
    Anteroom,
    Ossuary,
    Camp,
    Chamber,
}

fn bark(state: &CampaignState, room: Room) -> String {
    let line = match (partner(state), room) {
        (Partner::Aela, Room::Entrance) => "Aela: \"Smell that? Old dead and fresh blood. Someone's been here before us.\"",
        (Partner::Vilkas, Room::Entrance) => "Vilkas: \"Stay sharp. Kodlak didn't send us here for the scenery.\"",
        (Partner::Farkas, Room::Entrance) => "Farkas: \"Dark in there. I like dark.\"",
        (Partner::Aela, Room::Anteroom) => "Aela: \"Those blades swing on a pattern. Watch, then move.\"",
        (Partner::Vilkas, Room::Anteroom) => "Vilkas: \"Nords built these to keep thieves out. Don't be a thief.\"",
        (Partner::Farkas, Room::Anteroom) => "Farkas: \"I'll pull the lever. What's the worst that happens?\"",
        (Partner::Aela, Room::Ossuary) => "Aela: \"Draugr don't sleep light. Keep your voice down.\"",
        (Partner::Vilkas, Room::Ossuary) => "Vilkas: \"Ysgramor's heirs, rotting in the walls. Show respect.\"",
        (Partner::Farkas, Room::Ossuary) => "Farkas: \"Lots of bones. Hope none of them get up.\"",
        (Partner::Aela, Room::Camp) => "Aela: \"Silver Hand. Stay close, and don't let them see silver on your blade first.\"",
        (Partner::Vilkas, Room::Camp) => "Vilkas: \"Silver Hand. They know what we are. No mercy here.\"",
        (Partner::Farkas, Room::Camp) => "Farkas: \"Silver Hand. They'll want my hide for a rug.\"",
        (Partner::Aela, Room::Chamber) => "Aela: \"It's a trap, of course it is. Back to back!\"",
        (Partner::Vilkas, Room::Chamber) => "Vilkas: \"The fragment. Take it, and brace yourself.\"",
        (Partner::Farkas, Room::Chamber) => "Farkas: \"Stuck in here? Good. Now they can't run.\"",
    };
    line.to_string()
}

fn rules() -> RuleSet {
    RuleSet::new(vec![
        Rule::once("dustmans_entrance_done")
            .at(["entrance", "barrow"])
            .emit(
                "[DUSTMAN'S CAIRN] Wind moans across the barrow mouth. Fresh boot prints and \
                 a discarded torch lie in the snow by the door.",
            )
            .emit_with(|s| vec![bark(s, Room::Entrance)]),
        Rule::once("dustmans_anteroom_done")
            .at(["anteroom", "runes", "axes"])
            .emit(
                "[DUSTMAN'S CAIRN] Rune-carved pillars flank a gallery of swinging axes. A \
                 rusted lever sits in a niche beside a gate.",
            )
            .emit("GM NOTE: The lever lowers the axes for six heartbeats. Pulling it twice jams the gate.")
            .emit_with(|s| vec![bark(s, Room::Anteroom)]),
        Rule::once("dustmans_ossuary_done")
            .at(["ossuary", "maze", "bones"])
            .emit(
                "[DUSTMAN'S CAIRN] Burial niches honeycomb a low maze. Something shifts in \
                 the dark behind the bones.",
            )
            .emit_with(|s| vec![bark(s, Room::Ossuary)]),
        Rule::once("dustmans_silver_hand_camp_done")
            .at(["silver hand camp", "camp"])
            .emit_with(|s| vec![bark(s, Room::Camp)])
            .emit(
                "[INTRO ANTAGONIST] Krev the Skinner looks up from a whetstone, a wolf pelt \
                 draped over his shoulders.",
            )
            .emit(
                "[INTRO ANTAGONIST] \"Companions. Or should I say dogs? Your masters \
                 wear fur beneath their skins.\"",
            )
            .emit(
                "[INTRO ANTAGONIST] He draws a silvered blade. \"I've a bounty for every \
                 beast of Jorrvaskr. Let's start with you.\"",
            ),
        Rule::once("silver_hand_join_seeded")
            .at(["silver hand camp", "camp"])
            .when(Condition::flag("dustmans_silver_hand_camp_done"))
            .when(Condition::PathIsFalse("companions_state.embraced_curse".into()))
            .emit(
                "[SEED] Among Krev's belongings: a silver token engraved with a clenched hand \
                 and a note, \"Bring proof of a beast and the Hand will open for you.\"",
            )
            .then(Effect::SeedQuest(json!({
                "id": SILVER_HAND_QUEST,
                "name": "The Silver Hand's Offer",
                "source": NAME,
            }))),
        Rule::once("dustmans_fragment_chamber_done")
            .at(["deep crypt", "fragment", "wuuthrad", "chamber"])
            .emit(
                "[FRAGMENT CHAMBER] A fragment of Wuuthrad rests on a stone altar. When it is \
                 lifted, the portcullis slams shut behind the party.",
            )
            .emit("GM NOTE: Coffin lids burst open. Run a draugr wave while the partner turns.")
            .emit_with(|s| vec![bark(s, Room::Chamber)])
            .then(Effect::EnsureClock {
                clock: RETALIATION_CLOCK.into(),
                name: "Silver Hand Retaliation".into(),
                max: 4,
            })
            .then(Effect::advance_clock(RETALIATION_CLOCK, 1)),
        Rule::once("dustmans_word_wall_done")
            .at(["word wall"])
            .emit(
                "[WORD WALL] Ancient script glows on the curved wall. One word burns itself \
                 into the mind: FUS.",
            )
            .emit_if(
                Condition::player("dragonborn"),
                "[WORD WALL] The Dragonborn feels the word settle into their soul.",
            ),
    ])
}

/// Build the module.
pub fn module() -> HoldModule {
    HoldModule::new(NAME, KEYWORDS, rules())
}

/// Run the Dustman's Cairn rules for a token.
pub fn triggers(location: &str, state: &mut CampaignState) -> Vec<String> {
    module().triggers(location, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gm_core::{clock, quest};

    fn state(v: serde_json::Value) -> CampaignState {
        CampaignState::from_value(v).unwrap()
    }

    #[test]
    fn partner_from_flag() {
        let s = state(json!({"scene_flags": {PARTNER_FLAG: "Vilkas"}}));
        assert_eq!(partner(&s), Partner::Vilkas);
    }

    #[test]
    fn partner_from_party_order() {
        let s = state(json!({"companions": {"active_companions": [
            "Lydia",
            {"name": "Farkas", "npc_id": "npc_farkas"},
            {"name": "Aela the Huntress"}
        ]}}));
        assert_eq!(partner(&s), Partner::Farkas);

        let s = state(json!({"companions": {"active_companions": [{"npc_id": "npc_aela"}]}}));
        assert_eq!(partner(&s), Partner::Aela);
    }

    #[test]
    fn partner_defaults_to_farkas() {
        assert_eq!(partner(&CampaignState::new()), Partner::Farkas);
        let s = state(json!({"scene_flags": {PARTNER_FLAG: "Lydia"}}));
        assert_eq!(partner(&s), Partner::Farkas);
    }

    #[test]
    fn bare_name_does_nothing() {
        let mut s = CampaignState::new();
        assert!(triggers("dustmans cairn", &mut s).is_empty());
    }

    #[test]
    fn other_holds_tokens_ignored() {
        let mut s = CampaignState::new();
        assert!(triggers("saarthal chamber", &mut s).is_empty());
    }

    #[test]
    fn rooms_are_one_shot() {
        let mut s = CampaignState::new();
        let out = triggers("dustmans_entrance", &mut s);
        assert_eq!(out.len(), 2);
        assert!(out[0].starts_with("[DUSTMAN'S CAIRN]"));
        assert!(out[1].starts_with("Farkas"));
        assert!(triggers("dustmans_entrance", &mut s).is_empty());
        assert!(triggers("dustman barrow", &mut s).is_empty());
    }

    #[test]
    fn camp_without_explicit_false_does_not_seed() {
        let mut s = CampaignState::new();
        let out = triggers("dustmans_silver_hand_camp", &mut s);
        assert_eq!(out.len(), 4);
        assert!(!quest::is_active(&s, SILVER_HAND_QUEST));
        assert!(!flags::seen(&s, "silver_hand_join_seeded"));
    }

    #[test]
    fn fragment_chamber_starts_retaliation() {
        let mut s = state(json!({"scene_flags": {PARTNER_FLAG: "aela"}}));
        let out = triggers("dustmans deep crypt", &mut s);
        assert!(out[0].starts_with("[FRAGMENT CHAMBER]"));
        assert!(out[2].starts_with("Aela"));
        assert_eq!(clock::progress(&s, RETALIATION_CLOCK), Some(1));
    }

    #[test]
    fn word_wall() {
        let mut s = state(json!({"player": {"dragonborn": true}}));
        let out = triggers("dustmans word_wall", &mut s);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|l| l.starts_with("[WORD WALL]")));
    }
}
