//! Canon divergence detection.
//!
//! A description breaks canon when it names a protected figure or city
//! alongside a destructive verb. Mentioning either alone is fine: "the party
//! met Ulfric" and "a bandit was killed" are both canon.

use gm_core::{CampaignState, flags, state::is_truthy};

/// Root (and scene-flag) key set once the timeline has branched.
pub const DRAGONBREAK_FLAG: &str = "dragonbreak_occurred";

/// Figures whose death or ruin would contradict canon.
pub const PROTECTED_NPCS: &[&str] = &[
    "ulfric stormcloak",
    "ulfric",
    "general tullius",
    "tullius",
    "elisif",
    "balgruuf",
    "kodlak whitemane",
    "kodlak",
    "galmar stone-fist",
    "legate rikke",
    "irileth",
    "paarthurnax",
    "arngeir",
    "delphine",
    "esbern",
    "brynjolf",
    "mercer frey",
    "maven black-briar",
    "savos aren",
    "laila law-giver",
];

/// Holds whose destruction would contradict canon.
pub const PROTECTED_CITIES: &[&str] = &[
    "whiterun",
    "windhelm",
    "solitude",
    "riften",
    "markarth",
    "winterhold",
    "morthal",
    "falkreath",
    "dawnstar",
    "high hrothgar",
];

/// Verbs and phrases that signal a death or destruction.
pub const DESTRUCTIVE_PHRASES: &[&str] = &[
    "assassinated",
    "assassinate",
    "killed",
    "murdered",
    "slain",
    "slew",
    "executed",
    "beheaded",
    "died",
    "dies",
    "dead",
    "destroyed",
    "burned down",
    "burnt down",
    "burned to the ground",
    "razed",
    "sacked",
    "annihilated",
    "wiped out",
];

/// The entity and phrase that made a description a canon break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonBreak {
    /// Protected figure or city named.
    pub entity: &'static str,
    /// Destructive phrase found.
    pub phrase: &'static str,
}

/// Lower-cased words joined by single spaces and padded at both ends, so
/// `contains` on two of these only matches whole-word runs.
fn word_run(text: &str) -> String {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    format!(" {} ", words.join(" "))
}

/// Find the first protected entity and destructive phrase in a description.
///
/// Both are matched as whole words, so "studies" does not contain "dies".
pub fn find_break(description: &str) -> Option<CanonBreak> {
    let text = word_run(description);
    let mentions = |needle: &&str| text.contains(&word_run(needle));
    let entity = PROTECTED_NPCS
        .iter()
        .chain(PROTECTED_CITIES)
        .copied()
        .find(mentions)?;
    let phrase = DESTRUCTIVE_PHRASES.iter().copied().find(mentions)?;
    Some(CanonBreak { entity, phrase })
}

/// True iff the description contradicts canon.
pub fn check(description: &str) -> bool {
    find_break(description).is_some()
}

/// Outcome of reviewing a described event against the campaign state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing contradicts canon.
    Canon,
    /// The event breaks canon and the timeline has not branched yet.
    Diverged(CanonBreak),
    /// The event breaks canon, but the timeline already branched.
    AlreadyBranched(CanonBreak),
}

/// Checks described events against canon, honouring earlier branches.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonGate;

impl CanonGate {
    /// True if the timeline has already branched.
    ///
    /// Both the root key and the scene flag count.
    pub fn has_branched(state: &CampaignState) -> bool {
        state.get(DRAGONBREAK_FLAG).is_some_and(is_truthy) || flags::seen(state, DRAGONBREAK_FLAG)
    }

    /// Review a description. Never mutates.
    pub fn review(state: &CampaignState, description: &str) -> Verdict {
        match find_break(description) {
            None => Verdict::Canon,
            Some(found) if Self::has_branched(state) => Verdict::AlreadyBranched(found),
            Some(found) => {
                tracing::info!(entity = found.entity, phrase = found.phrase, "canon divergence");
                Verdict::Diverged(found)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn assassination_breaks_canon() {
        assert!(check("Ulfric Stormcloak is assassinated in Windhelm"));
        assert!(check("Whiterun burned down in the battle"));
    }

    #[test]
    fn ordinary_violence_is_canon() {
        assert!(!check("The party defeated bandits near Whiterun"));
        assert!(!check("A bandit was killed in the wilderness"));
        assert!(!check("Ulfric gave a speech in Windhelm"));
        assert!(!check(""));
    }

    #[test]
    fn phrases_match_whole_words_only() {
        assert!(!check("The party studies old maps in Whiterun"));
        assert!(!check("Two ladies of Riften argue over fish"));
        assert!(!check("Bandits ransacked a caravan on the road to Solitude"));
        assert!(!check("Balgruuf sets a deadline for the party"));
        assert!(check("Ulfric's guards found him dead in Windhelm"));
        assert!(check("Galmar Stone-Fist was slain at dawn"));
    }

    #[test]
    fn word_runs_are_padded_and_lowercased() {
        assert_eq!(word_run("Galmar Stone-Fist!"), " galmar stone fist ");
        assert_eq!(word_run(""), "  ");
    }

    #[test]
    fn reports_what_matched() {
        let found = find_break("General Tullius was EXECUTED at dawn").unwrap();
        assert_eq!(found.entity, "general tullius");
        assert_eq!(found.phrase, "executed");
    }

    #[test]
    fn gate_sees_both_flag_locations() {
        let fresh = CampaignState::new();
        let root = CampaignState::from_value(json!({DRAGONBREAK_FLAG: true})).unwrap();
        let scene = CampaignState::from_value(json!({"scene_flags": {DRAGONBREAK_FLAG: true}})).unwrap();
        let event = "Balgruuf died of his wounds";

        assert!(matches!(CanonGate::review(&fresh, event), Verdict::Diverged(_)));
        assert!(matches!(CanonGate::review(&root, event), Verdict::AlreadyBranched(_)));
        assert!(matches!(CanonGate::review(&scene, event), Verdict::AlreadyBranched(_)));
        assert_eq!(CanonGate::review(&root, "Balgruuf laughed"), Verdict::Canon);
    }
}
