//! Relationship inference: starting social bonuses from a PC's backstory.
//!
//! Each NPC id has a small table of rules. A rule matches when any of its
//! keywords appears (case-insensitively) in the flattened backstory. Matches
//! are written once under `relationship_inference.<pc_id>.<flag>` and are
//! never overwritten; spending a bonus sets `consumed`, which is never cleared.

use std::path::Path;

use gm_core::CampaignState;
use gm_core::tables::read_json_object;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{LoreError, LoreResult};

/// Root key of inferred bonuses.
pub const RELATIONSHIP_INFERENCE: &str = "relationship_inference";

/// PC document fields that hold backstory text.
pub const BACKSTORY_FIELDS: &[&str] = &[
    "background",
    "backstory",
    "history",
    "notes",
    "character_concept",
    "aspects",
];

/// One inference rule for an NPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferenceRule {
    /// NPC sheet id.
    pub npc_id: &'static str,
    /// Flag recorded under the PC.
    pub flag: &'static str,
    /// Backstory keywords, lower case.
    pub keywords: &'static [&'static str],
    /// GM-facing description of the bonus.
    pub bonus_text: &'static str,
    /// Bonus applied once.
    pub bonus_value: i64,
}

/// The rule table.
pub const RULES: &[InferenceRule] = &[
    InferenceRule {
        npc_id: "npc_stat_ulfric_stormcloak",
        flag: "ulfric_stormcloak_kinship",
        keywords: &["windhelm", "eastmarch", "stormcloak"],
        bonus_text: "Ulfric greets a child of Eastmarch as kin: +1 on the first appeal in the Palace of the Kings.",
        bonus_value: 1,
    },
    InferenceRule {
        npc_id: "npc_stat_ulfric_stormcloak",
        flag: "ulfric_stormcloak_thalmor_grudge",
        keywords: &["thalmor prisoner", "tortured by the thalmor", "great war veteran"],
        bonus_text: "Shared hatred of the Thalmor: +1 when invoking the Great War to Ulfric.",
        bonus_value: 1,
    },
    InferenceRule {
        npc_id: "npc_stat_general_tullius",
        flag: "general_tullius_legion_service",
        keywords: &["legion", "legionnaire", "imperial city", "cyrodiil"],
        bonus_text: "Tullius respects prior Legion service: +1 on the first request at Castle Dour.",
        bonus_value: 1,
    },
    InferenceRule {
        npc_id: "npc_stat_balgruuf",
        flag: "balgruuf_whiterun_native",
        keywords: &["whiterun", "plains district", "pelagia farm"],
        bonus_text: "Balgruuf remembers the PC's family: +1 on the first audience in Dragonsreach.",
        bonus_value: 1,
    },
    InferenceRule {
        npc_id: "npc_stat_kodlak_whitemane",
        flag: "kodlak_whitemane_companion_lineage",
        keywords: &["companions", "jorrvaskr", "ysgramor"],
        bonus_text: "Kodlak knew the PC's forebear in the Circle: +2 on the first trial at Jorrvaskr.",
        bonus_value: 2,
    },
    InferenceRule {
        npc_id: "npc_stat_aela",
        flag: "aela_hunting_bond",
        keywords: &["hunter", "hunting", "falkreath", "trapper"],
        bonus_text: "Aela spots a fellow hunter: +1 when tracking alongside her.",
        bonus_value: 1,
    },
    InferenceRule {
        npc_id: "npc_stat_brynjolf",
        flag: "brynjolf_street_kin",
        keywords: &["riften", "ratway", "thief", "pickpocket"],
        bonus_text: "Brynjolf reads a kindred hand: +1 on the first Thieves Guild negotiation.",
        bonus_value: 1,
    },
    InferenceRule {
        npc_id: "npc_stat_savos_aren",
        flag: "savos_aren_college_recognition",
        keywords: &["college of winterhold", "apprentice", "winterhold", "synod"],
        bonus_text: "Savos Aren has read the PC's letters of introduction: +1 on admission to the College.",
        bonus_value: 1,
    },
    InferenceRule {
        npc_id: "npc_stat_elisif",
        flag: "elisif_solitude_loyalty",
        keywords: &["solitude", "haafingar", "torygg", "blue palace"],
        bonus_text: "Elisif trusts those loyal to Torygg's memory: +1 in her court.",
        bonus_value: 1,
    },
];

/// An inferred, spendable bonus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    /// NPC sheet id.
    pub npc_id: String,
    /// GM-facing description.
    pub bonus_text: String,
    /// Bonus value.
    pub bonus_value: i64,
    /// True once spent.
    #[serde(default)]
    pub consumed: bool,
}

/// Rules for one NPC id.
pub fn rules_for(npc_id: &str) -> impl Iterator<Item = &'static InferenceRule> + '_ {
    RULES.iter().filter(move |r| r.npc_id == npc_id)
}

/// Lower-cased backstory text from the PC document.
///
/// A field may be a string, or a mapping or sequence whose direct string
/// members are collected. Anything nested deeper is ignored.
pub fn backstory_text(pc: &Map<String, Value>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for field in BACKSTORY_FIELDS {
        match pc.get(*field) {
            Some(Value::String(s)) => parts.push(s),
            Some(Value::Array(items)) => parts.extend(items.iter().filter_map(Value::as_str)),
            Some(Value::Object(map)) => parts.extend(map.values().filter_map(Value::as_str)),
            _ => {}
        }
    }
    parts.join("\n").to_lowercase()
}

/// Infer bonuses for a PC against the given NPC ids.
///
/// Returns the flags written by this call. Existing entries are left as they are.
pub fn infer(
    state: &mut CampaignState,
    pc_id: &str,
    pc: &Map<String, Value>,
    npc_ids: &[&str],
) -> LoreResult<Vec<String>> {
    let text = backstory_text(pc);
    let matched: Vec<&InferenceRule> = npc_ids
        .iter()
        .copied()
        .flat_map(rules_for)
        .filter(|rule| rule.keywords.iter().any(|k| text.contains(k)))
        .collect();
    if matched.is_empty() {
        return Ok(Vec::new());
    }

    let root = state.object_mut(RELATIONSHIP_INFERENCE)?;
    let slot = root
        .entry(pc_id)
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(entries) = slot.as_object_mut() else {
        tracing::warn!(pc_id, "relationship_inference entry is not a mapping");
        return Ok(Vec::new());
    };

    let mut written = Vec::new();
    for rule in matched {
        if entries.contains_key(rule.flag) {
            continue;
        }
        let bonus = Bonus {
            npc_id: rule.npc_id.to_string(),
            bonus_text: rule.bonus_text.to_string(),
            bonus_value: rule.bonus_value,
            consumed: false,
        };
        entries.insert(rule.flag.to_string(), bonus_value(&bonus));
        tracing::debug!(pc_id, flag = rule.flag, "relationship bonus inferred");
        written.push(rule.flag.to_string());
    }
    Ok(written)
}

/// Load a PC document from disk and infer bonuses for it.
///
/// The PC id is taken from `id` or `pc_id` in the document, else the file stem.
pub fn infer_from_file(
    state: &mut CampaignState,
    path: &Path,
    npc_ids: &[&str],
) -> LoreResult<Vec<String>> {
    let pc = read_json_object(path)?;
    let pc_id = ["id", "pc_id"]
        .iter()
        .find_map(|k| pc.get(*k).and_then(Value::as_str))
        .map(String::from)
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .filter(|id| !id.trim().is_empty())
        .ok_or(LoreError::MissingPcId)?;
    infer(state, &pc_id, &pc, npc_ids)
}

fn entry<'s>(state: &'s CampaignState, pc_id: &str, flag: &str) -> Option<&'s Value> {
    state
        .get(RELATIONSHIP_INFERENCE)?
        .as_object()?
        .get(pc_id)?
        .as_object()?
        .get(flag)
}

/// The bonus if it exists and has not been spent.
pub fn get_bonus(state: &CampaignState, pc_id: &str, flag: &str) -> Option<Bonus> {
    let bonus: Bonus = serde_json::from_value(entry(state, pc_id, flag)?.clone()).ok()?;
    (!bonus.consumed).then_some(bonus)
}

/// Mark a bonus spent. Returns `true` if this call spent it.
pub fn consume_bonus(state: &mut CampaignState, pc_id: &str, flag: &str) -> LoreResult<bool> {
    let unknown = || LoreError::UnknownBonus {
        pc_id: pc_id.to_string(),
        flag: flag.to_string(),
    };
    if entry(state, pc_id, flag).and_then(Value::as_object).is_none() {
        return Err(unknown());
    }
    let record = state
        .object_mut(RELATIONSHIP_INFERENCE)?
        .get_mut(pc_id)
        .and_then(Value::as_object_mut)
        .and_then(|entries| entries.get_mut(flag))
        .and_then(Value::as_object_mut)
        .ok_or_else(unknown)?;
    if record.get("consumed").and_then(Value::as_bool) == Some(true) {
        return Ok(false);
    }
    record.insert("consumed".into(), Value::Bool(true));
    tracing::debug!(pc_id, flag, "relationship bonus consumed");
    Ok(true)
}

fn bonus_value(bonus: &Bonus) -> Value {
    let mut map = Map::new();
    map.insert("npc_id".into(), Value::from(bonus.npc_id.as_str()));
    map.insert("bonus_text".into(), Value::from(bonus.bonus_text.as_str()));
    map.insert("bonus_value".into(), Value::from(bonus.bonus_value));
    map.insert("consumed".into(), Value::Bool(bonus.consumed));
    Value::Object(map)
}
