//! New player-character documents.
//!
//! The document shape matches what relationship inference and effective
//! skills read: `id`, `name`, `race`, `standing_stone`, `level`, `skills`,
//! plus an empty `backstory` for the GM to fill in.

use std::path::{Path, PathBuf};

use gm_core::{CampaignState, DataTables, StateStore};
use serde_json::{Map, Value, json};

use crate::error::{MechError, MechResult};
use crate::skills::skill_key;

/// Lowest and highest trained skill value.
pub const SKILL_RANGE: (i64, i64) = (0, 100);

/// `pc_` followed by the name in lower snake case.
pub fn character_id(name: &str) -> String {
    let slug: Vec<String> = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    format!("pc_{}", slug.join("_"))
}

fn canonical(table: &Map<String, Value>, name: &str) -> Option<String> {
    let wanted = name.trim().to_lowercase();
    table
        .keys()
        .find(|k| k.to_lowercase() == wanted)
        .cloned()
}

/// Resolve a name against a table. An empty table accepts any name as given.
fn resolve(
    table: &Map<String, Value>,
    name: &str,
    unknown: fn(String) -> MechError,
) -> MechResult<String> {
    if table.is_empty() {
        return Ok(name.trim().to_string());
    }
    canonical(table, name).ok_or_else(|| unknown(name.to_string()))
}

/// Build a PC document.
///
/// Race and stone names are checked against their tables when the tables are
/// loaded, and written with the table's spelling. Skill keys are made
/// canonical and values clamped to [`SKILL_RANGE`].
pub fn new_character(
    name: &str,
    race: &str,
    stone: Option<&str>,
    skills: &[(&str, i64)],
    tables: &DataTables,
) -> MechResult<Map<String, Value>> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MechError::EmptyName);
    }
    let race = resolve(&tables.races, race, MechError::UnknownRace)?;
    let stone = stone
        .map(|s| resolve(&tables.standing_stones, s, MechError::UnknownStone))
        .transpose()?;

    let mut trained = Map::new();
    for (skill, value) in skills {
        let key = skill_key(skill);
        if key.is_empty() {
            continue;
        }
        trained.insert(key, json!((*value).clamp(SKILL_RANGE.0, SKILL_RANGE.1)));
    }

    let mut doc = Map::new();
    doc.insert("id".into(), json!(character_id(name)));
    doc.insert("name".into(), json!(name));
    doc.insert("race".into(), json!(race));
    doc.insert("standing_stone".into(), stone.map_or(Value::Null, Value::String));
    doc.insert("level".into(), json!(1));
    doc.insert("skills".into(), Value::Object(trained));
    doc.insert("backstory".into(), json!(""));
    tracing::debug!(id = %doc["id"], "character created");
    Ok(doc)
}

/// Write a PC document to `<dir>/<id>.json` and return the path.
pub fn save_character(dir: &Path, doc: &Map<String, Value>) -> MechResult<PathBuf> {
    let id = doc
        .get("id")
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| {
            character_id(doc.get("name").and_then(Value::as_str).unwrap_or_default())
        });
    let path = dir.join(format!("{id}.json"));
    StateStore::new(&path).save(&CampaignState::from_map(doc.clone()))?;
    Ok(path)
}
