//! Effective-skill arithmetic.
//!
//! A PC's effective skill is its trained value plus whatever its race and
//! standing stone grant. Race and stone records carry their grants under
//! `skill_bonuses` (or `skills`). Anything missing counts as zero.

use gm_core::DataTables;
use gm_core::state::as_int;
use serde_json::{Map, Value};

/// Canonical skill key: lower case, words joined by `_`.
pub fn skill_key(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Integer value for `skill` in a skill map, comparing canonical keys.
pub fn skill_value(skills: &Map<String, Value>, skill: &str) -> Option<i64> {
    let wanted = skill_key(skill);
    skills
        .iter()
        .find(|(k, _)| skill_key(k) == wanted)
        .and_then(|(_, v)| as_int(v))
}

fn grant(record: Option<&Value>, skill: &str) -> i64 {
    let Some(record) = record.and_then(Value::as_object) else {
        return 0;
    };
    ["skill_bonuses", "skills"]
        .iter()
        .filter_map(|k| record.get(*k).and_then(Value::as_object))
        .find_map(|skills| skill_value(skills, skill))
        .unwrap_or(0)
}

/// The parts that make up an effective skill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkillBreakdown {
    /// Trained value from the PC document.
    pub base: i64,
    /// Racial grant.
    pub race: i64,
    /// Standing-stone grant.
    pub stone: i64,
}

impl SkillBreakdown {
    /// Compute the breakdown for one skill.
    pub fn of(pc: &Map<String, Value>, tables: &DataTables, skill: &str) -> Self {
        let base = pc
            .get("skills")
            .and_then(Value::as_object)
            .and_then(|skills| skill_value(skills, skill))
            .unwrap_or(0);
        let race = pc
            .get("race")
            .and_then(Value::as_str)
            .and_then(|name| tables.race(name));
        let stone = ["standing_stone", "stone"]
            .iter()
            .find_map(|k| pc.get(*k).and_then(Value::as_str))
            .and_then(|name| tables.standing_stone(name));
        Self {
            base,
            race: grant(race, skill),
            stone: grant(stone, skill),
        }
    }

    /// Sum of all parts.
    pub fn total(&self) -> i64 {
        self.base + self.race + self.stone
    }
}

/// Base skill plus race and standing-stone bonuses.
pub fn effective_skill(pc: &Map<String, Value>, tables: &DataTables, skill: &str) -> i64 {
    SkillBreakdown::of(pc, tables, skill).total()
}
