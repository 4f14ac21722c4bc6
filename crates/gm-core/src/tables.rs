//! Static JSON data tables.
//!
//! Tables such as `races.json` are hand-edited and arrive in assorted
//! encodings, so every read goes through [`decode_text`]. A missing table is
//! an empty table. Each table may be written as a keyed object
//! (`{"Nord": {...}}`), a list of records with `name`, or either of those
//! wrapped under a single key named after the file (`{"races": [...]}`).

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::{Map, Value};

use crate::decode::{Encoding, decode_text};
use crate::error::{StateError, StateResult};
use crate::state::json_type;

/// File name of the race table.
pub const RACES_FILE: &str = "races.json";
/// File name of the standing-stone table.
pub const STANDING_STONES_FILE: &str = "standing_stones.json";
/// File name of the loot tables.
pub const LOOT_TABLES_FILE: &str = "loot_tables.json";

/// Read and parse a JSON file that must exist.
pub fn read_json_document(path: &Path) -> StateResult<Value> {
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            StateError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            StateError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let (text, encoding) = decode_text(&bytes);
    if !matches!(encoding, Encoding::Utf8 | Encoding::Utf8Bom) {
        tracing::warn!(path = %path.display(), %encoding, "decoded with fallback encoding");
    }
    serde_json::from_str(&text).map_err(|source| StateError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a JSON object file that must exist (NPC sheets, PC documents).
pub fn read_json_object(path: &Path) -> StateResult<Map<String, Value>> {
    match read_json_document(path)? {
        Value::Object(map) => Ok(map),
        other => Err(StateError::NotAnObject {
            found: json_type(&other),
        }),
    }
}

/// Read a table file. Missing files yield `None`.
pub fn load_json_table(path: &Path) -> StateResult<Option<Value>> {
    match read_json_document(path) {
        Ok(value) => Ok(Some(value)),
        Err(StateError::NotFound { .. }) => {
            tracing::debug!(path = %path.display(), "table absent, treating as empty");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Normalise a table into a map keyed by entry name.
pub fn keyed_table(value: Value, wrapper: &str) -> Map<String, Value> {
    match value {
        Value::Object(mut map) => {
            if map.len() == 1
                && let Some(inner) = map.shift_remove(wrapper)
            {
                return keyed_table(inner, wrapper);
            }
            map
        }
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| {
                let name = item.get("name").and_then(Value::as_str)?.to_string();
                Some((name, item))
            })
            .collect(),
        _ => Map::new(),
    }
}

/// Case-insensitive lookup by entry name.
pub fn lookup<'t>(table: &'t Map<String, Value>, name: &str) -> Option<&'t Value> {
    table.get(name).or_else(|| {
        let wanted = name.trim().to_lowercase();
        table
            .iter()
            .find(|(k, _)| k.to_lowercase() == wanted)
            .map(|(_, v)| v)
    })
}

/// The static tables used by character and loot tooling.
#[derive(Debug, Clone, Default)]
pub struct DataTables {
    /// Race name → race record.
    pub races: Map<String, Value>,
    /// Stone name → standing-stone record.
    pub standing_stones: Map<String, Value>,
    /// Table name → loot table.
    pub loot_tables: Map<String, Value>,
}

impl DataTables {
    /// Load all tables from a data directory. Absent files are empty tables.
    pub fn load_dir(dir: &Path) -> StateResult<Self> {
        let load = |file: &str, wrapper: &str| -> StateResult<Map<String, Value>> {
            Ok(load_json_table(&dir.join(file))?
                .map(|value| keyed_table(value, wrapper))
                .unwrap_or_default())
        };
        Ok(Self {
            races: load(RACES_FILE, "races")?,
            standing_stones: load(STANDING_STONES_FILE, "standing_stones")?,
            loot_tables: load(LOOT_TABLES_FILE, "loot_tables")?,
        })
    }

    /// Race record by name.
    pub fn race(&self, name: &str) -> Option<&Value> {
        lookup(&self.races, name)
    }

    /// Standing-stone record by name.
    pub fn standing_stone(&self, name: &str) -> Option<&Value> {
        lookup(&self.standing_stones, name)
    }

    /// Loot table by name.
    pub fn loot_table(&self, name: &str) -> Option<&Value> {
        lookup(&self.loot_tables, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn keyed_object_passes_through() {
        let t = keyed_table(json!({"Nord": {"skills": {"two_handed": 10}}}), "races");
        assert!(lookup(&t, "nord").is_some());
    }

    #[test]
    fn list_and_wrapper_forms() {
        let t = keyed_table(
            json!({"races": [{"name": "Nord"}, {"name": "Breton"}, {"nameless": 1}]}),
            "races",
        );
        let keys: Vec<_> = t.keys().cloned().collect();
        assert_eq!(keys, vec!["Nord", "Breton"]);
    }

    #[test]
    fn absent_tables_are_empty() {
        let dir = TempDir::new().unwrap();
        let tables = DataTables::load_dir(dir.path()).unwrap();
        assert!(tables.races.is_empty());
        assert!(tables.loot_tables.is_empty());
    }

    #[test]
    fn cp1252_table_loads() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(STANDING_STONES_FILE),
            b"{\"The Warrior Stone\": {\"note\": \"Ysgramor\x92s blessing\"}}",
        )
        .unwrap();
        let tables = DataTables::load_dir(dir.path()).unwrap();
        let stone = tables.standing_stone("the warrior stone").unwrap();
        assert_eq!(stone["note"], json!("Ysgramor\u{2019}s blessing"));
    }

    #[test]
    fn missing_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = read_json_object(&dir.path().join("pc.json")).unwrap_err();
        assert!(matches!(err, StateError::NotFound { .. }));
    }

    #[test]
    fn broken_table_reports_cause() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(RACES_FILE), "{").unwrap();
        assert!(DataTables::load_dir(dir.path()).is_err());
    }
}
