use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{StateError, StateResult};

/// The campaign-state document: one open-ended JSON object.
///
/// Reserved keys (`scene_flags`, `clocks`, `quests`, `companions_state`, ...)
/// are read through the typed views in the sibling modules. Everything else
/// is kept verbatim, in its original order, so a load/save cycle round-trips.
///
/// Reads never mutate. Writes create missing containers on demand and refuse
/// to overwrite a value of the wrong type ([`StateError::PathConflict`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignState {
    doc: Map<String, Value>,
}

impl CampaignState {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON object.
    pub fn from_map(doc: Map<String, Value>) -> Self {
        Self { doc }
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> StateResult<Self> {
        match value {
            Value::Object(doc) => Ok(Self { doc }),
            other => Err(StateError::NotAnObject {
                found: json_type(&other),
            }),
        }
    }

    /// Borrow the underlying object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.doc
    }

    /// Clone the document into a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.doc.clone())
    }

    /// Consume the document into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.doc)
    }

    /// True if the document has no keys.
    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    /// Get a root-level value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.doc.get(key)
    }

    /// Insert a root-level value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.doc.insert(key.into(), value)
    }

    /// Remove a root-level value, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.doc.shift_remove(key)
    }

    /// True if the root has this key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.doc.contains_key(key)
    }

    /// Look up a dotted path such as `civil_war_state.player_alliance`.
    ///
    /// Returns `None` if any segment is missing or runs through a non-object.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.doc.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// String at a dotted path.
    pub fn str_at(&self, path: &str) -> Option<&str> {
        self.get_path(path)?.as_str()
    }

    /// Integer at a dotted path. Floats are truncated.
    pub fn int_at(&self, path: &str) -> Option<i64> {
        as_int(self.get_path(path)?)
    }

    /// Boolean at a dotted path. Only real JSON booleans count.
    pub fn bool_at(&self, path: &str) -> Option<bool> {
        self.get_path(path)?.as_bool()
    }

    /// Truthiness of the value at a dotted path; missing is false.
    pub fn truthy_at(&self, path: &str) -> bool {
        self.get_path(path).is_some_and(is_truthy)
    }

    /// Object at a dotted path.
    pub fn object_at(&self, path: &str) -> Option<&Map<String, Value>> {
        self.get_path(path)?.as_object()
    }

    /// Array at a dotted path.
    pub fn array_at(&self, path: &str) -> Option<&Vec<Value>> {
        self.get_path(path)?.as_array()
    }

    /// Truthiness of `player.<key>`.
    pub fn player_flag(&self, key: &str) -> bool {
        self.doc
            .get("player")
            .and_then(Value::as_object)
            .and_then(|player| player.get(key))
            .is_some_and(is_truthy)
    }

    /// Mutable object at a dotted path, creating missing objects along the way.
    pub fn object_mut(&mut self, path: &str) -> StateResult<&mut Map<String, Value>> {
        let mut current = &mut self.doc;
        for segment in path.split('.') {
            let slot = current
                .entry(segment)
                .or_insert_with(|| Value::Object(Map::new()));
            current = match slot {
                Value::Object(map) => map,
                other => return Err(conflict(path, segment, other)),
            };
        }
        Ok(current)
    }

    /// Mutable array at a dotted path, creating it (and its parents) if missing.
    pub fn array_mut(&mut self, path: &str) -> StateResult<&mut Vec<Value>> {
        let (parent, key) = split_last(path);
        let map = match parent {
            Some(parent) => self.object_mut(parent)?,
            None => &mut self.doc,
        };
        let slot = map
            .entry(key)
            .or_insert_with(|| Value::Array(Vec::new()));
        match slot {
            Value::Array(items) => Ok(items),
            other => Err(conflict(path, key, other)),
        }
    }

    /// Set the value at a dotted path, returning the previous value.
    pub fn set_path(&mut self, path: &str, value: Value) -> StateResult<Option<Value>> {
        let (parent, key) = split_last(path);
        let map = match parent {
            Some(parent) => self.object_mut(parent)?,
            None => &mut self.doc,
        };
        Ok(map.insert(key.to_string(), value))
    }
}

fn split_last(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once('.') {
        Some((parent, key)) => (Some(parent), key),
        None => (None, path),
    }
}

fn conflict(path: &str, segment: &str, found: &Value) -> StateError {
    StateError::PathConflict {
        path: path.to_string(),
        segment: segment.to_string(),
        found: json_type(found),
    }
}

/// Loose truthiness: `false`, `null`, `0`, `""`, `[]`, and `{}` are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Read a JSON number as an integer, truncating floats.
pub fn as_int(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)
    })
}

/// Name of a value's JSON type, for error messages.
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(value: Value) -> CampaignState {
        CampaignState::from_value(value).unwrap()
    }

    #[test]
    fn root_must_be_object() {
        let err = CampaignState::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, StateError::NotAnObject { found: "array" }));
    }

    #[test]
    fn dotted_path_lookup() {
        let s = state(json!({
            "civil_war_state": {"player_alliance": "Imperial"},
            "clocks": {"c": {"current_progress": 4}}
        }));
        assert_eq!(s.str_at("civil_war_state.player_alliance"), Some("Imperial"));
        assert_eq!(s.int_at("clocks.c.current_progress"), Some(4));
        assert!(s.get_path("clocks.c.missing").is_none());
        assert!(s.get_path("civil_war_state.player_alliance.deeper").is_none());
    }

    #[test]
    fn reads_do_not_mutate() {
        let s = state(json!({}));
        let before = s.clone();
        let _ = s.get_path("scene_flags.anything");
        let _ = s.player_flag("college_member");
        assert_eq!(s, before);
    }

    #[test]
    fn object_mut_creates_parents() {
        let mut s = CampaignState::new();
        s.object_mut("companions_state.quest_progress")
            .unwrap()
            .insert("q".into(), json!("memory"));
        assert_eq!(s.str_at("companions_state.quest_progress.q"), Some("memory"));
    }

    #[test]
    fn object_mut_refuses_wrong_type() {
        let mut s = state(json!({"scene_flags": ["not", "a", "map"]}));
        let err = s.object_mut("scene_flags").unwrap_err();
        assert!(matches!(err, StateError::PathConflict { found: "array", .. }));
        // The original value is untouched.
        assert_eq!(s.get("scene_flags"), Some(&json!(["not", "a", "map"])));
    }

    #[test]
    fn array_mut_creates_list() {
        let mut s = CampaignState::new();
        s.array_mut("quests.active").unwrap().push(json!("q1"));
        assert_eq!(s.get_path("quests.active"), Some(&json!(["q1"])));
    }

    #[test]
    fn set_path_returns_previous() {
        let mut s = state(json!({"civil_war_state": {"battle_of_whiterun_status": "pending"}}));
        let prev = s
            .set_path("civil_war_state.battle_of_whiterun_status", json!("underway"))
            .unwrap();
        assert_eq!(prev, Some(json!("pending")));
        assert_eq!(
            s.str_at("civil_war_state.battle_of_whiterun_status"),
            Some("underway")
        );
    }

    #[test]
    fn remove_keeps_order() {
        let mut s = state(json!({"a": 1, "b": 2, "c": 3}));
        s.remove("a");
        let keys: Vec<_> = s.as_map().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(is_truthy(&json!("aela")));
        assert!(is_truthy(&json!(2)));
        assert!(is_truthy(&json!({"k": 1})));
    }

    #[test]
    fn player_flag_truthy() {
        let s = state(json!({"player": {"college_member": true, "college_rank": 0}}));
        assert!(s.player_flag("college_member"));
        assert!(!s.player_flag("college_rank"));
        assert!(!s.player_flag("thieves_guild_member"));
    }

    #[test]
    fn int_truncates_floats() {
        assert_eq!(as_int(&json!(6.9)), Some(6));
        assert_eq!(as_int(&json!("6")), None);
    }
}
