use std::fs;

use gm_core::StateStore;
use serde_json::Value;
use tempfile::TempDir;

const DOCUMENT: &str = r#"{
  "session_zero_completed": true,
  "active_pc_id": "pc_sigrun",
  "zz_custom_first": {"nested": [1, 2.5, {"deep": null}], "a": "b"},
  "scene_flags": {
    "dustmans_partner": "aela",
    "whiterun_arrival_done": true
  },
  "clocks": {
    "battle_of_whiterun_countdown": {"current_progress": 4, "max": 10, "name": "Battle of Whiterun"}
  },
  "campaign_clocks": {
    "battle_of_whiterun_countdown": {"current_progress": 4, "max": 10, "name": "Battle of Whiterun"}
  },
  "quests": {"active": ["a", {"id": "b", "giver": "Kodlak"}], "completed": []},
  "time_of_day": 22,
  "major_events": ["Helgen burned", "The party reached Riverwood"],
  "unicode": "Skål — Ysgramor’s tomb",
  "septims_owed_to_maven": 12345678901234567890123,
  "sci": 1e2,
  "dragon_souls_per_age": 6.02e23,
  "negative_drift": -0.25,
  "aaa_last": 1.0
}"#;

fn normalise(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[test]
fn save_of_load_preserves_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("campaign_state.json");
    fs::write(&path, DOCUMENT).unwrap();

    let store = StateStore::new(&path);
    let state = store.load().unwrap();
    store.save(&state).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    let original: Value = serde_json::from_str(DOCUMENT).unwrap();
    let reread: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(original, reread);

    // Key order survives, including unknown keys ahead of reserved ones.
    let keys: Vec<_> = reread.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys.first().map(String::as_str), Some("session_zero_completed"));
    assert_eq!(keys.get(2).map(String::as_str), Some("zz_custom_first"));
    assert_eq!(keys.last().map(String::as_str), Some("aaa_last"));
}

#[test]
fn round_trip_differs_only_in_whitespace() {
    let source = DOCUMENT;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("campaign_state.json");
    fs::write(&path, source).unwrap();

    let store = StateStore::new(&path);
    store.save(&store.load().unwrap()).unwrap();
    let written = fs::read_to_string(&path).unwrap();

    assert_eq!(normalise(&written), normalise(source));
    assert!(written.ends_with('\n'));
    assert!(written.contains("\n  \"active_pc_id\""));
}

#[test]
fn save_is_stable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("campaign_state.json");
    fs::write(&path, DOCUMENT).unwrap();

    let store = StateStore::new(&path);
    store.save(&store.load().unwrap()).unwrap();
    let first = fs::read(&path).unwrap();
    store.save(&store.load().unwrap()).unwrap();
    let second = fs::read(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn number_lexemes_survive() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("campaign_state.json");
    fs::write(&path, DOCUMENT).unwrap();

    let store = StateStore::new(&path);
    let state = store.load().unwrap();
    store.save(&state).unwrap();
    let written = fs::read_to_string(&path).unwrap();

    assert!(written.contains("\"septims_owed_to_maven\": 12345678901234567890123"));
    assert!(written.contains("\"sci\": 1e2"));
    assert!(written.contains("\"aaa_last\": 1.0"));
    assert_eq!(state.int_at("time_of_day"), Some(22));
    assert_eq!(state.get("sci").and_then(Value::as_f64), Some(100.0));
}

#[test]
fn unicode_escapes_are_written_as_utf8() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("campaign_state.json");
    fs::write(&path, r#"{"name": "Sk\u00e5l"}"#).unwrap();

    let store = StateStore::new(&path);
    let state = store.load().unwrap();
    assert_eq!(state.str_at("name"), Some("Skål"));
    store.save(&state).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\n  \"name\": \"Skål\"\n}\n");
}
