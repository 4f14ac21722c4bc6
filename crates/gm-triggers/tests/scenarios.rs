use gm_core::{CampaignState, QuestPhase, flags, quest};
use gm_triggers::{Engine, EngineConfig, Session};
use serde_json::{Value, json};
use tempfile::TempDir;

fn state(v: Value) -> CampaignState {
    CampaignState::from_value(v).unwrap()
}

fn march_state() -> CampaignState {
    state(json!({
        "clocks": {"battle_of_whiterun_countdown": {"current_progress": 6}},
        "companions_state": {"quest_progress": {"greymane_and_the_greater": "memory"}}
    }))
}

#[test]
fn battle_march_in_a_settlement() {
    let engine = Engine::default();
    let mut s = march_state();

    let events = engine.run("whiterun_city", &mut s);
    assert!(events[0].contains("[TOWN CRIER]"));
    assert_eq!(events.iter().filter(|e| e.contains("[QUEST ACTIVATED]")).count(), 1);
    assert_eq!(
        flags::value(&s, "battle_of_whiterun_march_announcement_done"),
        Some(&json!(true))
    );
    assert_eq!(
        s.str_at("companions_state.quest_progress.greymane_and_the_greater"),
        Some("active")
    );

    let after = s.clone();
    assert!(engine.run("whiterun_city", &mut s).is_empty());
    assert_eq!(s, after);
}

#[test]
fn battle_march_in_the_wilderness() {
    let engine = Engine::default();
    let mut s = march_state();
    let events = engine.run("frozen_tundra_road", &mut s);
    assert!(events[0].contains("[COURIER]"));
    assert!(!events.iter().any(|e| e.contains("[TOWN CRIER]")));
    assert_eq!(quest::phase(&s, "greymane_and_the_greater"), Some(QuestPhase::Active));
}

#[test]
fn dustmans_cairn_silver_hand_camp() {
    let engine = Engine::default();
    let mut s = state(json!({
        "companions_state": {"embraced_curse": false},
        "scene_flags": {"dustmans_partner": "aela"}
    }));

    let events = engine.run("dustmans_silver_hand_camp", &mut s);
    assert_eq!(events.len(), 5, "{events:#?}");
    assert!(events[0].starts_with("Aela"));
    assert!(events[1..4].iter().all(|e| e.starts_with("[INTRO ANTAGONIST]")));
    assert!(events[4].starts_with("[SEED]"));
    assert!(events[4].contains("silver token"));

    assert!(quest::is_active(&s, "silver_hand_contact"));
    assert_eq!(flags::value(&s, "silver_hand_join_seeded"), Some(&json!(true)));
    assert!(engine.run("dustmans_silver_hand_camp", &mut s).is_empty());
}

#[test]
fn silver_hand_seed_respects_existing_quest() {
    let engine = Engine::default();
    let mut s = state(json!({
        "companions_state": {"embraced_curse": false},
        "quests": {"active": [{"id": "silver_hand_contact", "note": "met in Whiterun"}]}
    }));
    engine.run("dustmans silver hand camp", &mut s);
    let active = s.array_at("quests.active").unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["note"], json!("met in Whiterun"));
}

#[test]
fn global_layer_runs_before_holds() {
    let engine = Engine::default();
    let mut s = march_state();
    let events = engine.run("riften", &mut s);
    let crier = events.iter().position(|e| e.starts_with("[TOWN CRIER]")).unwrap();
    let arrival = events.iter().position(|e| e.contains("Visitor's tax")).unwrap();
    assert!(crier < arrival);
}

#[test]
fn whole_session_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("campaign_state.json");
    std::fs::write(&path, serde_json::to_string(march_state().as_map()).unwrap()).unwrap();

    let mut session = Session::open(EngineConfig::default().with_state_path(&path)).unwrap();
    let lines = session
        .run_batch(&["whiterun_city", "jorrvaskr", "skyforge"])
        .unwrap();
    assert!(lines[0].contains("[TOWN CRIER]"));
    assert!(lines.iter().any(|l| l.contains("Eorlund Gray-Mane sets down his hammer")));

    let reopened = Session::open(EngineConfig::default().with_state_path(&path)).unwrap();
    assert_eq!(reopened.state(), session.state());
    assert!(session.take_turn("whiterun_city").unwrap().is_empty());
}
