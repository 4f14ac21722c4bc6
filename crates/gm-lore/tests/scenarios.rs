use std::fs;

use gm_core::CampaignState;
use gm_lore::relations::RELATIONSHIP_INFERENCE;
use gm_lore::{CanonGate, Dragonbreak, LoreError, Verdict, check, consume_bonus, get_bonus, infer_from_file};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn canon_divergence_detected() {
    assert!(check("Ulfric Stormcloak is assassinated in Windhelm"));
    assert!(check("Whiterun burned down in the battle"));
}

#[test]
fn canon_divergence_false_positives() {
    assert!(!check("The party defeated bandits near Whiterun"));
    assert!(!check("A bandit was killed in the wilderness"));
    assert!(!check("The party studies old maps in Whiterun"));
    assert!(!check("Two ladies of Riften argue over fish"));
    assert!(!check("Bandits ransacked a caravan on the road to Solitude"));
    assert!(!check("Balgruuf sets a deadline for the party"));
}

#[test]
fn relationship_inference_from_backstory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pc_sigrun.json");
    fs::write(
        &path,
        json!({
            "id": "pc_sigrun",
            "name": "Sigrun",
            "backstory": "Born to a shipwright's family in Windhelm."
        })
        .to_string(),
    )
    .unwrap();

    let mut s = CampaignState::new();
    let written = infer_from_file(&mut s, &path, &["npc_stat_ulfric_stormcloak"]).unwrap();
    assert_eq!(written, vec!["ulfric_stormcloak_kinship"]);

    let entry = &s.get(RELATIONSHIP_INFERENCE).unwrap()["pc_sigrun"]["ulfric_stormcloak_kinship"];
    assert_eq!(entry["npc_id"], json!("npc_stat_ulfric_stormcloak"));
    assert!(entry["bonus_text"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(entry["bonus_value"], json!(1));
    assert_eq!(entry["consumed"], json!(false));

    let bonus = get_bonus(&s, "pc_sigrun", "ulfric_stormcloak_kinship").unwrap();
    assert_eq!(bonus.bonus_value, 1);
    assert!(consume_bonus(&mut s, "pc_sigrun", "ulfric_stormcloak_kinship").unwrap());
    assert!(get_bonus(&s, "pc_sigrun", "ulfric_stormcloak_kinship").is_none());
}

#[test]
fn inference_from_cp1252_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pc_hroki.json");
    fs::write(&path, b"{\"background\": \"Hroki\x92s kin fish the docks of Windhelm\"}").unwrap();
    let mut s = CampaignState::new();
    infer_from_file(&mut s, &path, &["npc_stat_ulfric_stormcloak"]).unwrap();
    assert!(get_bonus(&s, "pc_hroki", "ulfric_stormcloak_kinship").is_some());
}

#[test]
fn inference_reports_bad_path() {
    let dir = TempDir::new().unwrap();
    let mut s = CampaignState::new();
    let err = infer_from_file(&mut s, &dir.path().join("missing.json"), &["npc_stat_aela"]).unwrap_err();
    assert!(matches!(err, LoreError::State(_)));
    assert!(s.is_empty());
}

#[test]
fn divergence_then_branch_then_already_branched() {
    let mut s = CampaignState::from_value(json!({"major_events": []})).unwrap();
    let event = "Ulfric Stormcloak is assassinated in Windhelm";

    let Verdict::Diverged(found) = CanonGate::review(&s, event) else {
        panic!("expected divergence");
    };
    assert_eq!(found.entity, "ulfric stormcloak");

    Dragonbreak::branch(&mut s, event).unwrap();
    assert!(matches!(CanonGate::review(&s, event), Verdict::AlreadyBranched(_)));
    assert_eq!(s.get("major_events"), Some(&json!([event])));
}
