//! Scene flags: once-only markers that stop an event from replaying.
//!
//! Flags live under `scene_flags`. The container is created the first time a
//! flag is actually set, so probing with [`seen`] never changes the document.

use serde_json::Value;

use crate::state::{CampaignState, is_truthy};

/// Root key holding all scene flags.
pub const SCENE_FLAGS: &str = "scene_flags";

/// True if `flag` holds a truthy value under `scene_flags`.
pub fn seen(state: &CampaignState, flag: &str) -> bool {
    value(state, flag).is_some_and(is_truthy)
}

/// True if `flag` is truthy under `scene_flags` or at the document root.
///
/// Some older documents store flags at the root; callers that gate on such
/// flags consult both places.
pub fn seen_anywhere(state: &CampaignState, flag: &str) -> bool {
    seen(state, flag) || state.get(flag).is_some_and(is_truthy)
}

/// Raw value of a scene flag.
pub fn value<'s>(state: &'s CampaignState, flag: &str) -> Option<&'s Value> {
    state
        .get(SCENE_FLAGS)
        .and_then(Value::as_object)
        .and_then(|flags| flags.get(flag))
}

/// String value of a scene flag, e.g. `dustmans_partner`.
pub fn str_value<'s>(state: &'s CampaignState, flag: &str) -> Option<&'s str> {
    value(state, flag).and_then(Value::as_str)
}

/// Set `flag` to `true`. Returns `true` only for the call that set it first.
pub fn mark(state: &mut CampaignState, flag: &str) -> bool {
    mark_value(state, flag, Value::Bool(true))
}

/// Set `flag` to a small scalar if it is not already set.
///
/// Returns `false` if the flag was already truthy, or if `scene_flags` holds
/// something other than an object (the document is left alone).
pub fn mark_value(state: &mut CampaignState, flag: &str, value: impl Into<Value>) -> bool {
    if seen(state, flag) {
        return false;
    }
    match state.object_mut(SCENE_FLAGS) {
        Ok(flags) => {
            flags.insert(flag.to_string(), value.into());
            tracing::debug!(flag, "scene flag set");
            true
        }
        Err(err) => {
            tracing::warn!(flag, error = %err, "cannot set scene flag");
            false
        }
    }
}

/// All truthy flag names, in document order.
pub fn all_set(state: &CampaignState) -> Vec<&str> {
    state
        .get(SCENE_FLAGS)
        .and_then(Value::as_object)
        .map(|flags| {
            flags
                .iter()
                .filter(|(_, v)| is_truthy(v))
                .map(|(k, _)| k.as_str())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn probe_does_not_create_container() {
        let s = CampaignState::new();
        assert!(!seen(&s, "anything"));
        assert!(s.get(SCENE_FLAGS).is_none());
    }

    #[test]
    fn first_mark_wins() {
        let mut s = CampaignState::new();
        assert!(mark(&mut s, "dustmans_entrance_done"));
        assert!(!mark(&mut s, "dustmans_entrance_done"));
        assert!(seen(&s, "dustmans_entrance_done"));
    }

    #[test]
    fn false_value_counts_as_unset() {
        let mut s = CampaignState::from_value(json!({"scene_flags": {"x": false}})).unwrap();
        assert!(!seen(&s, "x"));
        assert!(mark(&mut s, "x"));
        assert_eq!(value(&s, "x"), Some(&json!(true)));
    }

    #[test]
    fn scalar_flag() {
        let mut s = CampaignState::new();
        assert!(mark_value(&mut s, "dustmans_partner", "vilkas"));
        assert_eq!(str_value(&s, "dustmans_partner"), Some("vilkas"));
        // Already set: the first value stays.
        assert!(!mark_value(&mut s, "dustmans_partner", "aela"));
        assert_eq!(str_value(&s, "dustmans_partner"), Some("vilkas"));
    }

    #[test]
    fn wrong_typed_container_is_left_alone() {
        let mut s = CampaignState::from_value(json!({"scene_flags": "broken"})).unwrap();
        assert!(!mark(&mut s, "x"));
        assert_eq!(s.get(SCENE_FLAGS), Some(&json!("broken")));
    }

    #[test]
    fn root_level_flags() {
        let s = CampaignState::from_value(json!({"dragonbreak_occurred": true})).unwrap();
        assert!(!seen(&s, "dragonbreak_occurred"));
        assert!(seen_anywhere(&s, "dragonbreak_occurred"));
    }

    #[test]
    fn lists_set_flags_in_order() {
        let s = CampaignState::from_value(json!({
            "scene_flags": {"b": true, "a": 1, "off": false}
        }))
        .unwrap();
        assert_eq!(all_set(&s), vec!["b", "a"]);
    }
}
