//! Proposed actions and their adjudicated outcomes.
//!
//! Actions are produced once per turn by the actor policy, outcomes by the
//! outcome oracle; both are immutable once appended to the episode log.

use serde::{Deserialize, Serialize};

use super::entity::EntityUpdate;
use super::enums::{ActionType, EntityType, OutcomeType};

/// A fact-described activity proposed by one actor against one target entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub uid: String,
    #[serde(rename = "type")]
    pub kind: ActionType,
    /// Where the action takes place.
    pub location_id: String,
    pub source_actor_id: String,
    pub target_entity_id: String,
    /// Must agree with the prefix of `target_entity_id`.
    pub target_entity_type: EntityType,
    pub fact: String,
}

/// The evaluated result of a single action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub action_id: String,
    #[serde(rename = "type")]
    pub kind: OutcomeType,
    /// How visible or loud the action was to the rest of the episode.
    pub attention: i32,
    /// New state for the acting entity; when present it must be an actor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resulting_source_entity_status: Option<EntityUpdate>,
    /// New state for the targeted entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resulting_target_entity_status: Option<EntityUpdate>,
    pub fact: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_serializes_expected_shape() {
        let action = Action {
            uid: "action_0000001".to_string(),
            kind: ActionType::Move,
            location_id: "location_1000002".to_string(),
            source_actor_id: "actor_1000003".to_string(),
            target_entity_id: "location_1000002".to_string(),
            target_entity_type: EntityType::Location,
            fact: "Mara darts across the waiting room.".to_string(),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "MOVE");
        assert_eq!(json["target_entity_type"], "LOCATION");
        assert_eq!(json["source_actor_id"], "actor_1000003");
    }

    #[test]
    fn outcome_omits_absent_statuses() {
        let outcome = Outcome {
            action_id: "action_0000001".to_string(),
            kind: OutcomeType::Success,
            attention: 3,
            resulting_source_entity_status: None,
            resulting_target_entity_status: None,
            fact: "Mara crosses unnoticed.".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["type"], "SUCCESS");
        assert!(json.get("resulting_source_entity_status").is_none());
        assert!(json.get("resulting_target_entity_status").is_none());
    }

    #[test]
    fn outcome_round_trips() {
        let json = r#"{
            "action_id": "action_0000001",
            "type": "CRITICAL_FAILURE",
            "attention": 8,
            "fact": "The door slams loudly."
        }"#;
        let outcome: Outcome = serde_json::from_str(json).unwrap();
        assert_eq!(outcome.kind, OutcomeType::CriticalFailure);
        assert_eq!(outcome.attention, 8);
        assert!(outcome.resulting_source_entity_status.is_none());
    }
}
