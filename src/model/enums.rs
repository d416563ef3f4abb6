//! String-valued enumerations used verbatim in persisted and generated data.
//!
//! Every variant serializes to its SCREAMING_SNAKE_CASE wire string; closed
//! sets, so an unknown value fails deserialization instead of being smuggled
//! through as a catch-all.

use serde::{Deserialize, Serialize};

use crate::id::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Move,
    Inspect,
    Prepare,
    Talk,
    Fight,
    Hold,
    Freeze,
    Escape,
    Focus,
}

/// The kinds of entity an action may target.
/// Narrower than [`EntityKind`]: landmarks are never action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Actor,
    Location,
    Junction,
    Item,
}

impl EntityType {
    /// The uid prefix kind this target type requires.
    pub fn kind(self) -> EntityKind {
        match self {
            EntityType::Actor => EntityKind::Actor,
            EntityType::Location => EntityKind::Location,
            EntityType::Junction => EntityKind::Junction,
            EntityType::Item => EntityKind::Item,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorType {
    Human,
    Zombie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorHealth {
    GoodHealth,
    FairHealth,
    PoorHealth,
    CriticalHealth,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorArousal {
    Intense,
    Alert,
    Calm,
    Passive,
    Unresponsive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorControl {
    Dominant,
    Assertive,
    Composed,
    Submissive,
    Immobilized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Interior,
    ExteriorOpen,
    ExteriorGated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationCondition {
    Functional,
    Damaged,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JunctionCondition {
    Functional,
    Damaged,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JunctionAccessibility {
    Open,
    Closed,
    Locked,
    Barricaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemCondition {
    GoodCondition,
    Functional,
    Damaged,
    Broken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeType {
    CriticalSuccess,
    Success,
    Failure,
    CriticalFailure,
}
