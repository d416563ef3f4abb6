//! Entity records for the world graph.
//!
//! Every entity carries a `uid`, a proper `name`, and a `fact` — a single
//! declarative statement describing its present state. Facts are overwritten
//! on update, never appended; the graph keeps only the latest state.

use serde::{Deserialize, Serialize};

use super::enums::{
    ActorArousal, ActorControl, ActorHealth, ActorType, ItemCondition, JunctionAccessibility,
    JunctionCondition, LocationCondition, LocationType,
};
use crate::id::EntityKind;

/// A public, noteworthy place that would appear on a map. Landmarks have no
/// owning parent; an episode is rooted at exactly one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkEntity {
    pub uid: String,
    pub name: String,
    pub fact: String,
}

/// A room, yard, street, or other area within a landmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEntity {
    pub uid: String,
    pub name: String,
    pub fact: String,
    #[serde(rename = "type")]
    pub kind: LocationType,
    pub condition: LocationCondition,
    /// Required when `kind` is `EXTERIOR_OPEN`; open exteriors anchor the
    /// location to its landmark on the map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark_id: Option<String>,
}

/// A passage (door, window, gate) between two locations.
///
/// A junction is an edge, not a freestanding node: when locked or
/// barricaded, the `from` side controls the blockage and the `to` side is
/// the one being kept out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JunctionEntity {
    pub uid: String,
    pub name: String,
    pub fact: String,
    pub condition: JunctionCondition,
    pub accessibility: JunctionAccessibility,
    pub from_location_id: String,
    pub to_location_id: String,
}

/// Goals and emotion that drive an actor but are never observable by other
/// actors. Persisted as an opaque encoded blob, never in observable views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorInternalState {
    pub actor_id: String,
    /// The end goal of the actor's whole story (escape the city, find a
    /// loved one, ...). Drives action when nothing is urgent.
    pub campaign_goal: String,
    /// The planned objective while at the current landmark.
    pub episode_goal: String,
    /// The next concrete step toward the episode goal.
    pub immediate_goal: String,
    pub emotion: String,
    /// Set when the actor is bitten.
    #[serde(default)]
    pub is_infected: bool,
}

/// A human or zombie character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorEntity {
    pub uid: String,
    pub name: String,
    pub fact: String,
    #[serde(rename = "type")]
    pub kind: ActorType,
    pub health: ActorHealth,
    pub arousal: ActorArousal,
    pub control: ActorControl,
    pub location_id: String,
    pub internal: ActorInternalState,
}

impl ActorEntity {
    /// The projection other actors are allowed to see: everything except
    /// `internal`.
    pub fn observable(&self) -> ObservableActorEntity {
        ObservableActorEntity {
            uid: self.uid.clone(),
            name: self.name.clone(),
            fact: self.fact.clone(),
            kind: self.kind,
            health: self.health,
            arousal: self.arousal,
            control: self.control,
            location_id: self.location_id.clone(),
        }
    }
}

/// The observable slice of an actor. Constructed only via
/// [`ActorEntity::observable`], so internal state cannot leak through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservableActorEntity {
    pub uid: String,
    pub name: String,
    pub fact: String,
    #[serde(rename = "type")]
    pub kind: ActorType,
    pub health: ActorHealth,
    pub arousal: ActorArousal,
    pub control: ActorControl,
    pub location_id: String,
}

/// An interactable object held by an actor or resting in a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEntity {
    pub uid: String,
    pub name: String,
    pub fact: String,
    pub condition: ItemCondition,
    /// An actor or location uid.
    pub holder_id: String,
}

/// The closed set of entity states an outcome may write back.
///
/// Landmarks are deliberately absent: outcomes never rewrite the episode
/// root. Dispatch sites match exhaustively, so adding an entity kind is a
/// compile-time change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity_type")]
pub enum EntityUpdate {
    #[serde(rename = "ACTOR")]
    Actor(ActorEntity),
    #[serde(rename = "LOCATION")]
    Location(LocationEntity),
    #[serde(rename = "JUNCTION")]
    Junction(JunctionEntity),
    #[serde(rename = "ITEM")]
    Item(ItemEntity),
}

impl EntityUpdate {
    pub fn uid(&self) -> &str {
        match self {
            EntityUpdate::Actor(actor) => &actor.uid,
            EntityUpdate::Location(location) => &location.uid,
            EntityUpdate::Junction(junction) => &junction.uid,
            EntityUpdate::Item(item) => &item.uid,
        }
    }

    /// The uid kind this variant requires its entity to carry.
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityUpdate::Actor(_) => EntityKind::Actor,
            EntityUpdate::Location(_) => EntityKind::Location,
            EntityUpdate::Junction(_) => EntityKind::Junction,
            EntityUpdate::Item(_) => EntityKind::Item,
        }
    }
}
