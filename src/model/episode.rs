//! The live aggregate for one ongoing scenario at a landmark.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::action::{Action, Outcome};
use super::entity::{
    ActorEntity, ItemEntity, JunctionEntity, LandmarkEntity, LocationEntity,
    ObservableActorEntity,
};
use super::enums::LocationType;
use crate::id::EntityKind;

/// A landmark plus every entity currently at it, keyed by uid, and the
/// append-only action/outcome logs for the scenario so far.
///
/// Entity maps are overwrite-only: the latest state replaces the prior one
/// and no history is retained. Outside of graph rehydration, the maps are
/// mutated only by outcome application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub landmark: LandmarkEntity,
    #[serde(default)]
    pub locations: BTreeMap<String, LocationEntity>,
    #[serde(default)]
    pub junctions: BTreeMap<String, JunctionEntity>,
    #[serde(default)]
    pub actors: BTreeMap<String, ActorEntity>,
    #[serde(default)]
    pub items: BTreeMap<String, ItemEntity>,

    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

impl Episode {
    pub fn new(landmark: LandmarkEntity) -> Self {
        assert_eq!(
            EntityKind::of_uid(&landmark.uid),
            Some(EntityKind::Landmark),
            "new: `{}` is not a landmark uid",
            landmark.uid
        );
        Self {
            landmark,
            locations: BTreeMap::new(),
            junctions: BTreeMap::new(),
            actors: BTreeMap::new(),
            items: BTreeMap::new(),
            actions: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    /// Add a location during world construction.
    ///
    /// # Panics
    /// Panics if the uid prefix is wrong, if an `EXTERIOR_OPEN` location has
    /// no landmark id, or if a given landmark id names a different landmark.
    pub fn add_location(&mut self, location: LocationEntity) {
        assert_eq!(
            EntityKind::of_uid(&location.uid),
            Some(EntityKind::Location),
            "add_location: `{}` is not a location uid",
            location.uid
        );
        if location.kind == LocationType::ExteriorOpen {
            assert!(
                location.landmark_id.is_some(),
                "add_location: EXTERIOR_OPEN location {} requires a landmark_id",
                location.uid
            );
        }
        if let Some(landmark_id) = &location.landmark_id {
            assert_eq!(
                landmark_id, &self.landmark.uid,
                "add_location: location {} anchored to a foreign landmark",
                location.uid
            );
        }
        self.locations.insert(location.uid.clone(), location);
    }

    /// Add a junction during world construction.
    ///
    /// # Panics
    /// Panics if the uid prefix is wrong or either endpoint location is
    /// absent from this episode.
    pub fn add_junction(&mut self, junction: JunctionEntity) {
        assert_eq!(
            EntityKind::of_uid(&junction.uid),
            Some(EntityKind::Junction),
            "add_junction: `{}` is not a junction uid",
            junction.uid
        );
        assert!(
            self.locations.contains_key(&junction.from_location_id),
            "add_junction: from location {} not found",
            junction.from_location_id
        );
        assert!(
            self.locations.contains_key(&junction.to_location_id),
            "add_junction: to location {} not found",
            junction.to_location_id
        );
        self.junctions.insert(junction.uid.clone(), junction);
    }

    /// Add an actor during world construction.
    ///
    /// # Panics
    /// Panics if the uid prefix is wrong or the actor's location is absent.
    pub fn add_actor(&mut self, actor: ActorEntity) {
        assert_eq!(
            EntityKind::of_uid(&actor.uid),
            Some(EntityKind::Actor),
            "add_actor: `{}` is not an actor uid",
            actor.uid
        );
        assert!(
            self.locations.contains_key(&actor.location_id),
            "add_actor: location {} not found",
            actor.location_id
        );
        self.actors.insert(actor.uid.clone(), actor);
    }

    /// Add an item during world construction.
    ///
    /// # Panics
    /// Panics if the uid prefix is wrong or the holder is neither an actor
    /// nor a location in this episode.
    pub fn add_item(&mut self, item: ItemEntity) {
        assert_eq!(
            EntityKind::of_uid(&item.uid),
            Some(EntityKind::Item),
            "add_item: `{}` is not an item uid",
            item.uid
        );
        assert!(
            self.actors.contains_key(&item.holder_id)
                || self.locations.contains_key(&item.holder_id),
            "add_item: holder {} not found",
            item.holder_id
        );
        self.items.insert(item.uid.clone(), item);
    }

    /// The slice of the episode an actor can currently perceive: its
    /// location, the junctions touching that location, co-located actors,
    /// and items held by those actors or resting in the location.
    ///
    /// # Panics
    /// Panics if the actor or its location is absent from this episode.
    pub fn actor_surroundings(&self, actor_id: &str) -> Episode {
        let actor = self
            .actors
            .get(actor_id)
            .unwrap_or_else(|| panic!("actor_surroundings: actor {actor_id} not found"));
        let location = self
            .locations
            .get(&actor.location_id)
            .unwrap_or_else(|| panic!("actor_surroundings: location {} not found", actor.location_id));

        let junctions: BTreeMap<String, JunctionEntity> = self
            .junctions
            .values()
            .filter(|j| j.from_location_id == location.uid || j.to_location_id == location.uid)
            .map(|j| (j.uid.clone(), j.clone()))
            .collect();
        let actors: BTreeMap<String, ActorEntity> = self
            .actors
            .values()
            .filter(|a| a.location_id == location.uid)
            .map(|a| (a.uid.clone(), a.clone()))
            .collect();
        let items: BTreeMap<String, ItemEntity> = self
            .items
            .values()
            .filter(|i| {
                actors.contains_key(&i.holder_id)
                    || i.holder_id == location.uid
                    || i.holder_id == actor_id
            })
            .map(|i| (i.uid.clone(), i.clone()))
            .collect();

        Episode {
            landmark: self.landmark.clone(),
            locations: BTreeMap::from([(location.uid.clone(), location.clone())]),
            junctions,
            actors,
            items,
            actions: self.actions.clone(),
            outcomes: self.outcomes.clone(),
        }
    }

    /// All logged actions that target the given entity.
    pub fn actions_targeting(&self, entity_id: &str) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.target_entity_id == entity_id)
            .collect()
    }

    /// Items currently in an actor's hands.
    pub fn held_items(&self) -> Vec<&ItemEntity> {
        self.items
            .values()
            .filter(|i| !self.locations.contains_key(&i.holder_id))
            .collect()
    }

    /// Items resting in a location.
    pub fn dropped_items(&self) -> Vec<&ItemEntity> {
        self.items
            .values()
            .filter(|i| self.locations.contains_key(&i.holder_id))
            .collect()
    }

    /// Observable projections of every actor; internal state never crosses
    /// this boundary.
    pub fn observable_actors(&self) -> Vec<ObservableActorEntity> {
        self.actors.values().map(ActorEntity::observable).collect()
    }
}
