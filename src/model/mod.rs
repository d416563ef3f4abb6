pub mod action;
pub mod entity;
pub mod enums;
pub mod episode;

pub use action::{Action, Outcome};
pub use entity::{
    ActorEntity, ActorInternalState, EntityUpdate, ItemEntity, JunctionEntity, LandmarkEntity,
    LocationEntity, ObservableActorEntity,
};
pub use enums::{
    ActionType, ActorArousal, ActorControl, ActorHealth, ActorType, EntityType, ItemCondition,
    JunctionAccessibility, JunctionCondition, LocationCondition, LocationType, OutcomeType,
};
pub use episode::Episode;
