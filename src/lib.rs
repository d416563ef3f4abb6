pub mod db;
pub mod engine;
pub mod flush;
pub mod id;
pub mod model;

pub use db::{GraphStore, PgGraphStore, StoreError, migrate, save_episode};
pub use engine::{ActorPolicy, EngineError, OutcomeOracle, RunConfig, TurnEngine, run};
pub use flush::flush_to_jsonl;
pub use id::{EntityKind, IdGenerator};
pub use model::{
    Action, ActionType, ActorEntity, ActorInternalState, ActorType, EntityType, EntityUpdate,
    Episode, ItemEntity, JunctionEntity, LandmarkEntity, LocationEntity, ObservableActorEntity,
    Outcome, OutcomeType,
};
