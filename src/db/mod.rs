//! Durable property-graph store for episode entities.
//!
//! Upserts are batched per entity type and idempotent (merge by uid), so a
//! failed batch is safe to retry whole. Rehydration reconstructs an episode
//! from the connected subgraph around a landmark node.

pub mod hydrate;
pub mod migrate;
pub mod store;

use thiserror::Error;

use crate::model::{
    ActorEntity, Episode, ItemEntity, JunctionEntity, LandmarkEntity, LocationEntity,
};

pub use migrate::migrate;
pub use store::PgGraphStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A loaded subgraph could not be turned back into a valid episode:
    /// missing required property, unknown enum value, or a dangling edge.
    #[error("hydration failed: {0}")]
    Hydration(String),
}

/// Batched, idempotent upserts plus full-episode rehydration.
#[allow(async_fn_in_trait)]
pub trait GraphStore {
    async fn upsert_landmarks(&self, batch: &[LandmarkEntity]) -> Result<(), StoreError>;
    async fn upsert_locations(&self, batch: &[LocationEntity]) -> Result<(), StoreError>;
    async fn upsert_junctions(&self, batch: &[JunctionEntity]) -> Result<(), StoreError>;
    async fn upsert_actors(&self, batch: &[ActorEntity]) -> Result<(), StoreError>;
    async fn upsert_items(&self, batch: &[ItemEntity]) -> Result<(), StoreError>;

    /// Reconstruct the episode rooted at a landmark. `Ok(None)` when the
    /// landmark has no stored subgraph.
    async fn load_episode(&self, landmark_id: &str) -> Result<Option<Episode>, StoreError>;
}

/// Persist a freshly built episode in dependency order: landmark first, then
/// locations, junctions, actors, items, so every edge finds its endpoints.
pub async fn save_episode<S: GraphStore>(store: &S, episode: &Episode) -> Result<(), StoreError> {
    store
        .upsert_landmarks(std::slice::from_ref(&episode.landmark))
        .await?;
    let locations: Vec<_> = episode.locations.values().cloned().collect();
    store.upsert_locations(&locations).await?;
    let junctions: Vec<_> = episode.junctions.values().cloned().collect();
    store.upsert_junctions(&junctions).await?;
    let actors: Vec<_> = episode.actors.values().cloned().collect();
    store.upsert_actors(&actors).await?;
    let items: Vec<_> = episode.items.values().cloned().collect();
    store.upsert_items(&items).await?;
    Ok(())
}
