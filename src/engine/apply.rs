//! Folds adjudicated outcomes back into the episode's entity maps.
//!
//! This is the only mutation site for those maps outside graph rehydration.

use std::collections::BTreeMap;

use super::error::EngineError;
use crate::db::{GraphStore, StoreError};
use crate::id::EntityKind;
use crate::model::{EntityUpdate, Episode, Outcome};

fn apply_update(episode: &mut Episode, update: &EntityUpdate) -> Result<(), EngineError> {
    if EntityKind::of_uid(update.uid()) != Some(update.kind()) {
        return Err(EngineError::Validation(format!(
            "status update uid `{}` does not carry a {} prefix",
            update.uid(),
            update.kind().prefix()
        )));
    }
    match update {
        EntityUpdate::Actor(actor) => {
            episode.actors.insert(actor.uid.clone(), actor.clone());
        }
        EntityUpdate::Location(location) => {
            episode
                .locations
                .insert(location.uid.clone(), location.clone());
        }
        EntityUpdate::Junction(junction) => {
            episode
                .junctions
                .insert(junction.uid.clone(), junction.clone());
        }
        EntityUpdate::Item(item) => {
            episode.items.insert(item.uid.clone(), item.clone());
        }
    }
    Ok(())
}

/// Write every present status field into its entity map (overwrite by uid)
/// and return the deduplicated persistence batch. When several outcomes
/// touch the same entity, the last write wins in both the map and the batch,
/// so the store sees at most one upsert per entity per turn.
pub fn apply_outcomes(
    episode: &mut Episode,
    outcomes: &[Outcome],
) -> Result<BTreeMap<String, EntityUpdate>, EngineError> {
    let mut batch = BTreeMap::new();
    for outcome in outcomes {
        let statuses = outcome
            .resulting_source_entity_status
            .iter()
            .chain(outcome.resulting_target_entity_status.iter());
        for update in statuses {
            apply_update(episode, update)?;
            batch.insert(update.uid().to_string(), update.clone());
        }
    }
    Ok(batch)
}

/// Push one turn's batch to the store, partitioned by entity type in
/// dependency order so relationship endpoints exist before their edges.
pub async fn persist_batch<S: GraphStore>(
    store: &S,
    batch: &BTreeMap<String, EntityUpdate>,
) -> Result<(), StoreError> {
    let mut locations = Vec::new();
    let mut junctions = Vec::new();
    let mut actors = Vec::new();
    let mut items = Vec::new();
    for update in batch.values() {
        match update {
            EntityUpdate::Location(location) => locations.push(location.clone()),
            EntityUpdate::Junction(junction) => junctions.push(junction.clone()),
            EntityUpdate::Actor(actor) => actors.push(actor.clone()),
            EntityUpdate::Item(item) => items.push(item.clone()),
        }
    }
    if !locations.is_empty() {
        store.upsert_locations(&locations).await?;
    }
    if !junctions.is_empty() {
        store.upsert_junctions(&junctions).await?;
    }
    if !actors.is_empty() {
        store.upsert_actors(&actors).await?;
    }
    if !items.is_empty() {
        store.upsert_items(&items).await?;
    }
    Ok(())
}
