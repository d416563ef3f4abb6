//! One actor's turn: generate, evaluate, apply, persist.

use super::apply;
use super::error::EngineError;
use super::policy::{ActorPolicy, OutcomeOracle};
use crate::db::GraphStore;
use crate::id::EntityKind;
use crate::model::{Action, ActorHealth, ActorType, EntityType, EntityUpdate, Episode, Outcome};

/// Runs the per-actor pipeline against a policy, an oracle, and a store.
///
/// `invoke` consumes an episode snapshot and returns the updated snapshot;
/// callers own the commit decision. A turn either runs all three stages or
/// exits early with the episode unchanged past the stages that did run —
/// entity maps are only touched in the final stage.
#[derive(Debug)]
pub struct TurnEngine<P, O, S> {
    policy: P,
    oracle: O,
    store: S,
}

impl<P: ActorPolicy, O: OutcomeOracle, S: GraphStore> TurnEngine<P, O, S> {
    pub fn new(policy: P, oracle: O, store: S) -> Self {
        Self {
            policy,
            oracle,
            store,
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn invoke(
        &self,
        mut episode: Episode,
        actor_id: &str,
    ) -> Result<Episode, EngineError> {
        let actor = episode
            .actors
            .get(actor_id)
            .ok_or_else(|| EngineError::Lookup(format!("actor {actor_id} not in episode")))?;
        if actor.health == ActorHealth::Dead {
            tracing::debug!(actor_id, "dead actor, turn is a no-op");
            return Ok(episode);
        }
        let expected_actions = match actor.kind {
            ActorType::Zombie => 1,
            ActorType::Human => 2,
        };

        let actions = self.policy.generate_actions(&episode, actor_id).await?;
        if actions.is_empty() {
            tracing::debug!(actor_id, "policy passed, no actions this turn");
            return Ok(episode);
        }
        if actions.len() != expected_actions {
            return Err(EngineError::Validation(format!(
                "actor {actor_id} must produce {expected_actions} action(s), got {}",
                actions.len()
            )));
        }
        for action in &actions {
            validate_action(&episode, actor_id, action)?;
        }
        episode.actions.extend(actions.iter().cloned());

        let outcomes = self.oracle.evaluate_actions(&episode, &actions).await?;
        if outcomes.is_empty() {
            tracing::debug!(actor_id, "oracle produced no outcomes");
            return Ok(episode);
        }
        for outcome in &outcomes {
            validate_outcome(&actions, outcome)?;
        }
        episode.outcomes.extend(outcomes.iter().cloned());

        let batch = apply::apply_outcomes(&mut episode, &outcomes)?;
        apply::persist_batch(&self.store, &batch).await?;
        tracing::debug!(
            actor_id,
            actions = actions.len(),
            outcomes = outcomes.len(),
            touched = batch.len(),
            "turn complete"
        );
        Ok(episode)
    }
}

fn validate_action(episode: &Episode, actor_id: &str, action: &Action) -> Result<(), EngineError> {
    if action.source_actor_id != actor_id {
        return Err(EngineError::Validation(format!(
            "action {} sourced from {} during {actor_id}'s turn",
            action.uid, action.source_actor_id
        )));
    }
    if EntityKind::of_uid(&action.target_entity_id) != Some(action.target_entity_type.kind()) {
        return Err(EngineError::Validation(format!(
            "action {} target `{}` does not match declared type {:?}",
            action.uid, action.target_entity_id, action.target_entity_type
        )));
    }
    if !episode.locations.contains_key(&action.location_id) {
        return Err(EngineError::Lookup(format!(
            "action {} placed at unknown location {}",
            action.uid, action.location_id
        )));
    }
    let target_known = match action.target_entity_type {
        EntityType::Actor => episode.actors.contains_key(&action.target_entity_id),
        EntityType::Location => episode.locations.contains_key(&action.target_entity_id),
        EntityType::Junction => episode.junctions.contains_key(&action.target_entity_id),
        EntityType::Item => episode.items.contains_key(&action.target_entity_id),
    };
    if !target_known {
        return Err(EngineError::Lookup(format!(
            "action {} targets unknown entity {}",
            action.uid, action.target_entity_id
        )));
    }
    Ok(())
}

fn validate_outcome(actions: &[Action], outcome: &Outcome) -> Result<(), EngineError> {
    if !actions.iter().any(|a| a.uid == outcome.action_id) {
        return Err(EngineError::Validation(format!(
            "outcome references action {} from outside this turn",
            outcome.action_id
        )));
    }
    if let Some(update) = &outcome.resulting_source_entity_status {
        if !matches!(update, EntityUpdate::Actor(_)) {
            return Err(EngineError::Validation(format!(
                "source status for action {} is not an actor update",
                outcome.action_id
            )));
        }
    }
    Ok(())
}
