//! Round-robin turn loop over every actor in an episode.

use std::time::Duration;

use super::error::EngineError;
use super::policy::{ActorPolicy, OutcomeOracle};
use super::turn::TurnEngine;
use crate::db::GraphStore;
use crate::model::Episode;

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Total actor-turns to run before stopping.
    pub turn_limit: u32,
    /// Fixed pause after each committed turn.
    pub turn_delay: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            turn_limit: 10,
            turn_delay: None,
        }
    }
}

/// Drive the engine round-robin until the turn budget is spent.
///
/// The actor sequence is fixed at entry from the episode's sorted actor ids;
/// actors added mid-run do not join the rotation. Each turn works on a clone
/// of `episode` and writes the result back only on success, so the caller's
/// episode always holds the last committed snapshot — an error halts the
/// loop and leaves it untouched by the failed turn.
pub async fn run<P, O, S>(
    engine: &TurnEngine<P, O, S>,
    episode: &mut Episode,
    config: &RunConfig,
) -> Result<(), EngineError>
where
    P: ActorPolicy,
    O: OutcomeOracle,
    S: GraphStore,
{
    let actor_ids: Vec<String> = episode.actors.keys().cloned().collect();
    if actor_ids.is_empty() || config.turn_limit == 0 {
        return Ok(());
    }

    let mut turns_taken = 0u32;
    'rounds: loop {
        for actor_id in &actor_ids {
            if turns_taken >= config.turn_limit {
                break 'rounds;
            }
            let snapshot = episode.clone();
            *episode = engine.invoke(snapshot, actor_id).await?;
            turns_taken += 1;
            tracing::info!(actor_id, turn = turns_taken, "turn committed");
            if let Some(delay) = config.turn_delay {
                tokio::time::sleep(delay).await;
            }
        }
    }
    Ok(())
}
