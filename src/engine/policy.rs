//! The two external collaborators a turn consults.
//!
//! Prompt construction, language-model invocation, and dice mechanics all
//! live behind these traits; the engine only enforces their contracts.

use super::error::EngineError;
use crate::model::{Action, Episode, Outcome};

/// Proposes the acting actor's actions for one turn.
///
/// Contract: a `ZOMBIE` actor yields exactly one action, a `HUMAN` exactly
/// two. An empty vector is a deliberate pass and ends the turn early;
/// any other count is rejected by the engine.
#[allow(async_fn_in_trait)]
pub trait ActorPolicy {
    async fn generate_actions(
        &self,
        episode: &Episode,
        actor_id: &str,
    ) -> Result<Vec<Action>, EngineError>;
}

/// Adjudicates the turn's actions into outcomes.
///
/// Outcomes may only reference actions passed in `actions`; an empty vector
/// ends the turn with the action log extended but no state change.
#[allow(async_fn_in_trait)]
pub trait OutcomeOracle {
    async fn evaluate_actions(
        &self,
        episode: &Episode,
        actions: &[Action],
    ) -> Result<Vec<Outcome>, EngineError>;
}
