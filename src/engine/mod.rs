//! The per-actor turn pipeline and the round-robin loop that drives it.

pub mod apply;
pub mod error;
pub mod policy;
pub mod runner;
pub mod turn;

pub use apply::apply_outcomes;
pub use error::EngineError;
pub use policy::{ActorPolicy, OutcomeOracle};
pub use runner::{RunConfig, run};
pub use turn::TurnEngine;
