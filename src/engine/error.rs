use thiserror::Error;

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Generated data broke a contract: wrong action count for the actor
    /// type, an id prefix disagreeing with its declared type, or an outcome
    /// referencing an action from outside the current turn. The turn aborts
    /// before any entity mutation is committed.
    #[error("validation failed: {0}")]
    Validation(String),
    /// A referenced uid is absent from the episode. Fatal, never retried.
    #[error("lookup failed: {0}")]
    Lookup(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
