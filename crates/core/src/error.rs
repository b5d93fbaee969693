use crate::types::EntityId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Durable backend unreachable or unconfigured. Callers degrade to the
    /// ephemeral backend or an empty result set; never fatal.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A durable write failed after the local optimistic apply. Local state
    /// is retained; there is no automatic retry or rollback.
    #[error("Transient write failure: {0}")]
    TransientWrite(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
