use shotflow_core::types::EntityId;

/// Errors surfaced by the storage collaborators.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backing service could not be reached. Transient; callers on
    /// a polling path retry on their next tick.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
