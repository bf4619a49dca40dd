use shotflow_core::error::CoreError;
use shotflow_store::error::StoreError;

/// Errors from review transitions.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// A domain rule refused the transition (validation, permission).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A collaborator write or read failed. No local state was mutated
    /// optimistically; callers re-fetch rather than assume.
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ReviewResult<T> = Result<T, ReviewError>;
