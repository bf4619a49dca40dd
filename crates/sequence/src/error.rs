use shotflow_core::error::CoreError;
use shotflow_store::error::StoreError;

/// Errors from scene restructuring.
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    /// A domain rule refused the operation (validation, permission).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A collaborator call failed. Batches are all-or-nothing, so the
    /// caller re-fetches the authoritative order rather than assuming a
    /// partial apply.
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type SequenceResult<T> = Result<T, SequenceError>;
