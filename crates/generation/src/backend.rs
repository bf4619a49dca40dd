//! The generation backend collaborator contract.

use async_trait::async_trait;
use shotflow_core::error::CoreError;
use shotflow_core::types::EntityId;

use crate::job::{GenerationJob, JobId};
use crate::request::GenerationRequest;

/// Acknowledgement of a dispatched request.
#[derive(Debug, Clone)]
pub struct DispatchReceipt {
    /// The durable job id, when the backend assigns one synchronously.
    pub job_id: Option<String>,
}

/// Errors from the generation layer.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Generation backend error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The backend refused the request.
    #[error("Generation request rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached. Transient; the polling path
    /// retries on its next tick.
    #[error("Generation backend unavailable: {0}")]
    Unavailable(String),

    #[error("Job {0} not found in this context")]
    JobNotFound(JobId),

    /// A retry was requested for a job whose request settings were not
    /// reported by the backend.
    #[error("Job {0} has no stored request to retry from")]
    NoRequestSnapshot(JobId),
}

/// Asynchronous image-generation collaborator.
///
/// Dispatch acknowledges quickly; jobs reach a terminal state seconds
/// to minutes later and are observed via [`list`](Self::list), which is
/// idempotent and safe to poll.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Submit a request. A failure here means no job record was
    /// created backend-side.
    async fn dispatch(
        &self,
        shot_id: EntityId,
        request: &GenerationRequest,
    ) -> Result<DispatchReceipt, GenerationError>;

    /// The authoritative job list for a shot.
    async fn list(&self, shot_id: EntityId) -> Result<Vec<GenerationJob>, GenerationError>;
}
