//! Generation jobs and their two-phase identity.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shotflow_core::types::{EntityId, Timestamp};

use crate::request::GenerationRequest;

/// Identity of a generation job.
///
/// A job is created locally with a `Local` id before dispatch; once the
/// backend acknowledges it, the entry is re-keyed in place to the
/// backend's `Remote` id. A job only ever carries one id at a time, so
/// equality on `JobId` is the dedup key for the merged view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum JobId {
    Local(uuid::Uuid),
    Remote(String),
}

impl JobId {
    /// A fresh temporary id for an optimistic entry.
    pub fn local() -> Self {
        JobId::Local(uuid::Uuid::new_v4())
    }

    pub fn remote(id: impl Into<String>) -> Self {
        JobId::Remote(id.into())
    }

    /// Whether this id is still the temporary pre-dispatch one.
    pub fn is_local(&self) -> bool {
        matches!(self, JobId::Local(_))
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Local(id) => write!(f, "{id}"),
            JobId::Remote(id) => write!(f, "{id}"),
        }
    }
}

/// Lifecycle state of a job. `Failed` is a valid terminal state, not an
/// error: the failure message is carried on the job itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
}

/// One generation job as presented in the merged view.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationJob {
    pub id: JobId,
    pub shot_id: EntityId,
    pub status: JobStatus,
    pub prompt: String,
    pub model: String,
    pub aspect_ratio: String,
    pub resolution: Option<String>,
    /// Set once the job completes.
    pub result_url: Option<String>,
    /// Set when the backend reports the job failed.
    pub error: Option<String>,
    /// The request that produced this job, kept so a failed job's
    /// settings can be restored and re-submitted.
    pub request: Option<GenerationRequest>,
    pub created_at: Timestamp,
}

impl GenerationJob {
    /// Build the optimistic pending entry for a just-submitted request.
    pub fn pending(shot_id: EntityId, request: &GenerationRequest) -> Self {
        let params = request.params();
        Self {
            id: JobId::local(),
            shot_id,
            status: JobStatus::Pending,
            prompt: request.prompt_summary(),
            model: params.model.clone(),
            aspect_ratio: params.aspect_ratio.clone(),
            resolution: params.resolution.clone(),
            result_url: None,
            error: None,
            request: Some(request.clone()),
            created_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == JobStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::GenerationParams;

    fn request() -> GenerationRequest {
        GenerationRequest::Manual {
            params: GenerationParams {
                model: "sketchwave-2".into(),
                aspect_ratio: "16:9".into(),
                resolution: None,
            },
            prompt: "wide shot, dusk".into(),
            references: vec![],
        }
    }

    #[test]
    fn pending_job_starts_local_and_pending() {
        let shot_id = uuid::Uuid::new_v4();
        let job = GenerationJob::pending(shot_id, &request());

        assert!(job.id.is_local());
        assert!(job.is_pending());
        assert_eq!(job.shot_id, shot_id);
        assert_eq!(job.prompt, "wide shot, dusk");
        assert!(job.result_url.is_none());
        assert!(job.request.is_some());
    }

    #[test]
    fn local_ids_are_unique() {
        assert_ne!(JobId::local(), JobId::local());
    }

    #[test]
    fn remote_ids_compare_by_value() {
        assert_eq!(JobId::remote("gen-7"), JobId::remote("gen-7"));
        assert_ne!(JobId::remote("gen-7"), JobId::remote("gen-8"));
        assert!(!JobId::remote("gen-7").is_local());
    }

    #[test]
    fn display_shows_raw_id() {
        assert_eq!(JobId::remote("gen-7").to_string(), "gen-7");
    }
}
