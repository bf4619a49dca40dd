//! HTTP implementation of the generation backend contract.
//!
//! Wraps the generation service's REST endpoints (request submission,
//! per-shot job listing) using [`reqwest`].

use async_trait::async_trait;
use serde::Deserialize;
use shotflow_core::types::{EntityId, Timestamp};

use crate::backend::{DispatchReceipt, GenerationBackend, GenerationError};
use crate::config::BackendConfig;
use crate::job::{GenerationJob, JobId, JobStatus};
use crate::request::GenerationRequest;

/// HTTP client for the generation service.
pub struct HttpGenerationBackend {
    client: reqwest::Client,
    base_url: String,
}

/// Response of `POST /generation/create`.
#[derive(Debug, Deserialize)]
struct DispatchResponse {
    success: bool,
    generation_id: Option<String>,
    detail: Option<String>,
}

/// One job row as reported by `GET /generation/{shot_id}`.
///
/// Rows written before the status column existed carry no status; they
/// are finished jobs and default to `completed`.
#[derive(Debug, Deserialize)]
struct JobRecord {
    id: String,
    shot_id: EntityId,
    #[serde(default)]
    status: Option<JobStatus>,
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    model: String,
    #[serde(default)]
    aspect_ratio: String,
    resolution: Option<String>,
    image_url: Option<String>,
    error: Option<String>,
    ref_data: Option<GenerationRequest>,
    created_at: Timestamp,
}

impl JobRecord {
    fn into_job(self) -> GenerationJob {
        GenerationJob {
            id: JobId::remote(self.id),
            shot_id: self.shot_id,
            status: self.status.unwrap_or(JobStatus::Completed),
            prompt: self.prompt,
            model: self.model,
            aspect_ratio: self.aspect_ratio,
            resolution: self.resolution,
            result_url: self.image_url,
            error: self.error,
            request: self.ref_data,
            created_at: self.created_at,
        }
    }
}

impl HttpGenerationBackend {
    pub fn new(config: BackendConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            base_url: config.base_url,
        }
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling across
    /// backends).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, or surface the
    /// status and body for debugging.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GenerationError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GenerationError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl GenerationBackend for HttpGenerationBackend {
    async fn dispatch(
        &self,
        shot_id: EntityId,
        request: &GenerationRequest,
    ) -> Result<DispatchReceipt, GenerationError> {
        let body = serde_json::json!({
            "shot_id": shot_id,
            "request": request,
        });

        let response = self
            .client
            .post(format!("{}/generation/create", self.base_url))
            .json(&body)
            .send()
            .await?;

        let parsed: DispatchResponse = Self::parse_response(response).await?;
        if !parsed.success {
            return Err(GenerationError::Rejected(
                parsed.detail.unwrap_or_else(|| "unknown reason".to_string()),
            ));
        }

        tracing::info!(
            shot_id = %shot_id,
            mode = request.mode(),
            generation_id = ?parsed.generation_id,
            "Generation request dispatched",
        );

        Ok(DispatchReceipt {
            job_id: parsed.generation_id,
        })
    }

    async fn list(&self, shot_id: EntityId) -> Result<Vec<GenerationJob>, GenerationError> {
        let response = self
            .client
            .get(format!("{}/generation/{}", self.base_url, shot_id))
            .send()
            .await?;

        let records: Vec<JobRecord> = Self::parse_response(response).await?;
        Ok(records.into_iter().map(JobRecord::into_job).collect())
    }
}
