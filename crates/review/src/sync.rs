//! External publish side effect for activated versions.

use async_trait::async_trait;
use shotflow_store::models::{Shot, Version};

/// Errors from the external sync collaborator.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Artifact sync failed: {0}")]
    Failed(String),
}

/// Publishes a shot's active version to its canonical external
/// location (delivery folder, CDN, review portal).
///
/// Implementations must be idempotent: the activation rule re-triggers
/// publication on every positive vote and on supervisor approval.
#[async_trait]
pub trait ArtifactSync: Send + Sync {
    async fn publish_active(&self, version: &Version, shot: &Shot) -> Result<(), SyncError>;
}
