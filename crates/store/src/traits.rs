//! Async collaborator contracts consumed by the coordination layer.
//!
//! Implementations live outside this workspace (the production data
//! service) or in [`crate::memory`] for tests and single-process use.
//! All methods take `&self`; implementations are expected to be shared
//! behind `Arc<dyn ...>`.

use async_trait::async_trait;
use shotflow_core::review::ReviewTier;
use shotflow_core::roles::Role;
use shotflow_core::sequence::SequenceAssignment;
use shotflow_core::types::{EntityId, Timestamp};

use crate::error::StoreResult;
use crate::models::{
    NewNotification, NewShot, NewVersion, Notification, Project, Review, Scene, Shot, UserProfile,
    Version,
};

/// Read access to users, projects, and scenes.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn user(&self, id: EntityId) -> StoreResult<UserProfile>;
    async fn users_with_role(&self, role: Role) -> StoreResult<Vec<UserProfile>>;
    async fn project(&self, id: EntityId) -> StoreResult<Project>;
    async fn scene(&self, id: EntityId) -> StoreResult<Scene>;
}

/// Shot CRUD and ordering.
#[async_trait]
pub trait ShotStore: Send + Sync {
    async fn shot(&self, id: EntityId) -> StoreResult<Shot>;

    /// All shots of a scene, deleted ones included, ordered by sequence.
    async fn shots_in_scene(&self, scene_id: EntityId) -> StoreResult<Vec<Shot>>;

    async fn create_shot(&self, new: NewShot) -> StoreResult<Shot>;

    /// Apply a batch of sequence (and optional name) assignments as one
    /// logical operation: either every assignment lands or none do.
    async fn apply_sequence_updates(
        &self,
        scene_id: EntityId,
        assignments: &[SequenceAssignment],
    ) -> StoreResult<()>;

    /// Flip the soft-delete flag.
    async fn set_deleted(
        &self,
        shot_id: EntityId,
        deleted: bool,
        deleted_at: Option<Timestamp>,
    ) -> StoreResult<Shot>;
}

/// Version storage. Owns monotonic `version_number` assignment and the
/// exactly-one-active switch.
#[async_trait]
pub trait VersionStore: Send + Sync {
    async fn version(&self, id: EntityId) -> StoreResult<Version>;

    /// Versions of a shot, newest number first.
    async fn versions_for_shot(&self, shot_id: EntityId) -> StoreResult<Vec<Version>>;

    async fn active_version(&self, shot_id: EntityId) -> StoreResult<Option<Version>>;

    /// Create a version with `version_number = max(existing) + 1`,
    /// inactive.
    async fn create_version(&self, new: NewVersion) -> StoreResult<Version>;

    /// Make `version_id` the shot's single active version, clearing any
    /// previous one, as one atomic switch.
    async fn activate(&self, shot_id: EntityId, version_id: EntityId) -> StoreResult<Version>;
}

/// Review storage.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn review(&self, id: EntityId) -> StoreResult<Review>;
    async fn review_for_version(&self, version_id: EntityId) -> StoreResult<Review>;

    /// Attach a fresh review to a version.
    async fn create_review(&self, version_id: EntityId) -> StoreResult<Review>;

    async fn record_vote(
        &self,
        review_id: EntityId,
        tier: ReviewTier,
        vote: bool,
        voted_at: Timestamp,
    ) -> StoreResult<Review>;

    async fn record_comment(
        &self,
        review_id: EntityId,
        tier: ReviewTier,
        comment: &str,
        image_url: Option<&str>,
    ) -> StoreResult<Review>;

    async fn record_master_vote(&self, review_id: EntityId, vote: bool) -> StoreResult<Review>;
}

/// Notification sink and inbox.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, new: NewNotification) -> StoreResult<Notification>;

    /// A user's notifications, newest first.
    async fn for_user(&self, user_id: EntityId) -> StoreResult<Vec<Notification>>;

    async fn mark_read(&self, ids: &[EntityId]) -> StoreResult<()>;
}
