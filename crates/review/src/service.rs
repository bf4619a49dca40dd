//! Review transitions.

use std::sync::Arc;

use chrono::Utc;

use shotflow_core::error::CoreError;
use shotflow_core::review::{self, ReviewTier, ShotStatus};
use shotflow_core::roles::{self, ActorContext, Role};
use shotflow_core::types::EntityId;
use shotflow_core::progress;

use shotflow_events::{route, DomainEvent, EventBus, Notifier, ReviewAction, RoutingContext};
use shotflow_store::error::StoreError;
use shotflow_store::models::{NewVersion, Review, Shot, Version};
use shotflow_store::traits::{CatalogStore, ReviewStore, ShotStore, VersionStore};

use crate::error::ReviewResult;
use crate::sync::ArtifactSync;

/// Result of the external publish attempt attached to a vote outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// No publish was due (negative vote).
    NotAttempted,
    Synced,
    /// The vote is recorded but the external location is out of date.
    /// Surfaced to the user as a warning; never rolled back.
    Failed(String),
}

/// What a vote (or supervisor approval) did.
#[derive(Debug, Clone)]
pub struct VoteOutcome {
    pub review: Review,
    /// Whether this call moved the active pointer. Re-approving an
    /// already-active version re-publishes but reports `false` here.
    pub activated: bool,
    pub sync: SyncStatus,
}

/// Orchestrates every review transition against the collaborator
/// stores.
pub struct ReviewService {
    shots: Arc<dyn ShotStore>,
    versions: Arc<dyn VersionStore>,
    reviews: Arc<dyn ReviewStore>,
    catalog: Arc<dyn CatalogStore>,
    sync: Arc<dyn ArtifactSync>,
    notifier: Notifier,
    bus: Arc<EventBus>,
}

impl ReviewService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        shots: Arc<dyn ShotStore>,
        versions: Arc<dyn VersionStore>,
        reviews: Arc<dyn ReviewStore>,
        catalog: Arc<dyn CatalogStore>,
        sync: Arc<dyn ArtifactSync>,
        notifier: Notifier,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            shots,
            versions,
            reviews,
            catalog,
            sync,
            notifier,
            bus,
        }
    }

    /// Upload or promote an artifact as the shot's next version.
    ///
    /// Assigns `version_number = max + 1`, attaches the one-to-one
    /// review, and notifies the reviewers. New versions start inactive;
    /// only a vote activates them.
    pub async fn create_version(
        &self,
        actor: &ActorContext,
        shot_id: EntityId,
        artifact_url: &str,
    ) -> ReviewResult<(Version, Review)> {
        let shot = self.shots.shot(shot_id).await?;
        if !roles::can_upload_version(actor, shot.assigned_artist_id) {
            return Err(CoreError::Forbidden(format!(
                "Role '{}' cannot add versions to this shot",
                actor.role.as_str()
            ))
            .into());
        }

        let version = self
            .versions
            .create_version(NewVersion {
                shot_id,
                uploader_id: actor.user_id,
                artifact_url: artifact_url.to_string(),
            })
            .await?;
        let review = self.reviews.create_review(version.id).await?;

        tracing::info!(
            shot_id = %shot_id,
            version_id = %version.id,
            version_number = version.version_number,
            "Version created",
        );

        self.bus.publish(
            DomainEvent::new("version.created")
                .for_shot(shot_id)
                .by(actor.user_id)
                .with_payload(serde_json::json!({
                    "version_id": version.id,
                    "version_number": version.version_number,
                })),
        );
        self.notify(ReviewAction::VersionAdded, &shot, actor).await;

        Ok((version, review))
    }

    /// Cast a tier vote.
    ///
    /// A positive vote marks the owning version active (clearing any
    /// previously active one) and dispatches the external publish; a
    /// second positive vote re-publishes without moving the pointer. A
    /// negative vote only records the outcome; it never deactivates.
    pub async fn cast_vote(
        &self,
        actor: &ActorContext,
        review_id: EntityId,
        tier: ReviewTier,
        vote: bool,
    ) -> ReviewResult<VoteOutcome> {
        roles::ensure_can_vote(actor, tier)?;

        let review = self
            .reviews
            .record_vote(review_id, tier, vote, Utc::now())
            .await?;
        let version = self.versions.version(review.version_id).await?;
        let shot = self.shots.shot(version.shot_id).await?;

        tracing::info!(
            review_id = %review_id,
            tier = tier.as_str(),
            vote,
            shot_id = %shot.id,
            "Vote recorded",
        );

        let mut activated = false;
        let mut sync_status = SyncStatus::NotAttempted;

        if review::vote_activates(vote) {
            let was_active = version.is_active;
            let version = self.versions.activate(shot.id, version.id).await?;
            activated = !was_active;
            if activated {
                self.bus.publish(
                    DomainEvent::new("version.activated")
                        .for_shot(shot.id)
                        .by(actor.user_id)
                        .with_payload(serde_json::json!({
                            "version_id": version.id,
                            "version_number": version.version_number,
                        })),
                );
            }
            sync_status = self.publish_artifact(&version, &shot).await;
        }

        self.bus.publish(
            DomainEvent::new("review.vote_cast")
                .for_shot(shot.id)
                .by(actor.user_id)
                .with_payload(serde_json::json!({
                    "review_id": review_id,
                    "tier": tier.as_str(),
                    "vote": vote,
                })),
        );
        self.notify(ReviewAction::FeedbackSaved, &shot, actor).await;

        Ok(VoteOutcome {
            review,
            activated,
            sync: sync_status,
        })
    }

    /// Save written feedback (and optionally an attachment) on a tier
    /// without touching its vote.
    pub async fn save_comment(
        &self,
        actor: &ActorContext,
        review_id: EntityId,
        tier: ReviewTier,
        comment: &str,
        attachment_url: Option<&str>,
    ) -> ReviewResult<Review> {
        roles::ensure_can_vote(actor, tier)?;
        review::validate_feedback_comment(comment)?;

        let review = self
            .reviews
            .record_comment(review_id, tier, comment, attachment_url)
            .await?;
        let version = self.versions.version(review.version_id).await?;
        let shot = self.shots.shot(version.shot_id).await?;

        self.bus.publish(
            DomainEvent::new("review.comment_saved")
                .for_shot(shot.id)
                .by(actor.user_id)
                .with_payload(serde_json::json!({
                    "review_id": review_id,
                    "tier": tier.as_str(),
                })),
        );
        self.notify(ReviewAction::ReviewSaved, &shot, actor).await;

        Ok(review)
    }

    /// Supervisor sign-off on a tier-approved version. Re-publishes the
    /// artifact; the active pointer is untouched.
    pub async fn master_approve(
        &self,
        actor: &ActorContext,
        version_id: EntityId,
    ) -> ReviewResult<VoteOutcome> {
        roles::ensure_supervisor(actor)?;

        let version = self.versions.version(version_id).await?;
        let review = self.reviews.review_for_version(version_id).await?;
        if !version.is_active || !review::eligible_for_supervisor(&review.votes()) {
            return Err(CoreError::Validation(
                "Version is not tier-approved for supervisor sign-off".to_string(),
            )
            .into());
        }

        let review = self.reviews.record_master_vote(review.id, true).await?;
        let shot = self.shots.shot(version.shot_id).await?;
        let sync_status = self.publish_artifact(&version, &shot).await;

        tracing::info!(
            version_id = %version_id,
            shot_id = %shot.id,
            "Supervisor approved version",
        );

        self.bus.publish(
            DomainEvent::new("review.master_approved")
                .for_shot(shot.id)
                .by(actor.user_id)
                .with_payload(serde_json::json!({ "version_id": version_id })),
        );

        Ok(VoteOutcome {
            review,
            activated: false,
            sync: sync_status,
        })
    }

    /// Supervisor rejection. The comment is mandatory and validated
    /// before any state changes; the assigned artist is always
    /// notified, even when they are the actor. The active pointer is
    /// untouched.
    pub async fn master_reject(
        &self,
        actor: &ActorContext,
        version_id: EntityId,
        comment: &str,
        attachment_url: Option<&str>,
    ) -> ReviewResult<Review> {
        roles::ensure_supervisor(actor)?;
        review::validate_rejection_comment(comment)?;

        let version = self.versions.version(version_id).await?;
        let review = self.reviews.review_for_version(version_id).await?;
        let review = self.reviews.record_master_vote(review.id, false).await?;
        let shot = self.shots.shot(version.shot_id).await?;

        tracing::info!(
            version_id = %version_id,
            shot_id = %shot.id,
            "Supervisor rejected version",
        );

        self.bus.publish(
            DomainEvent::new("review.master_rejected")
                .for_shot(shot.id)
                .by(actor.user_id)
                .with_payload(serde_json::json!({
                    "version_id": version_id,
                    "comment": comment,
                    "attachment_url": attachment_url,
                })),
        );
        self.notify(
            ReviewAction::MasterRejected {
                comment: comment.to_string(),
            },
            &shot,
            actor,
        )
        .await;

        Ok(review)
    }

    /// Scene completion percentage as seen by the given role.
    ///
    /// Producers track tier-2 approvals over live shots; artists track
    /// both tiers combined (clamped at 100).
    pub async fn scene_progress(
        &self,
        scene_id: EntityId,
        viewer_role: Role,
    ) -> ReviewResult<u8> {
        let (tier1, tier2, total) = self.count_scene_approvals(scene_id).await?;
        Ok(match viewer_role {
            Role::Artist => progress::combined_tier_progress(tier1, tier2, total),
            _ => progress::single_tier_progress(tier2, total),
        })
    }

    /// Status rollup for every live shot of a scene.
    pub async fn shot_statuses(
        &self,
        scene_id: EntityId,
    ) -> ReviewResult<Vec<(Shot, ShotStatus)>> {
        let shots = self.shots.shots_in_scene(scene_id).await?;
        let mut statuses = Vec::new();
        for shot in shots.into_iter().filter(|s| !s.is_deleted) {
            let votes = match self.versions.active_version(shot.id).await? {
                Some(active) => self.votes_for_version(active.id).await?,
                None => None,
            };
            let status = review::shot_status(votes.as_ref());
            statuses.push((shot, status));
        }
        Ok(statuses)
    }

    // ---- private helpers ----

    async fn count_scene_approvals(
        &self,
        scene_id: EntityId,
    ) -> ReviewResult<(usize, usize, usize)> {
        let shots = self.shots.shots_in_scene(scene_id).await?;
        let live: Vec<_> = shots.into_iter().filter(|s| !s.is_deleted).collect();

        let mut tier1 = 0;
        let mut tier2 = 0;
        for shot in &live {
            let Some(active) = self.versions.active_version(shot.id).await? else {
                continue;
            };
            let Some(votes) = self.votes_for_version(active.id).await? else {
                continue;
            };
            if votes.tier1 == Some(true) {
                tier1 += 1;
            }
            if votes.tier2 == Some(true) {
                tier2 += 1;
            }
        }
        Ok((tier1, tier2, live.len()))
    }

    /// The vote state of a version's review; a missing review reads as
    /// unvoted.
    async fn votes_for_version(
        &self,
        version_id: EntityId,
    ) -> ReviewResult<Option<shotflow_core::review::VoteState>> {
        match self.reviews.review_for_version(version_id).await {
            Ok(review) => Ok(Some(review.votes())),
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Dispatch the external publish; failure becomes a warning on the
    /// outcome, the recorded vote stands.
    async fn publish_artifact(&self, version: &Version, shot: &Shot) -> SyncStatus {
        match self.sync.publish_active(version, shot).await {
            Ok(()) => SyncStatus::Synced,
            Err(e) => {
                tracing::warn!(
                    version_id = %version.id,
                    shot_id = %shot.id,
                    error = %e,
                    "Vote recorded but external sync failed",
                );
                SyncStatus::Failed(e.to_string())
            }
        }
    }

    /// Derive and deliver notifications for a transition. Best-effort:
    /// a routing failure is logged, never propagated.
    async fn notify(&self, action: ReviewAction, shot: &Shot, actor: &ActorContext) {
        match self.routing_context(shot, actor).await {
            Ok(ctx) => self.notifier.deliver(route(&action, &ctx)).await,
            Err(e) => {
                tracing::warn!(
                    shot_id = %shot.id,
                    error = %e,
                    "Skipping notifications, routing context unavailable",
                );
            }
        }
    }

    async fn routing_context(
        &self,
        shot: &Shot,
        actor: &ActorContext,
    ) -> ReviewResult<RoutingContext> {
        let scene = self.catalog.scene(shot.scene_id).await?;
        let project = self.catalog.project(scene.project_id).await?;
        let actor_profile = self.catalog.user(actor.user_id).await?;
        let directors = self.catalog.users_with_role(Role::Director).await?;

        Ok(RoutingContext {
            actor_id: actor.user_id,
            actor_email: actor_profile.email,
            project_name: project.name,
            scene_name: scene.name,
            shot_id: shot.id,
            shot_name: shot.name.clone(),
            assigned_artist_id: shot.assigned_artist_id,
            producer_id: project.assigned_producer_id,
            director_ids: directors.into_iter().map(|d| d.id).collect(),
        })
    }
}
