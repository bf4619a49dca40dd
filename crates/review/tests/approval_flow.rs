//! End-to-end approval flow over the in-memory store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use async_trait::async_trait;

use shotflow_core::review::ReviewTier;
use shotflow_core::roles::{ActorContext, Role};
use shotflow_core::types::EntityId;
use shotflow_events::{EventBus, Notifier};
use shotflow_review::{ArtifactSync, ReviewError, ReviewService, SyncError, SyncStatus};
use shotflow_store::models::{NewShot, Shot, UserProfile, Version};
use shotflow_store::traits::{NotificationStore, ReviewStore, ShotStore, VersionStore};
use shotflow_store::MemoryStore;

/// Records every publish call; optionally fails them all.
#[derive(Default)]
struct RecordingSync {
    published: Mutex<Vec<EntityId>>,
    fail: AtomicBool,
}

#[async_trait]
impl ArtifactSync for RecordingSync {
    async fn publish_active(&self, version: &Version, _shot: &Shot) -> Result<(), SyncError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SyncError::Failed("drive unreachable".into()));
        }
        self.published.lock().unwrap().push(version.id);
        Ok(())
    }
}

struct Fixture {
    store: Arc<MemoryStore>,
    sync: Arc<RecordingSync>,
    service: ReviewService,
    artist: UserProfile,
    producer: UserProfile,
    director: UserProfile,
    supervisor: UserProfile,
    shot: Shot,
}

impl Fixture {
    async fn new() -> Self {
        let store = MemoryStore::new();
        let artist = store.put_user("artist@studio.test", Role::Artist).await;
        let producer = store.put_user("producer@studio.test", Role::Producer).await;
        let director = store.put_user("director@studio.test", Role::Director).await;
        let supervisor = store
            .put_user("supervisor@studio.test", Role::Supervisor)
            .await;

        let project = store.put_project("Atlas", Some(producer.id)).await;
        let scene = store.put_scene(project.id, "Scene_1").await;
        let shot = store
            .create_shot(NewShot {
                scene_id: scene.id,
                name: "Shot_1".into(),
                sequence: 0,
                assigned_artist_id: Some(artist.id),
            })
            .await
            .unwrap();

        let sync = Arc::new(RecordingSync::default());
        let service = ReviewService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            sync.clone(),
            Notifier::new(store.clone()),
            Arc::new(EventBus::default()),
        );

        Self {
            store,
            sync,
            service,
            artist,
            producer,
            director,
            supervisor,
            shot,
        }
    }

    fn actor(&self, user: &UserProfile) -> ActorContext {
        ActorContext::new(user.id, user.role)
    }

    fn publishes(&self) -> usize {
        self.sync.published.lock().unwrap().len()
    }
}

#[tokio::test]
async fn upload_then_tier_votes_then_supervisor_rejection() -> anyhow::Result<()> {
    let fx = Fixture::new().await;

    // Upload creates V1, inactive, with a blank review.
    let (v1, review) = fx
        .service
        .create_version(&fx.actor(&fx.artist), fx.shot.id, "https://assets.test/v1.png")
        .await?;
    assert_eq!(v1.version_number, 1);
    assert!(!v1.is_active);

    // The upload notifies the producer and the director, not the artist.
    assert_eq!(fx.store.for_user(fx.producer.id).await?.len(), 1);
    assert_eq!(fx.store.for_user(fx.director.id).await?.len(), 1);
    assert!(fx.store.for_user(fx.artist.id).await?.is_empty());

    // Tier 1 approves: V1 becomes active, synced once.
    let outcome = fx
        .service
        .cast_vote(&fx.actor(&fx.producer), review.id, ReviewTier::Tier1, true)
        .await?;
    assert!(outcome.activated);
    assert_eq!(outcome.sync, SyncStatus::Synced);
    assert_eq!(outcome.review.tier1_vote, Some(true));
    assert_eq!(fx.publishes(), 1);

    let active = fx.store.active_version(fx.shot.id).await?.unwrap();
    assert_eq!(active.id, v1.id);

    // Tier 2 votes no: V1 stays active, no new publish, the artist is
    // notified of the feedback.
    let outcome = fx
        .service
        .cast_vote(&fx.actor(&fx.director), review.id, ReviewTier::Tier2, false)
        .await?;
    assert!(!outcome.activated);
    assert_eq!(outcome.sync, SyncStatus::NotAttempted);
    assert_eq!(outcome.review.tier2_vote, Some(false));
    assert!(fx.store.active_version(fx.shot.id).await?.unwrap().is_active);
    assert_eq!(fx.publishes(), 1);
    assert!(!fx.store.for_user(fx.artist.id).await?.is_empty());

    // Supervisor rejects with a comment: master vote recorded, V1 still
    // active, mandatory notification filed.
    let inbox_before = fx.store.for_user(fx.artist.id).await?.len();
    let review = fx
        .service
        .master_reject(&fx.actor(&fx.supervisor), v1.id, "needs relight", None)
        .await?;
    assert_eq!(review.master_vote, Some(false));

    let active = fx.store.active_version(fx.shot.id).await?.unwrap();
    assert_eq!(active.id, v1.id);

    let inbox = fx.store.for_user(fx.artist.id).await?;
    assert_eq!(inbox.len(), inbox_before + 1);
    assert!(inbox[0].message.contains("needs relight"));
    Ok(())
}

#[tokio::test]
async fn exactly_one_version_is_active_across_approvals() {
    let fx = Fixture::new().await;
    let producer = fx.actor(&fx.producer);
    let director = fx.actor(&fx.director);

    let (v1, r1) = fx
        .service
        .create_version(&producer, fx.shot.id, "https://assets.test/v1.png")
        .await
        .unwrap();
    let (v2, r2) = fx
        .service
        .create_version(&producer, fx.shot.id, "https://assets.test/v2.png")
        .await
        .unwrap();
    assert_eq!(v2.version_number, 2);

    fx.service
        .cast_vote(&producer, r1.id, ReviewTier::Tier1, true)
        .await
        .unwrap();
    fx.service
        .cast_vote(&director, r2.id, ReviewTier::Tier2, true)
        .await
        .unwrap();

    let versions = fx.store.versions_for_shot(fx.shot.id).await.unwrap();
    let active: Vec<_> = versions.iter().filter(|v| v.is_active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, v2.id);
    assert!(versions.iter().any(|v| v.id == v1.id && !v.is_active));
}

#[tokio::test]
async fn re_approval_republishes_without_moving_the_pointer() {
    let fx = Fixture::new().await;
    let producer = fx.actor(&fx.producer);
    let director = fx.actor(&fx.director);

    let (v1, review) = fx
        .service
        .create_version(&producer, fx.shot.id, "https://assets.test/v1.png")
        .await
        .unwrap();

    let first = fx
        .service
        .cast_vote(&producer, review.id, ReviewTier::Tier1, true)
        .await
        .unwrap();
    assert!(first.activated);

    // Same tier again, then the other tier: each re-triggers the sync
    // side effect, neither moves the pointer.
    let second = fx
        .service
        .cast_vote(&producer, review.id, ReviewTier::Tier1, true)
        .await
        .unwrap();
    let third = fx
        .service
        .cast_vote(&director, review.id, ReviewTier::Tier2, true)
        .await
        .unwrap();
    assert!(!second.activated);
    assert!(!third.activated);
    assert_eq!(fx.publishes(), 3);

    let active = fx.store.active_version(fx.shot.id).await.unwrap().unwrap();
    assert_eq!(active.id, v1.id);
}

#[tokio::test]
async fn sync_failure_warns_but_keeps_the_vote() {
    let fx = Fixture::new().await;
    let producer = fx.actor(&fx.producer);

    let (_, review) = fx
        .service
        .create_version(&producer, fx.shot.id, "https://assets.test/v1.png")
        .await
        .unwrap();

    fx.sync.fail.store(true, Ordering::SeqCst);
    let outcome = fx
        .service
        .cast_vote(&producer, review.id, ReviewTier::Tier1, true)
        .await
        .unwrap();

    assert!(outcome.activated);
    assert_matches!(outcome.sync, SyncStatus::Failed(_));
    assert_eq!(outcome.review.tier1_vote, Some(true));
    assert!(fx.store.active_version(fx.shot.id).await.unwrap().is_some());
}

#[tokio::test]
async fn rejection_without_comment_is_refused_before_mutation() {
    let fx = Fixture::new().await;
    let producer = fx.actor(&fx.producer);

    let (v1, review) = fx
        .service
        .create_version(&producer, fx.shot.id, "https://assets.test/v1.png")
        .await
        .unwrap();
    fx.service
        .cast_vote(&producer, review.id, ReviewTier::Tier1, true)
        .await
        .unwrap();

    for comment in ["", "   "] {
        let result = fx
            .service
            .master_reject(&fx.actor(&fx.supervisor), v1.id, comment, None)
            .await;
        assert_matches!(result, Err(ReviewError::Core(_)));
    }

    let review = fx.store.review_for_version(v1.id).await.unwrap();
    assert_eq!(review.master_vote, None);
}

#[tokio::test]
async fn supervisor_approval_requires_tier_approval() {
    let fx = Fixture::new().await;
    let supervisor = fx.actor(&fx.supervisor);

    let (v1, review) = fx
        .service
        .create_version(&fx.actor(&fx.producer), fx.shot.id, "https://assets.test/v1.png")
        .await
        .unwrap();

    // Unreviewed version: not eligible.
    assert_matches!(
        fx.service.master_approve(&supervisor, v1.id).await,
        Err(ReviewError::Core(_))
    );

    fx.service
        .cast_vote(&fx.actor(&fx.producer), review.id, ReviewTier::Tier1, true)
        .await
        .unwrap();

    let outcome = fx.service.master_approve(&supervisor, v1.id).await.unwrap();
    assert_eq!(outcome.review.master_vote, Some(true));
    assert!(!outcome.activated);
    assert_eq!(outcome.sync, SyncStatus::Synced);

    // Non-supervisors are refused outright.
    assert_matches!(
        fx.service.master_approve(&fx.actor(&fx.director), v1.id).await,
        Err(ReviewError::Core(_))
    );
}

#[tokio::test]
async fn vote_permissions_follow_roles() {
    let fx = Fixture::new().await;

    let (_, review) = fx
        .service
        .create_version(&fx.actor(&fx.producer), fx.shot.id, "https://assets.test/v1.png")
        .await
        .unwrap();

    // Wrong tier for the role.
    assert_matches!(
        fx.service
            .cast_vote(&fx.actor(&fx.producer), review.id, ReviewTier::Tier2, true)
            .await,
        Err(ReviewError::Core(_))
    );
    // Artists do not vote at all.
    assert_matches!(
        fx.service
            .cast_vote(&fx.actor(&fx.artist), review.id, ReviewTier::Tier1, true)
            .await,
        Err(ReviewError::Core(_))
    );

    let review = fx.store.review_for_version(review.version_id).await.unwrap();
    assert_eq!(review.tier1_vote, None);
    assert_eq!(review.tier2_vote, None);
}

#[tokio::test]
async fn unassigned_artist_cannot_upload() {
    let fx = Fixture::new().await;
    let outsider = fx.store.put_user("other@studio.test", Role::Artist).await;

    let result = fx
        .service
        .create_version(&fx.actor(&outsider), fx.shot.id, "https://assets.test/v1.png")
        .await;
    assert_matches!(result, Err(ReviewError::Core(_)));
    assert!(fx.store.versions_for_shot(fx.shot.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn scene_progress_per_role() {
    let fx = Fixture::new().await;
    let producer = fx.actor(&fx.producer);
    let director = fx.actor(&fx.director);

    // A second shot in the same scene.
    let shot2 = fx
        .store
        .create_shot(NewShot {
            scene_id: fx.shot.scene_id,
            name: "Shot_2".into(),
            sequence: 1,
            assigned_artist_id: Some(fx.artist.id),
        })
        .await
        .unwrap();

    let (_, r1) = fx
        .service
        .create_version(&producer, fx.shot.id, "https://assets.test/s1v1.png")
        .await
        .unwrap();
    let (_, r2) = fx
        .service
        .create_version(&producer, shot2.id, "https://assets.test/s2v1.png")
        .await
        .unwrap();

    // Shot 1 approved on both tiers, shot 2 only on tier 1.
    fx.service
        .cast_vote(&producer, r1.id, ReviewTier::Tier1, true)
        .await
        .unwrap();
    fx.service
        .cast_vote(&director, r1.id, ReviewTier::Tier2, true)
        .await
        .unwrap();
    fx.service
        .cast_vote(&producer, r2.id, ReviewTier::Tier1, true)
        .await
        .unwrap();

    // Producer view: 1 of 2 shots tier-2 approved.
    assert_eq!(
        fx.service
            .scene_progress(fx.shot.scene_id, Role::Producer)
            .await
            .unwrap(),
        50
    );
    // Artist view: 3 approvals over 2 shots, clamped to 100.
    assert_eq!(
        fx.service
            .scene_progress(fx.shot.scene_id, Role::Artist)
            .await
            .unwrap(),
        100
    );
}
