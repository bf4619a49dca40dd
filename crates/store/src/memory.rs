//! In-memory store implementation.
//!
//! Backs every collaborator trait with `tokio::sync::RwLock`-guarded
//! maps. Used by the test suites and by single-process embedders that
//! do not need durable storage. Shared via `Arc<MemoryStore>`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use shotflow_core::review::ReviewTier;
use shotflow_core::roles::Role;
use shotflow_core::sequence::SequenceAssignment;
use shotflow_core::types::{EntityId, Timestamp};

use crate::error::{StoreError, StoreResult};
use crate::models::{
    NewNotification, NewShot, NewVersion, Notification, Project, Review, Scene, Shot, UserProfile,
    Version,
};
use crate::traits::{CatalogStore, NotificationStore, ReviewStore, ShotStore, VersionStore};

#[derive(Default)]
struct State {
    users: HashMap<EntityId, UserProfile>,
    projects: HashMap<EntityId, Project>,
    scenes: HashMap<EntityId, Scene>,
    shots: HashMap<EntityId, Shot>,
    versions: HashMap<EntityId, Version>,
    reviews: HashMap<EntityId, Review>,
    notifications: HashMap<EntityId, Notification>,
}

/// In-memory implementation of every store trait.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // ---- seeding helpers ----

    /// Insert a user and return it.
    pub async fn put_user(&self, email: &str, role: Role) -> UserProfile {
        let user = UserProfile {
            id: uuid::Uuid::new_v4(),
            email: email.to_string(),
            role,
        };
        self.state.write().await.users.insert(user.id, user.clone());
        user
    }

    /// Insert a project and return it.
    pub async fn put_project(
        &self,
        name: &str,
        assigned_producer_id: Option<EntityId>,
    ) -> Project {
        let project = Project {
            id: uuid::Uuid::new_v4(),
            name: name.to_string(),
            assigned_producer_id,
            created_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .projects
            .insert(project.id, project.clone());
        project
    }

    /// Insert a scene and return it.
    pub async fn put_scene(&self, project_id: EntityId, name: &str) -> Scene {
        let scene = Scene {
            id: uuid::Uuid::new_v4(),
            project_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .scenes
            .insert(scene.id, scene.clone());
        scene
    }

    /// Assign an artist to a shot.
    pub async fn assign_artist(&self, shot_id: EntityId, artist_id: EntityId) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let shot = state.shots.get_mut(&shot_id).ok_or(StoreError::NotFound {
            entity: "Shot",
            id: shot_id,
        })?;
        shot.assigned_artist_id = Some(artist_id);
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn user(&self, id: EntityId) -> StoreResult<UserProfile> {
        self.state
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "User", id })
    }

    async fn users_with_role(&self, role: Role) -> StoreResult<Vec<UserProfile>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }

    async fn project(&self, id: EntityId) -> StoreResult<Project> {
        self.state
            .read()
            .await
            .projects
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "Project",
                id,
            })
    }

    async fn scene(&self, id: EntityId) -> StoreResult<Scene> {
        self.state
            .read()
            .await
            .scenes
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "Scene", id })
    }
}

#[async_trait]
impl ShotStore for MemoryStore {
    async fn shot(&self, id: EntityId) -> StoreResult<Shot> {
        self.state
            .read()
            .await
            .shots
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "Shot", id })
    }

    async fn shots_in_scene(&self, scene_id: EntityId) -> StoreResult<Vec<Shot>> {
        let mut shots: Vec<_> = self
            .state
            .read()
            .await
            .shots
            .values()
            .filter(|s| s.scene_id == scene_id)
            .cloned()
            .collect();
        shots.sort_by_key(|s| s.sequence);
        Ok(shots)
    }

    async fn create_shot(&self, new: NewShot) -> StoreResult<Shot> {
        let shot = Shot {
            id: uuid::Uuid::new_v4(),
            scene_id: new.scene_id,
            name: new.name,
            sequence: new.sequence,
            assigned_artist_id: new.assigned_artist_id,
            storyboard_url: None,
            is_deleted: false,
            deleted_at: None,
            created_at: Utc::now(),
        };
        self.state.write().await.shots.insert(shot.id, shot.clone());
        Ok(shot)
    }

    async fn apply_sequence_updates(
        &self,
        scene_id: EntityId,
        assignments: &[SequenceAssignment],
    ) -> StoreResult<()> {
        let mut state = self.state.write().await;

        // Validate the whole batch before touching anything.
        for assignment in assignments {
            match state.shots.get(&assignment.shot_id) {
                Some(shot) if shot.scene_id == scene_id => {}
                Some(_) => {
                    return Err(StoreError::Conflict(format!(
                        "Shot {} does not belong to scene {scene_id}",
                        assignment.shot_id
                    )))
                }
                None => {
                    return Err(StoreError::NotFound {
                        entity: "Shot",
                        id: assignment.shot_id,
                    })
                }
            }
        }

        for assignment in assignments {
            let shot = state
                .shots
                .get_mut(&assignment.shot_id)
                .expect("validated above");
            shot.sequence = assignment.sequence;
            if let Some(name) = &assignment.name {
                shot.name = name.clone();
            }
        }
        Ok(())
    }

    async fn set_deleted(
        &self,
        shot_id: EntityId,
        deleted: bool,
        deleted_at: Option<Timestamp>,
    ) -> StoreResult<Shot> {
        let mut state = self.state.write().await;
        let shot = state.shots.get_mut(&shot_id).ok_or(StoreError::NotFound {
            entity: "Shot",
            id: shot_id,
        })?;
        shot.is_deleted = deleted;
        shot.deleted_at = deleted_at;
        Ok(shot.clone())
    }
}

#[async_trait]
impl VersionStore for MemoryStore {
    async fn version(&self, id: EntityId) -> StoreResult<Version> {
        self.state
            .read()
            .await
            .versions
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "Version",
                id,
            })
    }

    async fn versions_for_shot(&self, shot_id: EntityId) -> StoreResult<Vec<Version>> {
        let mut versions: Vec<_> = self
            .state
            .read()
            .await
            .versions
            .values()
            .filter(|v| v.shot_id == shot_id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        Ok(versions)
    }

    async fn active_version(&self, shot_id: EntityId) -> StoreResult<Option<Version>> {
        Ok(self
            .state
            .read()
            .await
            .versions
            .values()
            .find(|v| v.shot_id == shot_id && v.is_active)
            .cloned())
    }

    async fn create_version(&self, new: NewVersion) -> StoreResult<Version> {
        let mut state = self.state.write().await;
        let next_number = state
            .versions
            .values()
            .filter(|v| v.shot_id == new.shot_id)
            .map(|v| v.version_number)
            .max()
            .unwrap_or(0)
            + 1;
        let version = Version {
            id: uuid::Uuid::new_v4(),
            shot_id: new.shot_id,
            version_number: next_number,
            is_active: false,
            artifact_url: new.artifact_url,
            uploader_id: new.uploader_id,
            created_at: Utc::now(),
        };
        state.versions.insert(version.id, version.clone());
        Ok(version)
    }

    async fn activate(&self, shot_id: EntityId, version_id: EntityId) -> StoreResult<Version> {
        let mut state = self.state.write().await;
        match state.versions.get(&version_id) {
            Some(v) if v.shot_id == shot_id => {}
            Some(_) => {
                return Err(StoreError::Conflict(format!(
                    "Version {version_id} does not belong to shot {shot_id}"
                )))
            }
            None => {
                return Err(StoreError::NotFound {
                    entity: "Version",
                    id: version_id,
                })
            }
        }

        for version in state.versions.values_mut() {
            if version.shot_id == shot_id {
                version.is_active = version.id == version_id;
            }
        }
        Ok(state.versions[&version_id].clone())
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn review(&self, id: EntityId) -> StoreResult<Review> {
        self.state
            .read()
            .await
            .reviews
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "Review",
                id,
            })
    }

    async fn review_for_version(&self, version_id: EntityId) -> StoreResult<Review> {
        self.state
            .read()
            .await
            .reviews
            .values()
            .find(|r| r.version_id == version_id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "Review",
                id: version_id,
            })
    }

    async fn create_review(&self, version_id: EntityId) -> StoreResult<Review> {
        let review = Review::new(uuid::Uuid::new_v4(), version_id);
        self.state
            .write()
            .await
            .reviews
            .insert(review.id, review.clone());
        Ok(review)
    }

    async fn record_vote(
        &self,
        review_id: EntityId,
        tier: ReviewTier,
        vote: bool,
        voted_at: Timestamp,
    ) -> StoreResult<Review> {
        let mut state = self.state.write().await;
        let review = state
            .reviews
            .get_mut(&review_id)
            .ok_or(StoreError::NotFound {
                entity: "Review",
                id: review_id,
            })?;
        match tier {
            ReviewTier::Tier1 => {
                review.tier1_vote = Some(vote);
                review.tier1_voted_at = Some(voted_at);
            }
            ReviewTier::Tier2 => {
                review.tier2_vote = Some(vote);
                review.tier2_voted_at = Some(voted_at);
            }
        }
        Ok(review.clone())
    }

    async fn record_comment(
        &self,
        review_id: EntityId,
        tier: ReviewTier,
        comment: &str,
        image_url: Option<&str>,
    ) -> StoreResult<Review> {
        let mut state = self.state.write().await;
        let review = state
            .reviews
            .get_mut(&review_id)
            .ok_or(StoreError::NotFound {
                entity: "Review",
                id: review_id,
            })?;
        match tier {
            ReviewTier::Tier1 => {
                review.tier1_comment = Some(comment.to_string());
                if let Some(url) = image_url {
                    review.tier1_image_url = Some(url.to_string());
                }
            }
            ReviewTier::Tier2 => {
                review.tier2_comment = Some(comment.to_string());
                if let Some(url) = image_url {
                    review.tier2_image_url = Some(url.to_string());
                }
            }
        }
        Ok(review.clone())
    }

    async fn record_master_vote(&self, review_id: EntityId, vote: bool) -> StoreResult<Review> {
        let mut state = self.state.write().await;
        let review = state
            .reviews
            .get_mut(&review_id)
            .ok_or(StoreError::NotFound {
                entity: "Review",
                id: review_id,
            })?;
        review.master_vote = Some(vote);
        Ok(review.clone())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create(&self, new: NewNotification) -> StoreResult<Notification> {
        let notification = Notification {
            id: uuid::Uuid::new_v4(),
            user_id: new.user_id,
            message: new.message,
            link: new.link,
            is_read: false,
            created_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .notifications
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn for_user(&self, user_id: EntityId) -> StoreResult<Vec<Notification>> {
        let mut list: Vec<_> = self
            .state
            .read()
            .await
            .notifications
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn mark_read(&self, ids: &[EntityId]) -> StoreResult<()> {
        let mut state = self.state.write().await;
        for id in ids {
            if let Some(notification) = state.notifications.get_mut(id) {
                notification.is_read = true;
            }
        }
        Ok(())
    }
}
