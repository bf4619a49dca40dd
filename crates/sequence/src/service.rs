//! Scene restructuring operations.

use std::sync::Arc;

use chrono::Utc;

use shotflow_core::naming::shot_display_name;
use shotflow_core::roles::{self, ActorContext};
use shotflow_core::sequence::{
    append_position, insert_shift_plan, renumber_plan, reorder_plan, validate_insert_position,
    validate_reorder,
};
use shotflow_core::types::EntityId;
use shotflow_events::{DomainEvent, EventBus};
use shotflow_store::models::{NewShot, Shot};
use shotflow_store::traits::ShotStore;

use crate::error::SequenceResult;

/// Maintains each scene's dense shot ordering and derived names.
///
/// Concurrent restructuring from two sessions is not conflict-resolved:
/// the later batch overwrites (last write wins).
pub struct SequenceService {
    shots: Arc<dyn ShotStore>,
    bus: Arc<EventBus>,
}

impl SequenceService {
    pub fn new(shots: Arc<dyn ShotStore>, bus: Arc<EventBus>) -> Self {
        Self { shots, bus }
    }

    /// Create a shot at the end of the scene.
    pub async fn append(&self, actor: &ActorContext, scene_id: EntityId) -> SequenceResult<Shot> {
        roles::ensure_can_manage_shots(actor)?;

        let live = self.live_shots(scene_id).await?;
        let position = append_position(live.len());
        let shot = self
            .shots
            .create_shot(NewShot {
                scene_id,
                name: shot_display_name(position),
                sequence: position,
                assigned_artist_id: None,
            })
            .await?;

        tracing::info!(scene_id = %scene_id, shot_id = %shot.id, position, "Shot appended");
        self.publish_change("shot.created", scene_id, Some(shot.id), actor);
        Ok(shot)
    }

    /// Create a shot at `position`, shifting every live shot at or
    /// after it up by one as a single batch, then renumbering names.
    pub async fn insert_before(
        &self,
        actor: &ActorContext,
        scene_id: EntityId,
        position: u32,
    ) -> SequenceResult<Shot> {
        roles::ensure_can_manage_shots(actor)?;

        let live = self.live_shots(scene_id).await?;
        validate_insert_position(live.len(), position)?;

        let current: Vec<(EntityId, u32)> = live.iter().map(|s| (s.id, s.sequence)).collect();
        let shift = insert_shift_plan(&current, position);
        self.shots.apply_sequence_updates(scene_id, &shift).await?;

        let shot = self
            .shots
            .create_shot(NewShot {
                scene_id,
                name: shot_display_name(position),
                sequence: position,
                assigned_artist_id: None,
            })
            .await?;

        // Names settle only after the sequences do.
        self.renumber_names(scene_id).await?;

        tracing::info!(scene_id = %scene_id, shot_id = %shot.id, position, "Shot inserted");
        self.publish_change("shot.created", scene_id, Some(shot.id), actor);
        Ok(self.shots.shot(shot.id).await?)
    }

    /// Apply a full reordering of the scene's live shots.
    ///
    /// `ordered_ids` must be a permutation of the live shots; the batch
    /// applies atomically, so a failure leaves the authoritative order
    /// unchanged for the caller to re-fetch.
    pub async fn reorder(
        &self,
        actor: &ActorContext,
        scene_id: EntityId,
        ordered_ids: &[EntityId],
    ) -> SequenceResult<()> {
        roles::ensure_can_manage_shots(actor)?;

        let live = self.live_shots(scene_id).await?;
        let current: Vec<EntityId> = live.iter().map(|s| s.id).collect();
        validate_reorder(&current, ordered_ids)?;

        let plan = reorder_plan(ordered_ids);
        self.shots.apply_sequence_updates(scene_id, &plan).await?;
        self.renumber_names(scene_id).await?;

        tracing::info!(scene_id = %scene_id, shots = ordered_ids.len(), "Scene reordered");
        self.publish_change("shot.sequence_changed", scene_id, None, actor);
        Ok(())
    }

    /// Move a shot to the trash. Survivors are compacted back onto
    /// `0..N-1` and renamed.
    pub async fn soft_delete(
        &self,
        actor: &ActorContext,
        shot_id: EntityId,
    ) -> SequenceResult<Shot> {
        roles::ensure_can_manage_shots(actor)?;

        let shot = self
            .shots
            .set_deleted(shot_id, true, Some(Utc::now()))
            .await?;
        self.renumber_names(shot.scene_id).await?;

        tracing::info!(scene_id = %shot.scene_id, shot_id = %shot_id, "Shot soft-deleted");
        self.publish_change("shot.deleted", shot.scene_id, Some(shot_id), actor);
        Ok(shot)
    }

    /// Bring a shot back from the trash. The shot re-enters the
    /// sequence at the end, not its old slot.
    pub async fn restore(&self, actor: &ActorContext, shot_id: EntityId) -> SequenceResult<Shot> {
        roles::ensure_can_manage_shots(actor)?;

        let shot = self.shots.set_deleted(shot_id, false, None).await?;

        let live = self.live_shots(shot.scene_id).await?;
        let mut ordered: Vec<EntityId> = live
            .iter()
            .map(|s| s.id)
            .filter(|id| *id != shot_id)
            .collect();
        ordered.push(shot_id);
        let plan = renumber_plan(&ordered);
        self.shots
            .apply_sequence_updates(shot.scene_id, &plan)
            .await?;

        tracing::info!(scene_id = %shot.scene_id, shot_id = %shot_id, "Shot restored");
        self.publish_change("shot.restored", shot.scene_id, Some(shot_id), actor);
        Ok(self.shots.shot(shot_id).await?)
    }

    /// Regenerate every live shot's sequence and display name from its
    /// current order. Bulk and order-dependent: runs only after
    /// sequence values are final.
    pub async fn renumber_names(&self, scene_id: EntityId) -> SequenceResult<()> {
        let live = self.live_shots(scene_id).await?;
        let ordered: Vec<EntityId> = live.iter().map(|s| s.id).collect();
        let plan = renumber_plan(&ordered);
        self.shots.apply_sequence_updates(scene_id, &plan).await?;
        Ok(())
    }

    /// The scene's live shots in sequence order.
    pub async fn live_shots(&self, scene_id: EntityId) -> SequenceResult<Vec<Shot>> {
        let shots = self.shots.shots_in_scene(scene_id).await?;
        Ok(shots.into_iter().filter(|s| !s.is_deleted).collect())
    }

    fn publish_change(
        &self,
        event_type: &str,
        scene_id: EntityId,
        shot_id: Option<EntityId>,
        actor: &ActorContext,
    ) {
        let mut event = DomainEvent::new(event_type)
            .by(actor.user_id)
            .with_payload(serde_json::json!({ "scene_id": scene_id }));
        if let Some(shot_id) = shot_id {
            event = event.for_shot(shot_id);
        }
        self.bus.publish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotflow_core::roles::Role;
    use shotflow_store::MemoryStore;

    fn director() -> ActorContext {
        ActorContext::new(uuid::Uuid::new_v4(), Role::Director)
    }

    async fn scene_fixture() -> (Arc<MemoryStore>, SequenceService, EntityId) {
        let store = MemoryStore::new();
        let project = store.put_project("Atlas", None).await;
        let scene = store.put_scene(project.id, "Scene_1").await;
        let service = SequenceService::new(store.clone(), Arc::new(EventBus::default()));
        (store, service, scene.id)
    }

    #[tokio::test]
    async fn artist_cannot_restructure() {
        let (_, service, scene_id) = scene_fixture().await;
        let artist = ActorContext::new(uuid::Uuid::new_v4(), Role::Artist);
        assert!(service.append(&artist, scene_id).await.is_err());
    }

    #[tokio::test]
    async fn append_names_follow_count() {
        let (_, service, scene_id) = scene_fixture().await;
        let actor = director();

        let first = service.append(&actor, scene_id).await.unwrap();
        let second = service.append(&actor, scene_id).await.unwrap();

        assert_eq!((first.sequence, first.name.as_str()), (0, "Shot_1"));
        assert_eq!((second.sequence, second.name.as_str()), (1, "Shot_2"));
    }

    #[tokio::test]
    async fn insert_position_is_validated() {
        let (_, service, scene_id) = scene_fixture().await;
        let actor = director();
        service.append(&actor, scene_id).await.unwrap();

        assert!(service.insert_before(&actor, scene_id, 5).await.is_err());
    }
}
