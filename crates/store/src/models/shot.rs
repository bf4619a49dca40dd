//! Shots and their scene-local ordering.

use serde::{Deserialize, Serialize};
use shotflow_core::types::{EntityId, Timestamp};

/// A single deliverable within a scene.
///
/// Live shots occupy a dense `sequence` range `0..N-1`; soft-deleted
/// shots keep their last value but are excluded from the sequence
/// domain until restored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shot {
    pub id: EntityId,
    pub scene_id: EntityId,
    /// Derived display name (`Shot_{sequence+1}`), regenerated on every
    /// structural change.
    pub name: String,
    pub sequence: u32,
    pub assigned_artist_id: Option<EntityId>,
    pub storyboard_url: Option<String>,
    pub is_deleted: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Creation payload for a shot.
#[derive(Debug, Clone)]
pub struct NewShot {
    pub scene_id: EntityId,
    pub name: String,
    pub sequence: u32,
    pub assigned_artist_id: Option<EntityId>,
}
