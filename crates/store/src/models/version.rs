//! Shot versions: the reviewable artifacts.

use serde::{Deserialize, Serialize};
use shotflow_core::types::{EntityId, Timestamp};

/// One uploaded or promoted artifact for a shot.
///
/// `version_number` is 1-based and strictly increasing per shot; the
/// store assigns it at creation. At most one version per shot is active
/// at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub id: EntityId,
    pub shot_id: EntityId,
    pub version_number: u32,
    pub is_active: bool,
    pub artifact_url: String,
    pub uploader_id: EntityId,
    pub created_at: Timestamp,
}

/// Creation payload for a version. The store assigns id, number, and
/// timestamps; new versions always start inactive.
#[derive(Debug, Clone)]
pub struct NewVersion {
    pub shot_id: EntityId,
    pub uploader_id: EntityId,
    pub artifact_url: String,
}
