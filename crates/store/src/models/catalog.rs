//! Users, projects, and scenes.
//!
//! These entities are owned by the external data service; the
//! coordination layer only reads them for routing and permission
//! decisions.

use serde::{Deserialize, Serialize};
use shotflow_core::roles::Role;
use shotflow_core::types::{EntityId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: EntityId,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    /// The tier-1 reviewer assigned to this project, if any.
    pub assigned_producer_id: Option<EntityId>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub id: EntityId,
    pub project_id: EntityId,
    pub name: String,
    pub created_at: Timestamp,
}
