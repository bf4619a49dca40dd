//! In-app notifications.

use serde::{Deserialize, Serialize};
use shotflow_core::types::{EntityId, Timestamp};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: EntityId,
    pub user_id: EntityId,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// Creation payload for a notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: EntityId,
    pub message: String,
    pub link: Option<String>,
}
