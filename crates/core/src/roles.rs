//! Role definitions and permission checks.
//!
//! Every service operation receives an explicit [`ActorContext`] instead
//! of reading ambient session state, so all permission checks here are
//! pure functions of `(actor, action)`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::review::ReviewTier;
use crate::types::EntityId;

/// Project roles.
///
/// An artist delivers shot versions; the producer and director review
/// them independently; the supervisor signs off project-wide before
/// external publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Artist,
    Producer,
    Director,
    Supervisor,
}

impl Role {
    /// Stable string form used in logs and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Artist => "artist",
            Role::Producer => "producer",
            Role::Director => "director",
            Role::Supervisor => "supervisor",
        }
    }

    /// The review tier this role votes on, if any.
    pub fn review_tier(&self) -> Option<ReviewTier> {
        match self {
            Role::Producer => Some(ReviewTier::Tier1),
            Role::Director => Some(ReviewTier::Tier2),
            Role::Artist | Role::Supervisor => None,
        }
    }
}

/// The acting user, passed explicitly into every service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorContext {
    pub user_id: EntityId,
    pub role: Role,
}

impl ActorContext {
    pub fn new(user_id: EntityId, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// Whether the actor may upload or promote a version on a shot.
///
/// Producers and directors may always; an artist only on shots assigned
/// to them.
pub fn can_upload_version(actor: &ActorContext, assigned_artist_id: Option<EntityId>) -> bool {
    match actor.role {
        Role::Producer | Role::Director => true,
        Role::Artist => assigned_artist_id == Some(actor.user_id),
        Role::Supervisor => false,
    }
}

/// Whether the actor may restructure a scene (add, insert, reorder,
/// delete, restore shots).
pub fn can_manage_shots(actor: &ActorContext) -> bool {
    matches!(actor.role, Role::Producer | Role::Director)
}

/// Check that the actor's role votes on the given tier.
pub fn ensure_can_vote(actor: &ActorContext, tier: ReviewTier) -> Result<(), CoreError> {
    match actor.role.review_tier() {
        Some(t) if t == tier => Ok(()),
        _ => Err(CoreError::Forbidden(format!(
            "Role '{}' cannot vote on {}",
            actor.role.as_str(),
            tier.as_str()
        ))),
    }
}

/// Check that the actor holds the supervisor role.
pub fn ensure_supervisor(actor: &ActorContext) -> Result<(), CoreError> {
    if actor.role == Role::Supervisor {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Role '{}' cannot act on the supervisor tier",
            actor.role.as_str()
        )))
    }
}

/// Check that the actor may restructure a scene.
pub fn ensure_can_manage_shots(actor: &ActorContext) -> Result<(), CoreError> {
    if can_manage_shots(actor) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Role '{}' cannot restructure scenes",
            actor.role.as_str()
        )))
    }
}
