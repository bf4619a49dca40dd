//! Review records, one per version.

use serde::{Deserialize, Serialize};
use shotflow_core::review::VoteState;
use shotflow_core::types::{EntityId, Timestamp};

/// The review attached to a version at creation time.
///
/// Tier fields are independent: each reviewer's vote and feedback are
/// visible the moment they are recorded, regardless of the other tier.
/// `None` means no vote cast; a cast vote may be overwritten by the
/// same tier only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: EntityId,
    pub version_id: EntityId,

    pub tier1_vote: Option<bool>,
    pub tier1_comment: Option<String>,
    pub tier1_image_url: Option<String>,
    pub tier1_voted_at: Option<Timestamp>,

    pub tier2_vote: Option<bool>,
    pub tier2_comment: Option<String>,
    pub tier2_image_url: Option<String>,
    pub tier2_voted_at: Option<Timestamp>,

    /// Supervisor decision; set only after a tier-level approval.
    pub master_vote: Option<bool>,
}

impl Review {
    /// A fresh review with no votes cast.
    pub fn new(id: EntityId, version_id: EntityId) -> Self {
        Self {
            id,
            version_id,
            tier1_vote: None,
            tier1_comment: None,
            tier1_image_url: None,
            tier1_voted_at: None,
            tier2_vote: None,
            tier2_comment: None,
            tier2_image_url: None,
            tier2_voted_at: None,
            master_vote: None,
        }
    }

    /// Detach the vote fields for the pure decision functions.
    pub fn votes(&self) -> VoteState {
        VoteState {
            tier1: self.tier1_vote,
            tier2: self.tier2_vote,
            master: self.master_vote,
        }
    }
}
