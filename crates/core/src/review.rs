//! Review tier definitions and approval decision rules.
//!
//! A version's review carries two independent reviewer votes (tier 1 and
//! tier 2) plus a project-wide supervisor vote. The decision functions
//! here are pure; the service layer owns the side effects (activation,
//! external publish, notifications).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length for reviewer feedback text.
pub const MAX_COMMENT_LENGTH: usize = 10_000;

// ---------------------------------------------------------------------------
// Tiers and vote state
// ---------------------------------------------------------------------------

/// The two independent reviewer slots on a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewTier {
    Tier1,
    Tier2,
}

impl ReviewTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewTier::Tier1 => "tier1",
            ReviewTier::Tier2 => "tier2",
        }
    }
}

/// Snapshot of the vote fields of a review, detached from storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteState {
    pub tier1: Option<bool>,
    pub tier2: Option<bool>,
    pub master: Option<bool>,
}

/// Rolled-up review outcome for display and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalOutcome {
    Approved,
    Rejected,
    InReview,
}

/// Status of a shot derived from its active version's review, driving
/// the scene overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotStatus {
    /// No version has entered review yet.
    Pending,
    /// A version is active but neither tier has decided.
    InReview,
    /// A reviewer voted the active version down.
    ChangesRequested,
    /// The tier-2 reviewer approved the active version.
    Approved,
}

// ---------------------------------------------------------------------------
// Decision rules
// ---------------------------------------------------------------------------

/// Whether casting this vote marks the version active.
///
/// Either tier's positive vote activates; negative votes never
/// deactivate.
pub fn vote_activates(vote: bool) -> bool {
    vote
}

/// Roll up the per-tier votes into a single outcome.
///
/// Tier 2 takes precedence; with no tier-2 vote the tier-1 vote decides;
/// with neither, the review is still open.
pub fn approval_outcome(votes: &VoteState) -> ApprovalOutcome {
    match (votes.tier2, votes.tier1) {
        (Some(true), _) => ApprovalOutcome::Approved,
        (Some(false), _) => ApprovalOutcome::Rejected,
        (None, Some(true)) => ApprovalOutcome::Approved,
        (None, Some(false)) => ApprovalOutcome::Rejected,
        (None, None) => ApprovalOutcome::InReview,
    }
}

/// Derive the shot status from the active version's votes, if any.
pub fn shot_status(active_votes: Option<&VoteState>) -> ShotStatus {
    let Some(votes) = active_votes else {
        return ShotStatus::Pending;
    };
    if votes.tier2 == Some(true) {
        ShotStatus::Approved
    } else if votes.tier2 == Some(false) || votes.tier1 == Some(false) {
        ShotStatus::ChangesRequested
    } else {
        ShotStatus::InReview
    }
}

/// Whether a version qualifies for the supervisor tier.
///
/// Tier 2 approval qualifies outright; a tier-1 approval qualifies only
/// while tier 2 has not voted.
pub fn eligible_for_supervisor(votes: &VoteState) -> bool {
    match votes.tier2 {
        Some(decision) => decision,
        None => votes.tier1 == Some(true),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate the mandatory comment on a supervisor rejection.
///
/// Rejections without a substantive comment are refused before any state
/// changes.
pub fn validate_rejection_comment(comment: &str) -> Result<(), CoreError> {
    if comment.trim().is_empty() {
        return Err(CoreError::Validation(
            "A rejection must include a comment".to_string(),
        ));
    }
    if comment.len() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate free-text reviewer feedback. Empty text is allowed (the
/// attachment may carry the feedback); overlong text is not.
pub fn validate_feedback_comment(comment: &str) -> Result<(), CoreError> {
    if comment.len() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}
