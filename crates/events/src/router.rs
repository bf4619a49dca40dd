//! Pure derivation of notification recipients and messages.
//!
//! Given a review action and its routing context, [`route`] computes
//! the set of notification drafts to write. Actors are never notified
//! about their own actions, with one exception: a supervisor rejection
//! always reaches the shot's assigned artist.

use shotflow_core::types::EntityId;

/// The transitions that produce notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    /// A new version was uploaded or promoted.
    VersionAdded,
    /// A reviewer cast a vote.
    FeedbackSaved,
    /// A reviewer saved written feedback.
    ReviewSaved,
    /// The supervisor rejected the shot's approved version.
    MasterRejected { comment: String },
}

/// Everything the router needs to address and phrase a notification.
#[derive(Debug, Clone)]
pub struct RoutingContext {
    pub actor_id: EntityId,
    pub actor_email: String,
    pub project_name: String,
    pub scene_name: String,
    pub shot_id: EntityId,
    pub shot_name: String,
    /// The shot's reviewer-of-record.
    pub assigned_artist_id: Option<EntityId>,
    /// The project's tier-1 reviewer.
    pub producer_id: Option<EntityId>,
    /// All tier-2 reviewers.
    pub director_ids: Vec<EntityId>,
}

impl RoutingContext {
    fn path(&self) -> String {
        format!("{}/{}/{}", self.project_name, self.scene_name, self.shot_name)
    }

    fn shot_link(&self) -> String {
        format!("/shot/{}", self.shot_id)
    }
}

/// A notification ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub user_id: EntityId,
    pub message: String,
    pub link: Option<String>,
}

/// Compute the notification drafts for an action.
pub fn route(action: &ReviewAction, ctx: &RoutingContext) -> Vec<NotificationDraft> {
    let mut drafts = Vec::new();

    match action {
        ReviewAction::VersionAdded => {
            let message = format!(
                "{} has added a version on {}",
                ctx.actor_email,
                ctx.path()
            );
            if let Some(producer_id) = ctx.producer_id {
                if producer_id != ctx.actor_id {
                    drafts.push(NotificationDraft {
                        user_id: producer_id,
                        message: message.clone(),
                        link: Some(ctx.shot_link()),
                    });
                }
            }
            for director_id in &ctx.director_ids {
                if *director_id != ctx.actor_id {
                    drafts.push(NotificationDraft {
                        user_id: *director_id,
                        message: message.clone(),
                        link: Some(ctx.shot_link()),
                    });
                }
            }
        }

        ReviewAction::FeedbackSaved | ReviewAction::ReviewSaved => {
            let label = match action {
                ReviewAction::FeedbackSaved => "feedback",
                _ => "review",
            };
            if let Some(artist_id) = ctx.assigned_artist_id {
                if artist_id != ctx.actor_id {
                    drafts.push(NotificationDraft {
                        user_id: artist_id,
                        message: format!(
                            "{} has added a {label} on your {}",
                            ctx.actor_email,
                            ctx.path()
                        ),
                        link: Some(ctx.shot_link()),
                    });
                }
            }
        }

        ReviewAction::MasterRejected { comment } => {
            // Mandatory: the artist hears about a supervisor rejection
            // even when they caused it themselves.
            if let Some(artist_id) = ctx.assigned_artist_id {
                drafts.push(NotificationDraft {
                    user_id: artist_id,
                    message: format!(
                        "{} has rejected {}: {comment}",
                        ctx.actor_email,
                        ctx.path()
                    ),
                    link: Some(ctx.shot_link()),
                });
            }
        }
    }

    drafts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RoutingContext {
        RoutingContext {
            actor_id: uuid::Uuid::new_v4(),
            actor_email: "director@studio.test".into(),
            project_name: "Atlas".into(),
            scene_name: "Scene_2".into(),
            shot_id: uuid::Uuid::new_v4(),
            shot_name: "Shot_3".into(),
            assigned_artist_id: Some(uuid::Uuid::new_v4()),
            producer_id: Some(uuid::Uuid::new_v4()),
            director_ids: vec![uuid::Uuid::new_v4(), uuid::Uuid::new_v4()],
        }
    }

    #[test]
    fn version_added_reaches_producer_and_directors() {
        let ctx = ctx();
        let drafts = route(&ReviewAction::VersionAdded, &ctx);

        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[0].user_id, ctx.producer_id.unwrap());
        assert!(drafts[0]
            .message
            .contains("has added a version on Atlas/Scene_2/Shot_3"));
        assert_eq!(
            drafts[0].link.as_deref(),
            Some(format!("/shot/{}", ctx.shot_id).as_str())
        );
    }

    #[test]
    fn version_added_excludes_acting_reviewer() {
        let mut ctx = ctx();
        ctx.actor_id = ctx.producer_id.unwrap();
        let drafts = route(&ReviewAction::VersionAdded, &ctx);
        assert!(drafts.iter().all(|d| d.user_id != ctx.actor_id));
        assert_eq!(drafts.len(), 2);

        let mut ctx = self::ctx();
        ctx.actor_id = ctx.director_ids[0];
        let drafts = route(&ReviewAction::VersionAdded, &ctx);
        assert_eq!(drafts.len(), 2);
    }

    #[test]
    fn feedback_reaches_assigned_artist() {
        let ctx = ctx();
        let drafts = route(&ReviewAction::FeedbackSaved, &ctx);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].user_id, ctx.assigned_artist_id.unwrap());
        assert!(drafts[0].message.contains("has added a feedback on your"));
    }

    #[test]
    fn review_saved_uses_review_label() {
        let ctx = ctx();
        let drafts = route(&ReviewAction::ReviewSaved, &ctx);
        assert!(drafts[0].message.contains("has added a review on your"));
    }

    #[test]
    fn feedback_skips_self_and_unassigned() {
        let mut ctx = ctx();
        ctx.actor_id = ctx.assigned_artist_id.unwrap();
        assert!(route(&ReviewAction::FeedbackSaved, &ctx).is_empty());

        let mut ctx = self::ctx();
        ctx.assigned_artist_id = None;
        assert!(route(&ReviewAction::FeedbackSaved, &ctx).is_empty());
    }

    #[test]
    fn master_rejection_always_reaches_artist() {
        let mut ctx = ctx();
        ctx.actor_id = ctx.assigned_artist_id.unwrap();
        let drafts = route(
            &ReviewAction::MasterRejected {
                comment: "needs relight".into(),
            },
            &ctx,
        );
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].user_id, ctx.assigned_artist_id.unwrap());
        assert!(drafts[0].message.contains("needs relight"));
    }
}
