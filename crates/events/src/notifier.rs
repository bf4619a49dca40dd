//! Fire-and-forget notification delivery.
//!
//! [`Notifier`] writes router drafts to the notification store. Writes
//! are best-effort: a failed write is logged and never propagated, so a
//! notification outage cannot fail the review action that produced it.

use std::sync::Arc;

use shotflow_store::models::NewNotification;
use shotflow_store::traits::NotificationStore;

use crate::router::NotificationDraft;

/// Fans notification drafts out to the store.
#[derive(Clone)]
pub struct Notifier {
    store: Arc<dyn NotificationStore>,
}

impl Notifier {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Write every draft, concurrently, logging failures.
    pub async fn deliver(&self, drafts: Vec<NotificationDraft>) {
        let writes = drafts.into_iter().map(|draft| {
            let store = Arc::clone(&self.store);
            async move {
                let user_id = draft.user_id;
                let result = store
                    .create(NewNotification {
                        user_id: draft.user_id,
                        message: draft.message,
                        link: draft.link,
                    })
                    .await;
                if let Err(e) = result {
                    tracing::warn!(
                        user_id = %user_id,
                        error = %e,
                        "Failed to write notification"
                    );
                }
            }
        });
        futures::future::join_all(writes).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotflow_store::MemoryStore;

    #[tokio::test]
    async fn delivers_every_draft() {
        let store = MemoryStore::new();
        let notifier = Notifier::new(store.clone());
        let user_a = uuid::Uuid::new_v4();
        let user_b = uuid::Uuid::new_v4();

        notifier
            .deliver(vec![
                NotificationDraft {
                    user_id: user_a,
                    message: "first".into(),
                    link: None,
                },
                NotificationDraft {
                    user_id: user_b,
                    message: "second".into(),
                    link: Some("/shot/abc".into()),
                },
            ])
            .await;

        assert_eq!(store.for_user(user_a).await.unwrap().len(), 1);
        let inbox = store.for_user(user_b).await.unwrap();
        assert_eq!(inbox[0].link.as_deref(), Some("/shot/abc"));
    }

    #[tokio::test]
    async fn empty_draft_list_is_a_no_op() {
        let store = MemoryStore::new();
        Notifier::new(store).deliver(Vec::new()).await;
    }
}
