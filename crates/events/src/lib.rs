//! Event and notification infrastructure for the review pipeline.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DomainEvent`] — the canonical event envelope published on every
//!   review/sequence transition.
//! - [`router`] — pure derivation of notification recipients and
//!   messages from a review action.
//! - [`Notifier`] — fire-and-forget fan-out of notification drafts to
//!   the notification store.
//! - [`WebhookForwarder`] — background task pushing domain events to an
//!   external HTTP sink with bounded retry.

pub mod bus;
pub mod notifier;
pub mod router;
pub mod webhook;

pub use bus::{DomainEvent, EventBus};
pub use notifier::Notifier;
pub use router::{route, NotificationDraft, ReviewAction, RoutingContext};
pub use webhook::{WebhookConfig, WebhookForwarder};
