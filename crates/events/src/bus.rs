//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! Services publish a [`DomainEvent`] on every review or sequence
//! transition; UI consumers and background forwarders subscribe
//! independently. Shared via `Arc<EventBus>`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use shotflow_core::types::{EntityId, Timestamp};

/// Buffer capacity for the broadcast channel. Slow subscribers past
/// this depth observe `RecvError::Lagged`.
const CHANNEL_CAPACITY: usize = 512;

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// A transition that occurred in the review pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Dot-separated event name, e.g. `"version.activated"`.
    pub event_type: String,

    /// The shot the transition belongs to, when there is one.
    pub shot_id: Option<EntityId>,

    /// The user whose action caused the transition.
    pub actor_user_id: Option<EntityId>,

    /// Event-specific data.
    pub payload: serde_json::Value,

    /// When the transition occurred (UTC).
    pub occurred_at: Timestamp,
}

impl DomainEvent {
    /// Create an event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            shot_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            occurred_at: Utc::now(),
        }
    }

    /// Attach the shot the event belongs to.
    pub fn for_shot(mut self, shot_id: EntityId) -> Self {
        self.shot_id = Some(shot_id);
        self
    }

    /// Attach the acting user.
    pub fn by(mut self, user_id: EntityId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Set the event payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Fan-out hub for [`DomainEvent`]s.
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers. With zero
    /// subscribers the event is dropped; publishing never fails.
    pub fn publish(&self, event: DomainEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(CHANNEL_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
