//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! Handlers publish a [`DomainEvent`] after every successful mutation.
//! The bus is shared as `Arc<EventBus>` through the application state.

use chrono::{DateTime, Utc};
use pmo_core::access::ResourceKind;
use pmo_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event names
// ---------------------------------------------------------------------------

pub const EVENT_CREATED: &str = "created";
pub const EVENT_UPDATED: &str = "updated";
pub const EVENT_DELETED: &str = "deleted";
pub const EVENT_PROGRESS_RECOMPUTED: &str = "progress_recomputed";
pub const EVENT_LOGIN: &str = "login";

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// Something a user did to an entity.
///
/// `event_type` is `"<entity>.<action>"`, e.g. `"project.updated"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    pub event_type: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub actor_user_id: Option<DbId>,
    /// Event-specific data such as the changed field names.
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent {
    /// An event with only a type name and an empty payload.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            entity_type: None,
            entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// `"<kind>.<action>"` against entity `id`.
    pub fn on(kind: ResourceKind, id: DbId, action: &str) -> Self {
        let mut event = Self::new(format!("{}.{action}", kind.as_str()));
        event.entity_type = Some(kind.as_str().to_string());
        event.entity_id = Some(id);
        event
    }

    pub fn by(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use pmo_core::access::ResourceKind;
/// use pmo_events::bus::{DomainEvent, EventBus, EVENT_CREATED};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(DomainEvent::on(ResourceKind::Project, 1, EVENT_CREATED).by(7));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unread events are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Without subscribers the event
    /// is dropped.
    pub fn publish(&self, event: DomainEvent) {
        tracing::debug!(
            event_type = %event.event_type,
            entity_id = ?event.entity_id,
            actor_user_id = ?event.actor_user_id,
            "Publishing domain event"
        );
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_entity_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            DomainEvent::on(ResourceKind::Deliverable, 42, EVENT_UPDATED)
                .by(7)
                .with_payload(serde_json::json!({"fields": ["status"]})),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, "deliverable.updated");
        assert_eq!(received.entity_type.as_deref(), Some("deliverable"));
        assert_eq!(received.entity_id, Some(42));
        assert_eq!(received.actor_user_id, Some(7));
        assert_eq!(received.payload["fields"][0], "status");
    }

    #[tokio::test]
    async fn every_subscriber_sees_each_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(DomainEvent::new(EVENT_LOGIN));

        assert_eq!(rx1.recv().await.unwrap().event_type, "login");
        assert_eq!(rx2.recv().await.unwrap().event_type, "login");
    }

    #[test]
    fn publish_without_subscribers_is_dropped() {
        let bus = EventBus::default();
        bus.publish(DomainEvent::new("orphan"));
    }

    #[tokio::test]
    async fn small_buffer_reports_lag() {
        let bus = EventBus::new(1);
        let mut rx = bus.subscribe();

        bus.publish(DomainEvent::new("first"));
        bus.publish(DomainEvent::new("second"));

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        assert_eq!(rx.recv().await.unwrap().event_type, "second");
    }
}
