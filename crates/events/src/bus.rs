//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across the application.
//! Events are published after the database transaction that produced them
//! commits, and a failed delivery never affects completion state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use trailmap_core::actor::ActorScope;
use trailmap_core::types::DbId;

// ---------------------------------------------------------------------------
// MapEvent
// ---------------------------------------------------------------------------

/// A domain event that happened on a learning map.
///
/// Constructed via [`MapEvent::new`] and enriched with the builder methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapEvent {
    /// Dot-separated event name, e.g. `"node.completed"`.
    pub event_type: String,

    pub map_id: DbId,

    /// Member that caused the event.
    pub member_id: Option<DbId>,

    /// Play session the member was seated in, if any.
    pub map_play_id: Option<DbId>,

    /// Optional source entity kind (e.g. `"question"`, `"node"`).
    pub source_entity_type: Option<String>,

    pub source_entity_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl MapEvent {
    /// Create an event for a map with all optional fields empty.
    pub fn new(event_type: impl Into<String>, map_id: DbId) -> Self {
        Self {
            event_type: event_type.into(),
            map_id,
            member_id: None,
            map_play_id: None,
            source_entity_type: None,
            source_entity_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the acting member and play session of an actor scope.
    pub fn with_actor(mut self, scope: &ActorScope) -> Self {
        self.member_id = Some(scope.member_id());
        self.map_play_id = scope.map_play_id();
        self
    }

    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
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
/// use trailmap_events::bus::{EventBus, MapEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(MapEvent::new("node.completed", 1));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<MapEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest messages are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: MapEvent) {
        // A send error only means there are no receivers.
        let _ = self.sender.send(event);
    }

    /// Publish several events in order.
    pub fn publish_all(&self, events: impl IntoIterator<Item = MapEvent>) {
        for event in events {
            self.publish(event);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MapEvent> {
        self.sender.subscribe()
    }

    /// Number of receivers currently attached.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
