//! In-process event bus backed by a `tokio::sync::broadcast` channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use waypoint_core::types::EntityId;

// ---------------------------------------------------------------------------
// MapEvent
// ---------------------------------------------------------------------------

/// A change that happened to a journey map.
///
/// Constructed via [`MapEvent::new`] and enriched with the builder
/// methods [`at_row`](MapEvent::at_row), [`at_column`](MapEvent::at_column),
/// [`for_entity`](MapEvent::for_entity), and
/// [`with_payload`](MapEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapEvent {
    /// Dot-separated event name, e.g. `"item.created"` or `"column.moved"`.
    pub event_type: String,

    /// The map the change belongs to.
    pub map_id: EntityId,

    /// Row the change happened in, when row-scoped.
    pub row_id: Option<EntityId>,

    /// Column the change happened in, when column-scoped.
    pub column_id: Option<EntityId>,

    /// Step aligned with `column_id`, when known.
    pub step_id: Option<EntityId>,

    /// Id of the created/updated/deleted entity itself.
    pub entity_id: Option<EntityId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the change was applied locally (UTC).
    pub timestamp: DateTime<Utc>,
}

impl MapEvent {
    /// Create a new event with only the required type and map id.
    pub fn new(event_type: impl Into<String>, map_id: EntityId) -> Self {
        Self {
            event_type: event_type.into(),
            map_id,
            row_id: None,
            column_id: None,
            step_id: None,
            entity_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the row the change happened in.
    pub fn at_row(mut self, row_id: EntityId) -> Self {
        self.row_id = Some(row_id);
        self
    }

    /// Attach the column (and its step) the change happened in.
    pub fn at_column(mut self, column_id: EntityId, step_id: EntityId) -> Self {
        self.column_id = Some(column_id);
        self.step_id = Some(step_id);
        self
    }

    /// Attach the changed entity's id.
    pub fn for_entity(mut self, entity_id: EntityId) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// MapEventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out bus for [`MapEvent`]s.
///
/// Wraps a [`broadcast::Sender`] so any number of subscribers (a socket
/// bridge, a presence indicator, tests) independently receive every
/// published event.
#[derive(Debug)]
pub struct MapEventBus {
    sender: broadcast::Sender<MapEvent>,
}

impl MapEventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are
    /// dropped and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<MapEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently
    /// dropped; publishing is fire-and-forget for the editor.
    pub fn publish(&self, event: MapEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }
}

impl Default for MapEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
