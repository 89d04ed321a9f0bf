//! Server-to-client event bus.
//!
//! Mutations on orders and notifications publish events that are broadcast
//! to every connected subscriber. Publishing is fire-and-forget: a publish
//! with no subscribers, or one that a slow subscriber misses, never fails
//! the originating mutation. Filtering, if a subscriber needs it, is the
//! subscriber's responsibility.

use serde_json::{Value, json};
use tokio::sync::broadcast;

/// Buffered events per subscriber before the slowest one starts lagging.
const CHANNEL_CAPACITY: usize = 64;

/// An event broadcast to all subscribers.
#[derive(Debug, Clone)]
pub enum Event {
    /// A new order was placed.
    OrderCreated(Value),
    /// An order changed (currently only status transitions).
    OrderUpdated(Value),
    /// An order was deleted.
    OrderDeleted {
        /// Identifier of the removed order.
        id: String,
    },
    /// A notification was created.
    NotificationCreated(Value),
}

impl Event {
    /// The wire name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OrderCreated(_) => "orders:new",
            Self::OrderUpdated(_) => "orders:updated",
            Self::OrderDeleted { .. } => "orders:deleted",
            Self::NotificationCreated(_) => "notification:new",
        }
    }

    /// The JSON frame pushed to subscribers.
    #[must_use]
    pub fn to_message(&self) -> Value {
        let data = match self {
            Self::OrderCreated(order) | Self::OrderUpdated(order) => order.clone(),
            Self::OrderDeleted { id } => json!({ "id": id }),
            Self::NotificationCreated(notification) => notification.clone(),
        };
        json!({ "event": self.name(), "data": data })
    }
}

/// Broadcast channel fanning events out to all subscribers.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create an event bus with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Never fails; with no subscribers the event is dropped.
    pub fn publish(&self, event: Event) {
        let name = event.name();
        match self.tx.send(event) {
            Ok(receivers) => tracing::debug!(event = name, receivers, "event published"),
            Err(_) => tracing::trace!(event = name, "event dropped, no subscribers"),
        }
    }

    /// Subscribe to all events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
