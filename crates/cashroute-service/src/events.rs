//! # Change Events
//!
//! Broadcast notifications emitted after successful mutations.
//!
//! ## Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Change Notification Flow                          │
//! │                                                                         │
//! │  service.add_log(...)                                                   │
//! │       │                                                                 │
//! │       ├── 1. mutate aggregate (pure)                                   │
//! │       ├── 2. persist whole document                                    │
//! │       └── 3. broadcast ChangeEvent   ◄── only after the write lands    │
//! │                   │                                                     │
//! │        ┌──────────┼──────────┐                                         │
//! │        ▼          ▼          ▼                                         │
//! │   subscriber  subscriber  subscriber     (UI views, caches, ...)       │
//! │                                                                         │
//! │  Events carry IDs, not payloads: subscribers re-read what they care    │
//! │  about, so a slow subscriber can never hold a stale aggregate.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `tokio::sync::broadcast` channel backs the fan-out. Lagging receivers
//! drop the oldest events rather than blocking writers; since events are
//! re-read hints, a dropped event at worst delays one refresh.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

/// Capacity of the event channel. Mutations are human-paced; a subscriber
/// that falls this far behind should just re-read the list.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A change that subscribers may want to react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChangeEvent {
    /// A new location was created.
    #[serde(rename_all = "camelCase")]
    LocationAdded { id: String },

    /// A location's document changed (details, notes, or logs).
    #[serde(rename_all = "camelCase")]
    LocationUpdated { id: String },

    /// A location was deleted.
    #[serde(rename_all = "camelCase")]
    LocationRemoved { id: String },

    /// The manual sort order of the route list changed.
    LocationsReordered,
}

/// Fan-out handle for change events.
///
/// Cheap to clone; every clone feeds the same set of subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl EventBus {
    /// Creates a new event bus with no subscribers.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        EventBus { sender }
    }

    /// Subscribes to future events. Events emitted before the call are not
    /// replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Broadcasts an event to all current subscribers.
    ///
    /// A send error only means nobody is listening, which is fine.
    pub fn emit(&self, event: ChangeEvent) {
        debug!(?event, "Broadcasting change event");
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        EventBus::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.emit(ChangeEvent::LocationAdded {
            id: "loc-1".to_string(),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            ChangeEvent::LocationAdded {
                id: "loc-1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.emit(ChangeEvent::LocationsReordered);
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&ChangeEvent::LocationRemoved {
            id: "loc-2".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"locationRemoved","id":"loc-2"}"#);
    }
}
