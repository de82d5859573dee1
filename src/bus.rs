//! In-process event bus for throttle notifications.
//!
//! The bus is an explicit object constructed by the caller and cloned into
//! whichever components need to publish or subscribe. There is no global
//! instance; its lifetime is owned by whoever built it.

use tokio::sync::broadcast;

/// Default number of events buffered per subscriber.
const DEFAULT_CAPACITY: usize = 64;

/// Events published by the throttle as identifiers change state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThrottleEvent {
    /// An identifier crossed the attempt threshold and is now blocked.
    Blocked {
        identifier: String,
        blocked_until_ms: i64,
    },
    /// An identifier's state was discarded administratively.
    Reset { identifier: String },
    /// A housekeeping sweep removed expired entries.
    Swept { removed: usize },
}

/// Multi-subscriber broadcast channel for [`ThrottleEvent`]s.
///
/// Cloning is cheap; all clones publish into the same channel. Slow
/// subscribers miss events once the per-subscriber buffer overflows rather
/// than backpressuring publishers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ThrottleEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ThrottleEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all current subscribers.
    ///
    /// Publishing with no live subscribers is not an error; the event is
    /// simply dropped.
    pub fn publish(&self, event: ThrottleEvent) {
        let _ = self.sender.send(event);
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
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
    async fn test_publish_without_subscribers() {
        let bus = EventBus::new(8);
        assert_eq!(bus.subscriber_count(), 0);

        // Must not panic or error
        bus.publish(ThrottleEvent::Swept { removed: 3 });
    }

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(ThrottleEvent::Blocked {
            identifier: "1.2.3.4".to_string(),
            blocked_until_ms: 900_005,
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            ThrottleEvent::Blocked {
                identifier: "1.2.3.4".to_string(),
                blocked_until_ms: 900_005,
            }
        );
    }

    #[tokio::test]
    async fn test_multiple_subscribers_all_receive() {
        let bus = EventBus::new(8);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(ThrottleEvent::Reset {
            identifier: "alice".to_string(),
        });

        let expected = ThrottleEvent::Reset {
            identifier: "alice".to_string(),
        };
        assert_eq!(rx1.recv().await.unwrap(), expected);
        assert_eq!(rx2.recv().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_clones_share_channel() {
        let bus = EventBus::new(8);
        let publisher = bus.clone();
        let mut rx = bus.subscribe();

        publisher.publish(ThrottleEvent::Swept { removed: 1 });

        assert_eq!(rx.recv().await.unwrap(), ThrottleEvent::Swept { removed: 1 });
    }
}
