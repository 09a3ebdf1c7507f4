//! Cross-component change notification.
//!
//! Two channels keep sibling views consistent without a central state
//! container. The storage engine publishes [`StoreEvent::KeyChanged`] after
//! every successful write - the coarse "something under this key changed,
//! re-read everything" signal. On top of that, each store publishes a
//! symbolic event for its entity family after every successful mutation, so
//! notification is structurally guaranteed rather than left to call sites.
//!
//! Subscriber contract: read full state once on mount, re-read wholesale on
//! any event, drop the receiver to unsubscribe. There is no ordering
//! guarantee beyond "eventually consistent after the synchronous write
//! returns"; a lagged receiver should treat the lag itself as a re-read
//! signal.

use tokio::sync::broadcast;

use vintly_core::ConversationId;

/// Buffered events per subscriber before the oldest are dropped.
const BUS_CAPACITY: usize = 64;

/// A change notification delivered to every live subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The value under a storage key changed. Carries only the key name,
    /// never a diff.
    KeyChanged(String),
    /// The listings collection was mutated.
    ListingsChanged,
    /// The favorites collection was mutated.
    FavoritesChanged,
    /// The current user session or the registered-users collection changed.
    AuthChanged,
    /// The admin session flag was set or cleared.
    AdminSessionChanged,
    /// A conversation gained a message or had its read state updated.
    MessagesUpdated {
        /// The affected conversation.
        conversation_id: ConversationId,
    },
}

/// The observer list shared by the storage engine and every store.
///
/// Cloning is cheap; all clones publish into the same set of subscribers.
/// Publishing never blocks and never fails - with no live subscribers the
/// event is simply dropped.
#[derive(Debug, Clone)]
pub struct ChangeBus {
    tx: broadcast::Sender<StoreEvent>,
}

impl ChangeBus {
    /// Create a new, empty bus.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    /// Register a new subscriber. Events published before this call are not
    /// delivered.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to all live subscribers.
    pub fn publish(&self, event: StoreEvent) {
        // A send error only means nobody is listening right now.
        let _ = self.tx.send(event);
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_receives_published_events() {
        let bus = ChangeBus::new();
        let mut rx = bus.subscribe();

        bus.publish(StoreEvent::FavoritesChanged);

        assert_eq!(rx.try_recv().unwrap(), StoreEvent::FavoritesChanged);
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = ChangeBus::new();
        bus.publish(StoreEvent::ListingsChanged);
    }

    #[test]
    fn test_events_fan_out_to_all_subscribers() {
        let bus = ChangeBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish(StoreEvent::AuthChanged);

        assert_eq!(a.try_recv().unwrap(), StoreEvent::AuthChanged);
        assert_eq!(b.try_recv().unwrap(), StoreEvent::AuthChanged);
    }

    #[test]
    fn test_late_subscriber_misses_earlier_events() {
        let bus = ChangeBus::new();
        bus.publish(StoreEvent::AdminSessionChanged);

        let mut rx = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }
}
