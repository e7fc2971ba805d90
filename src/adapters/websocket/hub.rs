//! Broadcast hub for topic-based change fan-out.
//!
//! One broadcast channel per topic. Connections subscribe to the topics
//! they care about and receive changes published after they subscribed.
//! There is no backlog: a subscriber that joins after a publish never
//! sees it, and a subscriber that falls behind the channel capacity
//! loses the oldest messages first.

use tokio::sync::broadcast;
use uuid::Uuid;

use super::messages::{ChangeBroadcast, Topic};

/// Unique identifier for a WebSocket client connection.
///
/// Generated server-side when a client connects. Used only for logging
/// and connection accounting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Topic-keyed broadcast channels for live calendar changes.
///
/// # Thread Safety
///
/// `broadcast::Sender` is `Sync`; the hub holds one per topic and needs
/// no interior locking.
pub struct BroadcastHub {
    events_tx: broadcast::Sender<ChangeBroadcast>,
    bookings_tx: broadcast::Sender<ChangeBroadcast>,
}

impl BroadcastHub {
    /// Create a hub with the given per-topic channel capacity.
    ///
    /// Larger values tolerate slower clients before they start losing
    /// the oldest messages.
    pub fn new(channel_capacity: usize) -> Self {
        let (events_tx, _) = broadcast::channel(channel_capacity);
        let (bookings_tx, _) = broadcast::channel(channel_capacity);
        Self {
            events_tx,
            bookings_tx,
        }
    }

    /// Create with default capacity (128 messages per topic).
    pub fn with_default_capacity() -> Self {
        Self::new(128)
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<ChangeBroadcast> {
        match topic {
            Topic::EventChanged => &self.events_tx,
            Topic::BookingChanged => &self.bookings_tx,
        }
    }

    /// Subscribe to one topic. The receiver sees only changes published
    /// after this call.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<ChangeBroadcast> {
        self.sender(topic).subscribe()
    }

    /// Publish a change to every current subscriber of its topic.
    ///
    /// Best effort: a topic with no subscribers is a no-op, and a send
    /// failure never propagates to the publisher.
    pub fn publish(&self, change: ChangeBroadcast) {
        let topic = change.topic;
        if let Err(e) = self.sender(topic).send(change) {
            tracing::trace!(topic = %topic, "No subscribers for change: {}", e);
        }
    }

    /// Number of current subscribers on a topic.
    pub fn observer_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use tokio::sync::broadcast::error::RecvError;

    fn change(topic: Topic, marker: &str) -> ChangeBroadcast {
        ChangeBroadcast {
            topic,
            event_type: "test.event".to_string(),
            data: serde_json::json!({ "marker": marker }),
            timestamp: Timestamp::now(),
            correlation_id: None,
        }
    }

    #[tokio::test]
    async fn subscriber_receives_published_change() {
        let hub = BroadcastHub::with_default_capacity();
        let mut rx = hub.subscribe(Topic::EventChanged);

        hub.publish(change(Topic::EventChanged, "a"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.data["marker"], "a");
    }

    #[tokio::test]
    async fn topics_are_isolated() {
        let hub = BroadcastHub::with_default_capacity();
        let mut events_rx = hub.subscribe(Topic::EventChanged);
        let mut bookings_rx = hub.subscribe(Topic::BookingChanged);

        hub.publish(change(Topic::BookingChanged, "b"));

        let received = bookings_rx.recv().await.unwrap();
        assert_eq!(received.topic, Topic::BookingChanged);
        assert!(events_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn late_subscriber_gets_no_backlog() {
        let hub = BroadcastHub::with_default_capacity();
        let _early = hub.subscribe(Topic::EventChanged);

        hub.publish(change(Topic::EventChanged, "before"));

        let mut late = hub.subscribe(Topic::EventChanged);
        hub.publish(change(Topic::EventChanged, "after"));

        let received = late.recv().await.unwrap();
        assert_eq!(received.data["marker"], "after");
        assert!(late.try_recv().is_err());
    }

    #[tokio::test]
    async fn lagging_subscriber_drops_oldest() {
        let hub = BroadcastHub::new(1);
        let mut rx = hub.subscribe(Topic::BookingChanged);

        hub.publish(change(Topic::BookingChanged, "old"));
        hub.publish(change(Topic::BookingChanged, "new"));

        match rx.recv().await {
            Err(RecvError::Lagged(skipped)) => assert_eq!(skipped, 1),
            other => panic!("expected lag, got {:?}", other.map(|c| c.data)),
        }
        let received = rx.recv().await.unwrap();
        assert_eq!(received.data["marker"], "new");
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_noop() {
        let hub = BroadcastHub::with_default_capacity();
        hub.publish(change(Topic::EventChanged, "dropped"));
        assert_eq!(hub.observer_count(Topic::EventChanged), 0);
    }

    #[tokio::test]
    async fn observer_count_tracks_subscriptions() {
        let hub = BroadcastHub::with_default_capacity();
        assert_eq!(hub.observer_count(Topic::EventChanged), 0);

        let rx1 = hub.subscribe(Topic::EventChanged);
        let rx2 = hub.subscribe(Topic::EventChanged);
        assert_eq!(hub.observer_count(Topic::EventChanged), 2);

        drop(rx1);
        drop(rx2);
        assert_eq!(hub.observer_count(Topic::EventChanged), 0);
    }
}
