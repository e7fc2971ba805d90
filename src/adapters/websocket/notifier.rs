//! Change notifier bridging domain events to WebSocket clients.
//!
//! Subscribes to calendar-relevant domain events and republishes them on
//! the hub's change topics. The payload forwarded to clients is the full
//! updated record carried by the domain event, so clients can merge it
//! without a follow-up fetch.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::{EventHandler, EventSubscriber};

use super::hub::BroadcastHub;
use super::messages::{ChangeBroadcast, Topic};

/// Domain event types that produce change notifications.
pub const CHANGE_EVENT_TYPES: &[&str] = &[
    "event.created.v1",
    "event.updated.v1",
    "booking.confirmed.v1",
    "booking.cancelled.v1",
];

/// Bridge between the event bus and the broadcast hub.
pub struct ChangeNotifier {
    hub: Arc<BroadcastHub>,
}

impl ChangeNotifier {
    pub fn new(hub: Arc<BroadcastHub>) -> Self {
        Self { hub }
    }

    /// Create as an Arc (for sharing with an event subscriber).
    pub fn new_shared(hub: Arc<BroadcastHub>) -> Arc<Self> {
        Arc::new(Self::new(hub))
    }

    /// Register this notifier with an event subscriber for all change
    /// event types.
    pub fn register(self: &Arc<Self>, subscriber: &impl EventSubscriber) {
        subscriber.subscribe_all(CHANGE_EVENT_TYPES, self.clone());
    }

    /// Resolve the hub topic for an envelope.
    ///
    /// Returns `None` for aggregates that have no change topic.
    fn topic_for(event: &EventEnvelope) -> Option<Topic> {
        match event.aggregate_type.as_str() {
            "Event" => Some(Topic::EventChanged),
            "Booking" => Some(Topic::BookingChanged),
            _ => None,
        }
    }
}

#[async_trait]
impl EventHandler for ChangeNotifier {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let Some(topic) = Self::topic_for(&event) else {
            tracing::debug!(
                event_type = %event.event_type,
                aggregate_type = %event.aggregate_type,
                "No change topic for event, skipping broadcast"
            );
            return Ok(());
        };

        self.hub.publish(ChangeBroadcast {
            topic,
            event_type: event.event_type,
            data: event.payload,
            timestamp: event.occurred_at,
            correlation_id: event.metadata.correlation_id,
        });

        Ok(())
    }

    fn name(&self) -> &'static str {
        "ChangeNotifier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::domain::foundation::{EventMetadata, NotificationId, Timestamp};
    use crate::ports::EventPublisher;
    use serde_json::json;

    fn envelope(event_type: &str, aggregate_type: &str) -> EventEnvelope {
        EventEnvelope {
            notification_id: NotificationId::new(),
            event_type: event_type.to_string(),
            aggregate_id: "agg-1".to_string(),
            aggregate_type: aggregate_type.to_string(),
            occurred_at: Timestamp::now(),
            payload: json!({"id": "agg-1", "status": "CONFIRMED"}),
            metadata: EventMetadata::default(),
        }
    }

    #[tokio::test]
    async fn booking_event_lands_on_booking_topic() {
        let hub = Arc::new(BroadcastHub::with_default_capacity());
        let notifier = ChangeNotifier::new(hub.clone());
        let mut rx = hub.subscribe(Topic::BookingChanged);

        notifier
            .handle(envelope("booking.confirmed.v1", "Booking"))
            .await
            .unwrap();

        let change = rx.recv().await.unwrap();
        assert_eq!(change.topic, Topic::BookingChanged);
        assert_eq!(change.event_type, "booking.confirmed.v1");
        assert_eq!(change.data["status"], "CONFIRMED");
    }

    #[tokio::test]
    async fn event_update_lands_on_event_topic() {
        let hub = Arc::new(BroadcastHub::with_default_capacity());
        let notifier = ChangeNotifier::new(hub.clone());
        let mut rx = hub.subscribe(Topic::EventChanged);

        notifier
            .handle(envelope("event.updated.v1", "Event"))
            .await
            .unwrap();

        let change = rx.recv().await.unwrap();
        assert_eq!(change.topic, Topic::EventChanged);
    }

    #[tokio::test]
    async fn unknown_aggregate_is_skipped() {
        let hub = Arc::new(BroadcastHub::with_default_capacity());
        let notifier = ChangeNotifier::new(hub.clone());
        let mut rx = hub.subscribe(Topic::EventChanged);

        notifier
            .handle(envelope("audit.recorded.v1", "Audit"))
            .await
            .unwrap();

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn registered_notifier_receives_bus_publishes() {
        let bus = Arc::new(InMemoryEventBus::new());
        let hub = Arc::new(BroadcastHub::with_default_capacity());
        let notifier = ChangeNotifier::new_shared(hub.clone());
        notifier.register(bus.as_ref());

        let mut rx = hub.subscribe(Topic::BookingChanged);
        bus.publish(envelope("booking.cancelled.v1", "Booking"))
            .await
            .unwrap();

        let change = rx.recv().await.unwrap();
        assert_eq!(change.event_type, "booking.cancelled.v1");
    }

    #[test]
    fn change_event_types_cover_all_record_mutations() {
        for event_type in [
            "event.created.v1",
            "event.updated.v1",
            "booking.confirmed.v1",
            "booking.cancelled.v1",
        ] {
            assert!(
                CHANGE_EVENT_TYPES.contains(&event_type),
                "Missing event type: {}",
                event_type
            );
        }
    }
}
