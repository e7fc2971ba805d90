//! CreateEventHandler - publish a new event to the calendar.

use std::sync::Arc;

use crate::domain::event::{Capacity, Event, EventCategory, EventCreated};
use crate::domain::foundation::{
    DomainError, EventId, NotificationId, SerializableDomainEvent, Timestamp, UserId,
};
use crate::ports::{EventPublisher, EventRepository};

/// Command to create a new event.
#[derive(Debug, Clone)]
pub struct CreateEventCommand {
    pub organizer_id: UserId,
    pub title: String,
    pub description: String,
    pub date: Timestamp,
    pub location: String,
    pub category: EventCategory,
    pub capacity: u32,
}

/// Handler for event creation.
pub struct CreateEventHandler {
    events: Arc<dyn EventRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl CreateEventHandler {
    pub fn new(events: Arc<dyn EventRepository>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { events, publisher }
    }

    pub async fn handle(&self, cmd: CreateEventCommand) -> Result<Event, DomainError> {
        let capacity = Capacity::new(cmd.capacity)?;
        let event = Event::new(
            EventId::new(),
            cmd.title,
            cmd.description,
            cmd.date,
            cmd.location,
            cmd.category,
            capacity,
            cmd.organizer_id.clone(),
        )?;

        self.events.save(&event).await?;

        tracing::info!(event_id = %event.id(), organizer = %cmd.organizer_id, "Event created");

        let created = EventCreated {
            notification_id: NotificationId::new(),
            event_id: *event.id(),
            event: event.clone(),
            attendee_count: 0,
            occurred_at: Timestamp::now(),
        };
        let envelope = created
            .to_envelope()
            .with_user_id(cmd.organizer_id.to_string());
        if let Err(e) = self.publisher.publish(envelope).await {
            tracing::warn!(event_id = %event.id(), error = %e, "Failed to publish event.created notification");
        }

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::InMemoryEventRepository;
    use crate::domain::foundation::ErrorCode;

    fn command(capacity: u32) -> CreateEventCommand {
        CreateEventCommand {
            organizer_id: UserId::new("organizer-1").unwrap(),
            title: "Networking Night".to_string(),
            description: "Meet people".to_string(),
            date: Timestamp::now().plus_days(10),
            location: "Rooftop Bar".to_string(),
            category: EventCategory::Networking,
            capacity,
        }
    }

    #[tokio::test]
    async fn creates_event_and_publishes_notification() {
        let repo = Arc::new(InMemoryEventRepository::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = CreateEventHandler::new(repo.clone(), bus.clone());

        let event = handler.handle(command(25)).await.unwrap();

        let stored = repo.find_by_id(event.id()).await.unwrap().unwrap();
        assert_eq!(stored.event.title(), "Networking Night");
        assert_eq!(stored.attendee_count, 0);
        assert!(bus.has_event("event.created.v1"));
    }

    #[tokio::test]
    async fn zero_capacity_is_rejected() {
        let repo = Arc::new(InMemoryEventRepository::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = CreateEventHandler::new(repo, bus.clone());

        let result = handler.handle(command(0)).await;
        assert_eq!(result.unwrap_err().code, ErrorCode::ValidationFailed);
        assert!(!bus.has_event("event.created.v1"));
    }
}
