//! GetEventHandler - one event with its storage-computed count.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, EventId};
use crate::ports::{EventRepository, EventWithCount};

/// Handler for fetching a single event.
pub struct GetEventHandler {
    events: Arc<dyn EventRepository>,
}

impl GetEventHandler {
    pub fn new(events: Arc<dyn EventRepository>) -> Self {
        Self { events }
    }

    pub async fn handle(&self, event_id: EventId) -> Result<EventWithCount, DomainError> {
        self.events.find_by_id(&event_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::EventNotFound,
                format!("Event not found: {}", event_id),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryEventRepository;
    use crate::domain::event::{Capacity, Event, EventCategory};
    use crate::domain::foundation::{Timestamp, UserId};

    #[tokio::test]
    async fn missing_event_is_not_found() {
        let repo = Arc::new(InMemoryEventRepository::new());
        let handler = GetEventHandler::new(repo);
        let result = handler.handle(EventId::new()).await;
        assert_eq!(result.unwrap_err().code, ErrorCode::EventNotFound);
    }

    #[tokio::test]
    async fn returns_event_with_count() {
        let repo = Arc::new(InMemoryEventRepository::new());
        let event = Event::new(
            EventId::new(),
            "Town Hall",
            "Open Q&A",
            Timestamp::now().plus_days(2),
            "Auditorium",
            EventCategory::Social,
            Capacity::new(200).unwrap(),
            UserId::new("organizer-1").unwrap(),
        )
        .unwrap();
        repo.save(&event).await.unwrap();

        let handler = GetEventHandler::new(repo);
        let found = handler.handle(*event.id()).await.unwrap();
        assert_eq!(found.event.title(), "Town Hall");
        assert_eq!(found.attendee_count, 0);
    }
}
