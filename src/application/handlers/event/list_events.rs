//! ListEventsHandler - the filtered calendar query.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::ports::{EventFilter, EventRepository, EventWithCount};

/// Handler for the calendar listing.
pub struct ListEventsHandler {
    events: Arc<dyn EventRepository>,
}

impl ListEventsHandler {
    pub fn new(events: Arc<dyn EventRepository>) -> Self {
        Self { events }
    }

    pub async fn handle(&self, filter: EventFilter) -> Result<Vec<EventWithCount>, DomainError> {
        self.events.list(&filter).await
    }
}
