//! EventRepository port - persistence for Event aggregates.

use async_trait::async_trait;

use crate::domain::event::{Event, EventCategory};
use crate::domain::foundation::{DomainError, EventId, Timestamp};

/// Filter set for calendar queries. Doubles as the client's query
/// signature: two requests with the same filter hit the same cache key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    /// Exact category match.
    pub category: Option<EventCategory>,
    /// Case-insensitive substring match on location.
    pub location: Option<String>,
    /// Events on or after this instant.
    pub start_date: Option<Timestamp>,
    /// Events on or before this instant.
    pub end_date: Option<Timestamp>,
    /// Free-text search over title, description, and location.
    pub search: Option<String>,
}

impl EventFilter {
    /// Canonical string form used as a cache query signature.
    pub fn signature(&self) -> String {
        format!(
            "events?category={}&location={}&start={}&end={}&search={}",
            self.category.map(|c| c.to_string()).unwrap_or_default(),
            self.location.as_deref().unwrap_or(""),
            self.start_date.map(|t| t.to_rfc3339()).unwrap_or_default(),
            self.end_date.map(|t| t.to_rfc3339()).unwrap_or_default(),
            self.search.as_deref().unwrap_or(""),
        )
    }
}

/// An event joined with its storage-computed confirmed-booking count.
///
/// The count is derived inside the store, never cached alongside the
/// aggregate, so it is always consistent with the booking rows at read
/// time.
#[derive(Debug, Clone, PartialEq)]
pub struct EventWithCount {
    pub event: Event,
    pub attendee_count: u32,
}

/// Port for persisting and querying Event aggregates.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persists a new event.
    async fn save(&self, event: &Event) -> Result<(), DomainError>;

    /// Overwrites an existing event. Fails with `EventNotFound` if absent.
    async fn update(&self, event: &Event) -> Result<(), DomainError>;

    /// Fetches one event with its confirmed-booking count.
    async fn find_by_id(&self, id: &EventId) -> Result<Option<EventWithCount>, DomainError>;

    /// Lists events matching the filter, ordered by date ascending.
    async fn list(&self, filter: &EventFilter) -> Result<Vec<EventWithCount>, DomainError>;

    /// Removes an event and, by cascade, its bookings.
    async fn delete(&self, id: &EventId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_stable_signature() {
        let filter = EventFilter::default();
        assert_eq!(filter.signature(), EventFilter::default().signature());
    }

    #[test]
    fn signature_distinguishes_filters() {
        let all = EventFilter::default();
        let workshops = EventFilter {
            category: Some(EventCategory::Workshop),
            ..Default::default()
        };
        assert_ne!(all.signature(), workshops.signature());
    }
}
