//! HTTP DTOs for event endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing
//! independent evolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::event::EventCategory;
use crate::domain::foundation::Timestamp;
use crate::ports::{EventFilter, EventWithCount};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a new event.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: EventCategory,
    pub capacity: u32,
}

/// Request to update an event. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub category: Option<EventCategory>,
    pub capacity: Option<u32>,
}

/// Query parameters for the calendar listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListEventsQuery {
    #[serde(default)]
    pub category: Option<EventCategory>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub search: Option<String>,
}

impl From<ListEventsQuery> for EventFilter {
    fn from(query: ListEventsQuery) -> Self {
        EventFilter {
            category: query.category,
            location: query.location,
            start_date: query.start_date.map(Timestamp::from_datetime),
            end_date: query.end_date.map(Timestamp::from_datetime),
            search: query.search,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Event representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub location: String,
    pub category: EventCategory,
    pub capacity: u32,
    pub organizer_id: String,
    pub attendee_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_booked: Option<bool>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<EventWithCount> for EventResponse {
    fn from(ec: EventWithCount) -> Self {
        let event = ec.event;
        Self {
            id: event.id().to_string(),
            title: event.title().to_string(),
            description: event.description().to_string(),
            date: event.date().to_rfc3339(),
            location: event.location().to_string(),
            category: event.category(),
            capacity: event.capacity().get(),
            organizer_id: event.organizer_id().to_string(),
            attendee_count: ec.attendee_count,
            is_booked: None,
            created_at: event.created_at().to_rfc3339(),
            updated_at: event.updated_at().to_rfc3339(),
        }
    }
}

impl EventResponse {
    /// Marks whether the requesting user holds a confirmed booking.
    pub fn with_is_booked(mut self, is_booked: bool) -> Self {
        self.is_booked = Some(is_booked);
        self
    }
}

/// List wrapper for calendar responses.
#[derive(Debug, Clone, Serialize)]
pub struct EventListResponse {
    pub items: Vec<EventResponse>,
    pub total: usize,
}

impl From<Vec<EventWithCount>> for EventListResponse {
    fn from(events: Vec<EventWithCount>) -> Self {
        let items: Vec<EventResponse> = events.into_iter().map(Into::into).collect();
        let total = items.len();
        Self { items, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::{Capacity, Event};
    use crate::domain::foundation::{EventId, UserId};

    #[test]
    fn create_event_request_deserializes() {
        let json = r#"{
            "title": "Rust Conf",
            "date": "2026-09-01T18:00:00Z",
            "location": "Main Hall",
            "category": "CONFERENCE",
            "capacity": 100
        }"#;
        let req: CreateEventRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.title, "Rust Conf");
        assert_eq!(req.category, EventCategory::Conference);
        assert_eq!(req.description, "");
    }

    #[test]
    fn list_query_maps_to_filter() {
        let query = ListEventsQuery {
            category: Some(EventCategory::Workshop),
            search: Some("rust".to_string()),
            ..Default::default()
        };
        let filter: EventFilter = query.into();
        assert_eq!(filter.category, Some(EventCategory::Workshop));
        assert_eq!(filter.search.as_deref(), Some("rust"));
        assert!(filter.start_date.is_none());
    }

    #[test]
    fn event_response_conversion() {
        let event = Event::new(
            EventId::new(),
            "Meetup",
            "Monthly",
            Timestamp::now().plus_days(1),
            "Hall",
            EventCategory::Networking,
            Capacity::new(30).unwrap(),
            UserId::new("organizer-1").unwrap(),
        )
        .unwrap();
        let response: EventResponse = EventWithCount {
            event,
            attendee_count: 12,
        }
        .into();

        assert_eq!(response.title, "Meetup");
        assert_eq!(response.attendee_count, 12);
        assert_eq!(response.capacity, 30);
        assert!(response.is_booked.is_none());

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("is_booked"));
    }
}
