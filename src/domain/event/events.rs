//! Domain events emitted by the Event aggregate.
//!
//! Payloads carry the full updated record so observers can merge them
//! into cached state without a follow-up fetch.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EventId, NotificationId, Timestamp};
use crate::domain_event;

use super::Event;

/// A new event was published to the calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCreated {
    pub notification_id: NotificationId,
    pub event_id: EventId,
    pub event: Event,
    pub attendee_count: u32,
    pub occurred_at: Timestamp,
}

domain_event!(
    EventCreated,
    event_type = "event.created.v1",
    aggregate_id = event_id,
    aggregate_type = "Event",
    occurred_at = occurred_at,
    notification_id = notification_id
);

/// An event's metadata, schedule, or capacity changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventUpdated {
    pub notification_id: NotificationId,
    pub event_id: EventId,
    pub event: Event,
    pub attendee_count: u32,
    pub occurred_at: Timestamp,
}

domain_event!(
    EventUpdated,
    event_type = "event.updated.v1",
    aggregate_id = event_id,
    aggregate_type = "Event",
    occurred_at = occurred_at,
    notification_id = notification_id
);
