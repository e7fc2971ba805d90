//! Domain events emitted when a booking commits or is cancelled.
//!
//! Published strictly after the admission transaction commits, never
//! before, so observers only ever learn about durable state.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BookingId, NotificationId, Timestamp};
use crate::domain_event;

use super::Booking;

/// A booking was admitted and committed.
///
/// Carries the recomputed attendee count so observers can correct their
/// optimistic views without refetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmed {
    pub notification_id: NotificationId,
    pub booking_id: BookingId,
    pub booking: Booking,
    pub attendee_count: u32,
    pub occurred_at: Timestamp,
}

domain_event!(
    BookingConfirmed,
    event_type = "booking.confirmed.v1",
    aggregate_id = booking_id,
    aggregate_type = "Booking",
    occurred_at = occurred_at,
    notification_id = notification_id
);

/// A booking moved to Cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCancelled {
    pub notification_id: NotificationId,
    pub booking_id: BookingId,
    pub booking: Booking,
    pub attendee_count: u32,
    pub occurred_at: Timestamp,
}

domain_event!(
    BookingCancelled,
    event_type = "booking.cancelled.v1",
    aggregate_id = booking_id,
    aggregate_type = "Booking",
    occurred_at = occurred_at,
    notification_id = notification_id
);
