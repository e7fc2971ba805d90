//! HTTP DTOs for booking endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::event::dto::EventResponse;
use crate::domain::booking::{Booking, BookingStatus};
use crate::ports::{AdmittedBooking, BookingWithEvent};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to book a seat at an event.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub event_id: String,
}

/// Query parameters for the caller's booking list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListBookingsQuery {
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub upcoming: Option<bool>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Booking representation for API responses.
///
/// `attendee_count` is the event's confirmed count observed in the same
/// transaction that produced this booking state.
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub status: BookingStatus,
    pub booked_at: String,
    pub attendee_count: u32,
}

impl BookingResponse {
    fn from_booking(booking: &Booking, attendee_count: u32) -> Self {
        Self {
            id: booking.id().to_string(),
            event_id: booking.event_id().to_string(),
            user_id: booking.user_id().to_string(),
            status: booking.status(),
            booked_at: booking.booked_at().to_rfc3339(),
            attendee_count,
        }
    }
}

impl From<AdmittedBooking> for BookingResponse {
    fn from(admitted: AdmittedBooking) -> Self {
        Self::from_booking(&admitted.booking, admitted.attendee_count)
    }
}

/// Booking joined with its event, as returned by the booking list.
#[derive(Debug, Clone, Serialize)]
pub struct BookingWithEventResponse {
    #[serde(flatten)]
    pub booking: BookingResponse,
    pub event: EventResponse,
}

impl From<BookingWithEvent> for BookingWithEventResponse {
    fn from(bwe: BookingWithEvent) -> Self {
        let attendee_count = bwe.event.attendee_count;
        Self {
            booking: BookingResponse::from_booking(&bwe.booking, attendee_count),
            event: bwe.event.into(),
        }
    }
}

/// List wrapper for booking list responses.
#[derive(Debug, Clone, Serialize)]
pub struct BookingListResponse {
    pub items: Vec<BookingWithEventResponse>,
    pub total: usize,
}

impl From<Vec<BookingWithEvent>> for BookingListResponse {
    fn from(bookings: Vec<BookingWithEvent>) -> Self {
        let items: Vec<BookingWithEventResponse> =
            bookings.into_iter().map(Into::into).collect();
        let total = items.len();
        Self { items, total }
    }
}
