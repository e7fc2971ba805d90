//! BookingStore port - persistence and atomic admission for bookings.
//!
//! The admission decision lives behind this port because only the store
//! can make the duplicate check, the capacity check, and the insert
//! indivisible with respect to concurrent submissions for the same event.

use async_trait::async_trait;

use crate::domain::booking::{Booking, BookingStatus, RebookPolicy};
use crate::domain::event::Event;
use crate::domain::foundation::{BookingId, DomainError, EventId, UserId};
use crate::ports::EventWithCount;

/// Result of a successful admission: the committed booking plus the
/// attendee count recomputed inside the same atomic scope.
#[derive(Debug, Clone, PartialEq)]
pub struct AdmittedBooking {
    pub booking: Booking,
    pub attendee_count: u32,
}

/// A booking joined with its event, for the caller's booking list.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingWithEvent {
    pub booking: Booking,
    pub event: EventWithCount,
}

/// Filters for a user's booking list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    /// `Some(true)` keeps bookings whose event is in the future,
    /// `Some(false)` keeps past ones, `None` keeps both.
    pub upcoming: Option<bool>,
}

/// Port for persisting bookings and executing admission atomically.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Admits or rejects one booking request as a single atomic unit.
    ///
    /// Steps, indivisible per event with respect to concurrent calls:
    /// 1. Existing (event, user) row in any status fails with
    ///    `DuplicateBooking`, except a Cancelled row under
    ///    `AllowAfterCancellation`, which is reactivated in place.
    /// 2. Confirmed count at or above capacity fails with
    ///    `CapacityExceeded` carrying the observed count/capacity pair.
    /// 3. Otherwise a Confirmed row is inserted (or reactivated).
    ///
    /// Under N concurrent submissions against capacity C, exactly
    /// min(N, C) succeed and no observable state ever holds more than C
    /// Confirmed rows. Failure leaves no partial writes.
    async fn try_admit(
        &self,
        event: &Event,
        user_id: &UserId,
        policy: RebookPolicy,
    ) -> Result<AdmittedBooking, DomainError>;

    /// Looks up the unique booking row for an (event, user) pair.
    async fn find_by_event_and_user(
        &self,
        event_id: &EventId,
        user_id: &UserId,
    ) -> Result<Option<Booking>, DomainError>;

    /// Fetches one booking by id.
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError>;

    /// Lists a user's bookings joined with their events, most recently
    /// booked first.
    async fn find_by_user(
        &self,
        user_id: &UserId,
        filter: &BookingFilter,
    ) -> Result<Vec<BookingWithEvent>, DomainError>;

    /// Moves a booking to Cancelled and returns it with the recomputed
    /// confirmed count for its event. Idempotent on already-cancelled
    /// rows.
    async fn mark_cancelled(&self, id: &BookingId) -> Result<AdmittedBooking, DomainError>;

    /// Count of Confirmed bookings for an event.
    async fn count_confirmed(&self, event_id: &EventId) -> Result<u32, DomainError>;
}
