//! Booking aggregate - one user's seat at one event.
//!
//! A (event, user) pair maps to at most one booking row for its entire
//! lifetime. The row is created Confirmed by admission, may move to
//! Cancelled, and is never deleted while the event exists.

mod events;

pub use events::{BookingCancelled, BookingConfirmed};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{BookingId, EventId, Timestamp, UserId, ValidationError};

/// Booking lifecycle status.
///
/// `Pending` exists in the persisted schema but no core operation creates
/// it; consumers still handle it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(BookingStatus::Pending),
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown booking status '{}'", other),
            )),
        }
    }
}

/// Whether a user who cancelled may book the same event again.
///
/// The unique (event, user) slot survives cancellation, so rebooking is a
/// policy decision rather than an accident of the uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebookPolicy {
    /// Any existing row, regardless of status, blocks a new submission.
    /// This mirrors the originally observed behavior.
    DenyWhileRecordExists,

    /// A Cancelled row is reactivated to Confirmed (subject to capacity);
    /// a second row is never created.
    AllowAfterCancellation,
}

impl Default for RebookPolicy {
    fn default() -> Self {
        RebookPolicy::DenyWhileRecordExists
    }
}

/// One user's reservation at one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    id: BookingId,
    event_id: EventId,
    user_id: UserId,
    status: BookingStatus,
    booked_at: Timestamp,
}

impl Booking {
    /// Creates a confirmed booking. Admission control decides whether this
    /// constructor may be called; the aggregate itself holds no capacity
    /// knowledge.
    pub fn confirmed(event_id: EventId, user_id: UserId) -> Self {
        Self {
            id: BookingId::new(),
            event_id,
            user_id,
            status: BookingStatus::Confirmed,
            booked_at: Timestamp::now(),
        }
    }

    /// Reconstitutes a booking from persisted state.
    pub fn from_parts(
        id: BookingId,
        event_id: EventId,
        user_id: UserId,
        status: BookingStatus,
        booked_at: Timestamp,
    ) -> Self {
        Self {
            id,
            event_id,
            user_id,
            status,
            booked_at,
        }
    }

    pub fn id(&self) -> &BookingId {
        &self.id
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn status(&self) -> BookingStatus {
        self.status
    }

    pub fn booked_at(&self) -> &Timestamp {
        &self.booked_at
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    /// Moves the booking to Cancelled. Idempotent.
    pub fn cancel(&mut self) {
        self.status = BookingStatus::Cancelled;
    }

    /// Reactivates a cancelled booking under `AllowAfterCancellation`.
    /// The row keeps its identity; only status and booking date change.
    pub fn reactivate(&mut self) {
        self.status = BookingStatus::Confirmed;
        self.booked_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking() -> Booking {
        Booking::confirmed(EventId::new(), UserId::new("user-1").unwrap())
    }

    #[test]
    fn confirmed_constructor_sets_status() {
        let b = booking();
        assert_eq!(b.status(), BookingStatus::Confirmed);
        assert!(b.is_confirmed());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut b = booking();
        b.cancel();
        b.cancel();
        assert_eq!(b.status(), BookingStatus::Cancelled);
    }

    #[test]
    fn reactivate_keeps_identity() {
        let mut b = booking();
        let id = *b.id();
        b.cancel();
        b.reactivate();
        assert_eq!(b.id(), &id);
        assert!(b.is_confirmed());
    }

    #[test]
    fn status_parses_and_displays() {
        for name in ["PENDING", "CONFIRMED", "CANCELLED"] {
            let status: BookingStatus = name.parse().unwrap();
            assert_eq!(status.to_string(), name);
        }
        assert!("WAITLISTED".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn rebook_policy_defaults_to_observed_behavior() {
        assert_eq!(RebookPolicy::default(), RebookPolicy::DenyWhileRecordExists);
    }

    #[test]
    fn status_serializes_uppercase() {
        let json = serde_json::to_string(&BookingStatus::Confirmed).unwrap();
        assert_eq!(json, "\"CONFIRMED\"");
    }
}
