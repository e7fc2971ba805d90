//! SubmitBookingHandler - the admission decision and commit protocol.
//!
//! Resolves the event, delegates the duplicate/capacity/insert steps to
//! the store's atomic admission unit, and publishes the commit
//! notification strictly after the transaction commits.

use std::sync::Arc;

use crate::domain::booking::{BookingConfirmed, RebookPolicy};
use crate::domain::foundation::{
    DomainError, ErrorCode, EventId, NotificationId, SerializableDomainEvent, Timestamp, UserId,
};
use crate::ports::{AdmittedBooking, BookingStore, EventPublisher, EventRepository};

/// Command to book a seat at an event.
#[derive(Debug, Clone)]
pub struct SubmitBookingCommand {
    pub event_id: EventId,
    pub user_id: UserId,
}

/// Result of a successful admission.
#[derive(Debug, Clone)]
pub struct SubmitBookingResult {
    pub admitted: AdmittedBooking,
}

/// Handler deciding and committing one booking request.
pub struct SubmitBookingHandler {
    events: Arc<dyn EventRepository>,
    bookings: Arc<dyn BookingStore>,
    publisher: Arc<dyn EventPublisher>,
    rebook_policy: RebookPolicy,
}

impl SubmitBookingHandler {
    pub fn new(
        events: Arc<dyn EventRepository>,
        bookings: Arc<dyn BookingStore>,
        publisher: Arc<dyn EventPublisher>,
        rebook_policy: RebookPolicy,
    ) -> Self {
        Self {
            events,
            bookings,
            publisher,
            rebook_policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitBookingCommand,
    ) -> Result<SubmitBookingResult, DomainError> {
        // 1. Resolve the event.
        let target = self
            .events
            .find_by_id(&cmd.event_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::EventNotFound,
                    format!("Event not found: {}", cmd.event_id),
                )
            })?;

        // 2. Atomic admission: duplicate check, capacity check, insert.
        //    Indivisible per event; no partial writes on failure.
        let admitted = self
            .bookings
            .try_admit(&target.event, &cmd.user_id, self.rebook_policy)
            .await?;

        tracing::info!(
            event_id = %cmd.event_id,
            user_id = %cmd.user_id,
            booking_id = %admitted.booking.id(),
            attendee_count = admitted.attendee_count,
            "Booking admitted"
        );

        // 3. Notify observers, strictly after commit. Delivery is best
        //    effort; a notifier fault must not fail the committed booking.
        let event = BookingConfirmed {
            notification_id: NotificationId::new(),
            booking_id: *admitted.booking.id(),
            booking: admitted.booking.clone(),
            attendee_count: admitted.attendee_count,
            occurred_at: Timestamp::now(),
        };

        let envelope = event.to_envelope().with_user_id(cmd.user_id.to_string());
        if let Err(e) = self.publisher.publish(envelope).await {
            tracing::warn!(
                booking_id = %admitted.booking.id(),
                error = %e,
                "Failed to publish booking.confirmed notification"
            );
        }

        Ok(SubmitBookingResult { admitted })
    }
}
