//! CancelBookingHandler - owner-only cancellation.
//!
//! Cancellation does not free the unique (event, user) slot under the
//! default rebook policy; it only releases the seat for other users.

use std::sync::Arc;

use crate::domain::booking::BookingCancelled;
use crate::domain::foundation::{
    BookingId, DomainError, ErrorCode, NotificationId, SerializableDomainEvent, Timestamp, UserId,
};
use crate::ports::{AdmittedBooking, BookingStore, EventPublisher};

/// Command to cancel one of the caller's bookings.
#[derive(Debug, Clone)]
pub struct CancelBookingCommand {
    pub booking_id: BookingId,
    pub user_id: UserId,
}

/// Handler for booking cancellation.
pub struct CancelBookingHandler {
    bookings: Arc<dyn BookingStore>,
    publisher: Arc<dyn EventPublisher>,
}

impl CancelBookingHandler {
    pub fn new(bookings: Arc<dyn BookingStore>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            bookings,
            publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CancelBookingCommand,
    ) -> Result<AdmittedBooking, DomainError> {
        let booking = self
            .bookings
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::BookingNotFound,
                    format!("Booking not found: {}", cmd.booking_id),
                )
            })?;

        if booking.user_id() != &cmd.user_id {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Not authorized to cancel this booking",
            ));
        }

        let cancelled = self.bookings.mark_cancelled(&cmd.booking_id).await?;

        tracing::info!(
            booking_id = %cmd.booking_id,
            user_id = %cmd.user_id,
            attendee_count = cancelled.attendee_count,
            "Booking cancelled"
        );

        let event = BookingCancelled {
            notification_id: NotificationId::new(),
            booking_id: *cancelled.booking.id(),
            booking: cancelled.booking.clone(),
            attendee_count: cancelled.attendee_count,
            occurred_at: Timestamp::now(),
        };
        let envelope = event.to_envelope().with_user_id(cmd.user_id.to_string());
        if let Err(e) = self.publisher.publish(envelope).await {
            tracing::warn!(
                booking_id = %cmd.booking_id,
                error = %e,
                "Failed to publish booking.cancelled notification"
            );
        }

        Ok(cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::{InMemoryBookingStore, InMemoryEventRepository};
    use crate::domain::booking::{BookingStatus, RebookPolicy};
    use crate::domain::event::{Capacity, Event, EventCategory};
    use crate::domain::foundation::EventId;
    use crate::ports::EventRepository;

    async fn setup() -> (
        Arc<InMemoryBookingStore>,
        Arc<InMemoryEventBus>,
        Event,
        UserId,
    ) {
        let events = Arc::new(InMemoryEventRepository::new());
        let store = Arc::new(InMemoryBookingStore::new(events.clone()));
        let bus = Arc::new(InMemoryEventBus::new());

        let event = Event::new(
            EventId::new(),
            "Seminar",
            "Deep dive",
            Timestamp::now().plus_days(5),
            "Room 12",
            EventCategory::Seminar,
            Capacity::new(5).unwrap(),
            UserId::new("organizer-1").unwrap(),
        )
        .unwrap();
        events.save(&event).await.unwrap();

        (store, bus, event, UserId::new("user-1").unwrap())
    }

    #[tokio::test]
    async fn owner_cancels_and_seat_is_released() {
        let (store, bus, event, user) = setup().await;
        let admitted = store
            .try_admit(&event, &user, RebookPolicy::default())
            .await
            .unwrap();

        let handler = CancelBookingHandler::new(store.clone(), bus.clone());
        let cancelled = handler
            .handle(CancelBookingCommand {
                booking_id: *admitted.booking.id(),
                user_id: user,
            })
            .await
            .unwrap();

        assert_eq!(cancelled.booking.status(), BookingStatus::Cancelled);
        assert_eq!(cancelled.attendee_count, 0);
        assert!(bus.has_event("booking.cancelled.v1"));
    }

    #[tokio::test]
    async fn non_owner_is_forbidden() {
        let (store, bus, event, user) = setup().await;
        let admitted = store
            .try_admit(&event, &user, RebookPolicy::default())
            .await
            .unwrap();

        let handler = CancelBookingHandler::new(store, bus.clone());
        let result = handler
            .handle(CancelBookingCommand {
                booking_id: *admitted.booking.id(),
                user_id: UserId::new("intruder").unwrap(),
            })
            .await;

        assert_eq!(result.unwrap_err().code, ErrorCode::Forbidden);
        assert!(!bus.has_event("booking.cancelled.v1"));
    }

    #[tokio::test]
    async fn missing_booking_is_not_found() {
        let (store, bus, _event, user) = setup().await;
        let handler = CancelBookingHandler::new(store, bus);
        let result = handler
            .handle(CancelBookingCommand {
                booking_id: BookingId::new(),
                user_id: user,
            })
            .await;
        assert_eq!(result.unwrap_err().code, ErrorCode::BookingNotFound);
    }
}
