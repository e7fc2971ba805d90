//! In-memory booking store for tests and local development.
//!
//! Shares the calendar state mutex with `InMemoryEventRepository`, so the
//! duplicate check, the capacity check, and the insert happen under one
//! critical section. That is the whole admission guarantee in this
//! adapter; Postgres gets the same property from a serializable
//! transaction instead.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::booking::{Booking, BookingStatus, RebookPolicy};
use crate::domain::event::Event;
use crate::domain::foundation::{BookingId, DomainError, ErrorCode, EventId, UserId};
use crate::ports::{AdmittedBooking, BookingFilter, BookingStore, BookingWithEvent};

use super::event_repository::InMemoryEventRepository;

/// In-memory `BookingStore` sharing state with the event repository.
pub struct InMemoryBookingStore {
    calendar: Arc<InMemoryEventRepository>,
}

impl InMemoryBookingStore {
    pub fn new(calendar: Arc<InMemoryEventRepository>) -> Self {
        Self { calendar }
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn try_admit(
        &self,
        event: &Event,
        user_id: &UserId,
        policy: RebookPolicy,
    ) -> Result<AdmittedBooking, DomainError> {
        let mut state = self.calendar.lock();

        let existing_id = state
            .bookings
            .values()
            .find(|b| b.event_id() == event.id() && b.user_id() == user_id)
            .map(|b| *b.id());

        if let Some(id) = existing_id {
            let status = state.bookings[&id].status();
            let reactivatable =
                policy == RebookPolicy::AllowAfterCancellation && status == BookingStatus::Cancelled;
            if !reactivatable {
                return Err(DomainError::new(
                    ErrorCode::DuplicateBooking,
                    "You have already booked this event",
                ));
            }

            let confirmed = state.confirmed_count(event.id());
            if confirmed >= event.capacity().get() {
                return Err(DomainError::capacity_exceeded(
                    confirmed,
                    event.capacity().get(),
                ));
            }

            let booking = state
                .bookings
                .get_mut(&id)
                .map(|b| {
                    b.reactivate();
                    b.clone()
                })
                .ok_or_else(|| {
                    DomainError::new(ErrorCode::InternalError, "Booking vanished under lock")
                })?;
            let attendee_count = state.confirmed_count(event.id());
            return Ok(AdmittedBooking {
                booking,
                attendee_count,
            });
        }

        let confirmed = state.confirmed_count(event.id());
        if confirmed >= event.capacity().get() {
            return Err(DomainError::capacity_exceeded(
                confirmed,
                event.capacity().get(),
            ));
        }

        let booking = Booking::confirmed(*event.id(), user_id.clone());
        state.bookings.insert(*booking.id(), booking.clone());
        let attendee_count = state.confirmed_count(event.id());
        Ok(AdmittedBooking {
            booking,
            attendee_count,
        })
    }

    async fn find_by_event_and_user(
        &self,
        event_id: &EventId,
        user_id: &UserId,
    ) -> Result<Option<Booking>, DomainError> {
        let state = self.calendar.lock();
        Ok(state
            .bookings
            .values()
            .find(|b| b.event_id() == event_id && b.user_id() == user_id)
            .cloned())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        Ok(self.calendar.lock().bookings.get(id).cloned())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
        filter: &BookingFilter,
    ) -> Result<Vec<BookingWithEvent>, DomainError> {
        let now = crate::domain::foundation::Timestamp::now();
        let state = self.calendar.lock();

        let mut results: Vec<BookingWithEvent> = state
            .bookings
            .values()
            .filter(|b| b.user_id() == user_id)
            .filter(|b| filter.status.map_or(true, |s| b.status() == s))
            .filter_map(|b| {
                let event = state.events.get(b.event_id())?;
                match filter.upcoming {
                    Some(true) if !event.date().is_after(&now) => return None,
                    Some(false) if event.date().is_after(&now) => return None,
                    _ => {}
                }
                Some(BookingWithEvent {
                    booking: b.clone(),
                    event: state.with_count(event),
                })
            })
            .collect();

        results.sort_by(|a, b| b.booking.booked_at().cmp(a.booking.booked_at()));
        Ok(results)
    }

    async fn mark_cancelled(&self, id: &BookingId) -> Result<AdmittedBooking, DomainError> {
        let mut state = self.calendar.lock();
        let booking = state
            .bookings
            .get_mut(id)
            .map(|b| {
                b.cancel();
                b.clone()
            })
            .ok_or_else(|| {
                DomainError::new(ErrorCode::BookingNotFound, format!("Booking not found: {}", id))
            })?;
        let attendee_count = state.confirmed_count(booking.event_id());
        Ok(AdmittedBooking {
            booking,
            attendee_count,
        })
    }

    async fn count_confirmed(&self, event_id: &EventId) -> Result<u32, DomainError> {
        Ok(self.calendar.lock().confirmed_count(event_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::{Capacity, EventCategory};
    use crate::domain::foundation::Timestamp;
    use crate::ports::EventRepository;

    async fn setup(capacity: u32) -> (Arc<InMemoryEventRepository>, InMemoryBookingStore, Event) {
        let repo = Arc::new(InMemoryEventRepository::new());
        let store = InMemoryBookingStore::new(repo.clone());
        let event = Event::new(
            crate::domain::foundation::EventId::new(),
            "Capacity Test",
            "desc",
            Timestamp::now().plus_days(1),
            "Hall",
            EventCategory::Conference,
            Capacity::new(capacity).unwrap(),
            UserId::new("organizer-1").unwrap(),
        )
        .unwrap();
        repo.save(&event).await.unwrap();
        (repo, store, event)
    }

    fn user(n: usize) -> UserId {
        UserId::new(format!("user-{}", n)).unwrap()
    }

    #[tokio::test]
    async fn admits_until_capacity_then_rejects() {
        let (_repo, store, event) = setup(2).await;

        let a = store
            .try_admit(&event, &user(1), RebookPolicy::default())
            .await
            .unwrap();
        assert_eq!(a.attendee_count, 1);
        let b = store
            .try_admit(&event, &user(2), RebookPolicy::default())
            .await
            .unwrap();
        assert_eq!(b.attendee_count, 2);

        let err = store
            .try_admit(&event, &user(3), RebookPolicy::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CapacityExceeded);
        assert!(err.message.contains("2/2"));
    }

    #[tokio::test]
    async fn duplicate_submission_is_rejected() {
        let (_repo, store, event) = setup(10).await;
        store
            .try_admit(&event, &user(1), RebookPolicy::default())
            .await
            .unwrap();
        let err = store
            .try_admit(&event, &user(1), RebookPolicy::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateBooking);
    }

    #[tokio::test]
    async fn cancelled_row_still_blocks_under_default_policy() {
        let (_repo, store, event) = setup(10).await;
        let admitted = store
            .try_admit(&event, &user(1), RebookPolicy::default())
            .await
            .unwrap();
        store.mark_cancelled(admitted.booking.id()).await.unwrap();

        let err = store
            .try_admit(&event, &user(1), RebookPolicy::DenyWhileRecordExists)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateBooking);
    }

    #[tokio::test]
    async fn rebook_after_cancellation_reactivates_same_row() {
        let (_repo, store, event) = setup(10).await;
        let admitted = store
            .try_admit(&event, &user(1), RebookPolicy::AllowAfterCancellation)
            .await
            .unwrap();
        store.mark_cancelled(admitted.booking.id()).await.unwrap();

        let rebooked = store
            .try_admit(&event, &user(1), RebookPolicy::AllowAfterCancellation)
            .await
            .unwrap();
        assert_eq!(rebooked.booking.id(), admitted.booking.id());
        assert!(rebooked.booking.is_confirmed());
        assert_eq!(rebooked.attendee_count, 1);
    }

    #[tokio::test]
    async fn cancellation_frees_the_seat_for_others() {
        let (_repo, store, event) = setup(1).await;
        let admitted = store
            .try_admit(&event, &user(1), RebookPolicy::default())
            .await
            .unwrap();
        let full = store
            .try_admit(&event, &user(2), RebookPolicy::default())
            .await
            .unwrap_err();
        assert_eq!(full.code, ErrorCode::CapacityExceeded);

        let freed = store.mark_cancelled(admitted.booking.id()).await.unwrap();
        assert_eq!(freed.attendee_count, 0);

        let second = store
            .try_admit(&event, &user(2), RebookPolicy::default())
            .await
            .unwrap();
        assert_eq!(second.attendee_count, 1);
    }

    #[tokio::test]
    async fn repository_count_tracks_admissions() {
        let (repo, store, event) = setup(5).await;
        for i in 0..3 {
            store
                .try_admit(&event, &user(i), RebookPolicy::default())
                .await
                .unwrap();
        }
        let found = repo.find_by_id(event.id()).await.unwrap().unwrap();
        assert_eq!(found.attendee_count, 3);
    }
}
