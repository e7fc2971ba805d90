//! In-memory event repository for tests and local development.
//!
//! Events and bookings share one mutex so derived attendee counts are
//! always read from the same state the admission path writes. Production
//! deployments use the Postgres adapters instead.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::event::Event;
use crate::domain::foundation::{BookingId, DomainError, ErrorCode, EventId};
use crate::ports::{EventFilter, EventRepository, EventWithCount};

/// Shared calendar state behind a single lock.
///
/// The booking store locks the same state, which is what makes its
/// admission sequence indivisible in this adapter.
#[derive(Default)]
pub(super) struct CalendarState {
    pub(super) events: HashMap<EventId, Event>,
    pub(super) bookings: HashMap<BookingId, Booking>,
}

impl CalendarState {
    pub(super) fn confirmed_count(&self, event_id: &EventId) -> u32 {
        self.bookings
            .values()
            .filter(|b| b.event_id() == event_id && b.status() == BookingStatus::Confirmed)
            .count() as u32
    }

    pub(super) fn with_count(&self, event: &Event) -> EventWithCount {
        EventWithCount {
            event: event.clone(),
            attendee_count: self.confirmed_count(event.id()),
        }
    }
}

/// In-memory `EventRepository` backed by a `HashMap`.
///
/// # Panics
///
/// Methods panic if the internal lock is poisoned. Acceptable for test
/// code; do not use in production.
#[derive(Default)]
pub struct InMemoryEventRepository {
    state: Mutex<CalendarState>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, CalendarState> {
        self.state
            .lock()
            .expect("InMemoryEventRepository: state lock poisoned")
    }
}

fn matches(filter: &EventFilter, event: &Event) -> bool {
    if let Some(category) = filter.category {
        if event.category() != category {
            return false;
        }
    }
    if let Some(location) = &filter.location {
        if !event
            .location()
            .to_lowercase()
            .contains(&location.to_lowercase())
        {
            return false;
        }
    }
    if let Some(start) = &filter.start_date {
        if event.date().is_before(start) {
            return false;
        }
    }
    if let Some(end) = &filter.end_date {
        if event.date().is_after(end) {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let hit = event.title().to_lowercase().contains(&needle)
            || event.description().to_lowercase().contains(&needle)
            || event.location().to_lowercase().contains(&needle);
        if !hit {
            return false;
        }
    }
    true
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn save(&self, event: &Event) -> Result<(), DomainError> {
        self.lock().events.insert(*event.id(), event.clone());
        Ok(())
    }

    async fn update(&self, event: &Event) -> Result<(), DomainError> {
        let mut state = self.lock();
        if !state.events.contains_key(event.id()) {
            return Err(DomainError::new(
                ErrorCode::EventNotFound,
                format!("Event not found: {}", event.id()),
            ));
        }
        state.events.insert(*event.id(), event.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<EventWithCount>, DomainError> {
        let state = self.lock();
        Ok(state.events.get(id).map(|event| state.with_count(event)))
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<EventWithCount>, DomainError> {
        let state = self.lock();
        let mut results: Vec<EventWithCount> = state
            .events
            .values()
            .filter(|event| matches(filter, event))
            .map(|event| state.with_count(event))
            .collect();
        results.sort_by_key(|ec| *ec.event.date());
        Ok(results)
    }

    async fn delete(&self, id: &EventId) -> Result<(), DomainError> {
        let mut state = self.lock();
        state.events.remove(id);
        // Cascade, mirroring the foreign key in the Postgres schema.
        state.bookings.retain(|_, b| b.event_id() != id);
        Ok(())
    }
}
