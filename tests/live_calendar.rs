//! Live calendar fan-out and client reconciliation, wired end to end
//! over the in-memory adapters.

use std::sync::Arc;

use async_trait::async_trait;

use seatcal::adapters::events::InMemoryEventBus;
use seatcal::adapters::memory::{InMemoryBookingStore, InMemoryEventRepository};
use seatcal::adapters::websocket::{BroadcastHub, ChangeNotifier, Topic};
use seatcal::application::handlers::booking::{SubmitBookingCommand, SubmitBookingHandler};
use seatcal::application::handlers::event::{ListEventsHandler, UpdateEventCommand, UpdateEventHandler};
use seatcal::client::{BookingApi, BookingRecord, EventSnapshot, IntentState, QueryCache, Reconciler};
use seatcal::domain::booking::RebookPolicy;
use seatcal::domain::event::{Capacity, Event, EventCategory, EventUpdate};
use seatcal::domain::foundation::{DomainError, EventId, Timestamp, UserId};
use seatcal::ports::{BookingStore, EventFilter, EventRepository};

struct Backend {
    repo: Arc<InMemoryEventRepository>,
    store: Arc<InMemoryBookingStore>,
    bus: Arc<InMemoryEventBus>,
    hub: Arc<BroadcastHub>,
}

async fn backend() -> Backend {
    let repo = Arc::new(InMemoryEventRepository::new());
    let store = Arc::new(InMemoryBookingStore::new(repo.clone()));
    let bus = Arc::new(InMemoryEventBus::new());
    let hub = Arc::new(BroadcastHub::with_default_capacity());
    let notifier = ChangeNotifier::new_shared(hub.clone());
    notifier.register(bus.as_ref());
    Backend {
        repo,
        store,
        bus,
        hub,
    }
}

async fn seed_event(repo: &InMemoryEventRepository, capacity: u32) -> Event {
    let event = Event::new(
        EventId::new(),
        "Live Coding Night",
        "Bring a laptop",
        Timestamp::now().plus_days(10),
        "Studio B",
        EventCategory::Workshop,
        Capacity::new(capacity).unwrap(),
        UserId::new("organizer-1").unwrap(),
    )
    .unwrap();
    repo.save(&event).await.unwrap();
    event
}

#[tokio::test]
async fn commit_time_observers_receive_booking_changes() {
    let b = backend().await;
    let event = seed_event(&b.repo, 5).await;

    // Subscribed before the commit.
    let mut rx = b.hub.subscribe(Topic::BookingChanged);

    let handler = SubmitBookingHandler::new(
        b.repo.clone(),
        b.store.clone(),
        b.bus.clone(),
        RebookPolicy::default(),
    );
    handler
        .handle(SubmitBookingCommand {
            event_id: *event.id(),
            user_id: UserId::new("alice").unwrap(),
        })
        .await
        .unwrap();

    let change = rx.recv().await.unwrap();
    assert_eq!(change.topic, Topic::BookingChanged);
    assert_eq!(change.event_type, "booking.confirmed.v1");
    assert_eq!(change.data["attendee_count"], 1);
    assert_eq!(change.data["booking"]["status"], "CONFIRMED");

    // Joined after the commit: no backlog, no replay.
    let mut late = b.hub.subscribe(Topic::BookingChanged);
    assert!(late.try_recv().is_err());
}

#[tokio::test]
async fn event_updates_land_on_the_event_topic_only() {
    let b = backend().await;
    let event = seed_event(&b.repo, 5).await;

    let mut events_rx = b.hub.subscribe(Topic::EventChanged);
    let mut bookings_rx = b.hub.subscribe(Topic::BookingChanged);

    let handler = UpdateEventHandler::new(b.repo.clone(), b.bus.clone());
    handler
        .handle(UpdateEventCommand {
            event_id: *event.id(),
            user_id: UserId::new("organizer-1").unwrap(),
            update: EventUpdate {
                location: Some("Studio C".to_string()),
                ..Default::default()
            },
        })
        .await
        .unwrap();

    let change = events_rx.recv().await.unwrap();
    assert_eq!(change.event_type, "event.updated.v1");
    assert_eq!(change.data["event"]["location"], "Studio C");
    assert!(bookings_rx.try_recv().is_err());
}

#[tokio::test]
async fn rejected_submission_publishes_nothing() {
    let b = backend().await;
    let event = seed_event(&b.repo, 1).await;

    let handler = SubmitBookingHandler::new(
        b.repo.clone(),
        b.store.clone(),
        b.bus.clone(),
        RebookPolicy::default(),
    );
    handler
        .handle(SubmitBookingCommand {
            event_id: *event.id(),
            user_id: UserId::new("alice").unwrap(),
        })
        .await
        .unwrap();

    let mut rx = b.hub.subscribe(Topic::BookingChanged);
    let result = handler
        .handle(SubmitBookingCommand {
            event_id: *event.id(),
            user_id: UserId::new("bob").unwrap(),
        })
        .await;

    assert!(result.is_err());
    assert!(rx.try_recv().is_err());
}

// ════════════════════════════════════════════════════════════════════════════
// Client reconciliation against the live backend
// ════════════════════════════════════════════════════════════════════════════

/// `BookingApi` implemented directly over the application handlers, so
/// the client loop runs against real admission semantics.
struct InProcessApi {
    submit: SubmitBookingHandler,
    list: ListEventsHandler,
    bookings: Arc<InMemoryBookingStore>,
    user: UserId,
}

impl InProcessApi {
    fn new(b: &Backend, user: UserId) -> Self {
        Self {
            submit: SubmitBookingHandler::new(
                b.repo.clone(),
                b.store.clone(),
                b.bus.clone(),
                RebookPolicy::default(),
            ),
            list: ListEventsHandler::new(b.repo.clone()),
            bookings: b.store.clone(),
            user,
        }
    }
}

#[async_trait]
impl BookingApi for InProcessApi {
    async fn submit_booking(&self, event_id: &EventId) -> Result<BookingRecord, DomainError> {
        let result = self
            .submit
            .handle(SubmitBookingCommand {
                event_id: *event_id,
                user_id: self.user.clone(),
            })
            .await?;
        Ok(BookingRecord {
            booking_id: *result.admitted.booking.id(),
            event_id: *event_id,
            attendee_count: result.admitted.attendee_count,
            booked_at: *result.admitted.booking.booked_at(),
        })
    }

    async fn fetch_events(&self, filter: &EventFilter) -> Result<Vec<EventSnapshot>, DomainError> {
        let events = self.list.handle(filter.clone()).await?;
        let mut snapshots = Vec::with_capacity(events.len());
        for ec in events {
            let booking = self
                .bookings
                .find_by_event_and_user(ec.event.id(), &self.user)
                .await?;
            snapshots.push(EventSnapshot {
                event_id: *ec.event.id(),
                title: ec.event.title().to_string(),
                date: *ec.event.date(),
                location: ec.event.location().to_string(),
                category: ec.event.category(),
                capacity: ec.event.capacity().get(),
                attendee_count: ec.attendee_count,
                is_booked: booking.as_ref().map(|b| b.is_confirmed()).unwrap_or(false),
                booking_id: booking.map(|b| *b.id()),
            });
        }
        Ok(snapshots)
    }
}

#[tokio::test]
async fn reconciler_converges_on_committed_booking() {
    let b = backend().await;
    let event = seed_event(&b.repo, 3).await;

    // Another attendee is already in.
    b.store
        .try_admit(&event, &UserId::new("bob").unwrap(), RebookPolicy::default())
        .await
        .unwrap();

    let cache = Arc::new(QueryCache::new());
    let api = Arc::new(InProcessApi::new(&b, UserId::new("alice").unwrap()));
    let reconciler = Reconciler::new(cache.clone(), api);
    let filter = EventFilter::default();

    reconciler.refetch(&filter).await;
    let key = filter.signature();
    assert_eq!(cache.get(&key).unwrap()[0].attendee_count, 1);

    let outcome = reconciler.mutate(&filter, event.id()).await;
    assert_eq!(outcome.state, IntentState::Committed);

    // Cache matches server truth after the post-commit refetch.
    let cached = cache.get(&key).unwrap();
    assert_eq!(cached[0].attendee_count, 2);
    assert!(cached[0].is_booked);
    assert_eq!(
        cached[0].booking_id,
        Some(outcome.record.unwrap().booking_id)
    );
    assert_eq!(b.store.count_confirmed(event.id()).await.unwrap(), 2);
}

#[tokio::test]
async fn reconciler_rolls_back_on_full_event() {
    let b = backend().await;
    let event = seed_event(&b.repo, 1).await;
    b.store
        .try_admit(&event, &UserId::new("bob").unwrap(), RebookPolicy::default())
        .await
        .unwrap();

    let cache = Arc::new(QueryCache::new());
    let api = Arc::new(InProcessApi::new(&b, UserId::new("alice").unwrap()));
    let reconciler = Reconciler::new(cache.clone(), api);
    let filter = EventFilter::default();

    reconciler.refetch(&filter).await;
    let key = filter.signature();
    let before = cache.get(&key).unwrap();

    let outcome = reconciler.mutate(&filter, event.id()).await;
    assert_eq!(outcome.state, IntentState::RolledBack);
    assert_eq!(
        outcome.error.unwrap().code,
        seatcal::domain::foundation::ErrorCode::CapacityExceeded
    );

    assert_eq!(cache.get(&key).unwrap(), before);
    assert_eq!(b.store.count_confirmed(event.id()).await.unwrap(), 1);
}
