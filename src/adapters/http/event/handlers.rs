//! HTTP handlers for event endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{domain_error_response, ErrorResponse};
use crate::adapters::http::middleware::{OptionalAuth, RequireAuth};
use crate::application::handlers::event::{
    CreateEventCommand, CreateEventHandler, GetEventHandler, ListEventsHandler,
    UpdateEventCommand, UpdateEventHandler,
};
use crate::domain::event::{Capacity, EventUpdate};
use crate::domain::foundation::{EventId, Timestamp};
use crate::ports::BookingStore;

use super::dto::{
    CreateEventRequest, EventListResponse, EventResponse, ListEventsQuery, UpdateEventRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct EventHandlers {
    create_handler: Arc<CreateEventHandler>,
    update_handler: Arc<UpdateEventHandler>,
    list_handler: Arc<ListEventsHandler>,
    get_handler: Arc<GetEventHandler>,
    /// Used to flag `is_booked` on single-event reads for callers.
    bookings: Arc<dyn BookingStore>,
}

impl EventHandlers {
    pub fn new(
        create_handler: Arc<CreateEventHandler>,
        update_handler: Arc<UpdateEventHandler>,
        list_handler: Arc<ListEventsHandler>,
        get_handler: Arc<GetEventHandler>,
        bookings: Arc<dyn BookingStore>,
    ) -> Self {
        Self {
            create_handler,
            update_handler,
            list_handler,
            get_handler,
            bookings,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/events - Create a new event
pub async fn create_event(
    State(handlers): State<EventHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateEventRequest>,
) -> Response {
    let cmd = CreateEventCommand {
        organizer_id: user.id,
        title: req.title,
        description: req.description,
        date: Timestamp::from_datetime(req.date),
        location: req.location,
        category: req.category,
        capacity: req.capacity,
    };

    match handlers.create_handler.handle(cmd).await {
        Ok(event) => {
            let response: EventResponse = crate::ports::EventWithCount {
                event,
                attendee_count: 0,
            }
            .into();
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/events - List events matching calendar filters
pub async fn list_events(
    State(handlers): State<EventHandlers>,
    Query(query): Query<ListEventsQuery>,
) -> Response {
    match handlers.list_handler.handle(query.into()).await {
        Ok(events) => {
            let response: EventListResponse = events.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/events/:id - Get one event with its attendee count
pub async fn get_event(
    State(handlers): State<EventHandlers>,
    OptionalAuth(user): OptionalAuth,
    Path(event_id): Path<String>,
) -> Response {
    let event_id = match event_id.parse::<EventId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid event ID")),
            )
                .into_response()
        }
    };

    match handlers.get_handler.handle(event_id).await {
        Ok(found) => {
            let mut response: EventResponse = found.into();
            if let Some(user) = user {
                match handlers
                    .bookings
                    .find_by_event_and_user(&event_id, &user.id)
                    .await
                {
                    Ok(booking) => {
                        response = response
                            .with_is_booked(booking.map(|b| b.is_confirmed()).unwrap_or(false));
                    }
                    Err(e) => {
                        tracing::warn!(event_id = %event_id, error = %e, "Booking lookup failed");
                    }
                }
            }
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// PUT /api/events/:id - Update an event (organizer only)
pub async fn update_event(
    State(handlers): State<EventHandlers>,
    RequireAuth(user): RequireAuth,
    Path(event_id): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> Response {
    let event_id = match event_id.parse::<EventId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid event ID")),
            )
                .into_response()
        }
    };

    let capacity = match req.capacity.map(Capacity::new).transpose() {
        Ok(capacity) => capacity,
        Err(e) => return domain_error_response(e.into()),
    };

    let cmd = UpdateEventCommand {
        event_id,
        user_id: user.id,
        update: EventUpdate {
            title: req.title,
            description: req.description,
            date: req.date.map(Timestamp::from_datetime),
            location: req.location,
            category: req.category,
            capacity,
        },
    };

    match handlers.update_handler.handle(cmd).await {
        Ok(event) => {
            // Count is unchanged by metadata updates; refetch for accuracy.
            let event_id = *event.id();
            match handlers.get_handler.handle(event_id).await {
                Ok(found) => {
                    let response: EventResponse = found.into();
                    (StatusCode::OK, Json(response)).into_response()
                }
                Err(e) => domain_error_response(e),
            }
        }
        Err(e) => domain_error_response(e),
    }
}
