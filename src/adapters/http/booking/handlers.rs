//! HTTP handlers for booking endpoints.
//!
//! Every endpoint requires an authenticated caller; bookings are always
//! scoped to the requesting user.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{domain_error_response, ErrorResponse};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::booking::{
    CancelBookingCommand, CancelBookingHandler, ListUserBookingsHandler, ListUserBookingsQuery,
    SubmitBookingCommand, SubmitBookingHandler,
};
use crate::domain::foundation::{BookingId, EventId};

use super::dto::{
    BookingListResponse, BookingResponse, CreateBookingRequest, ListBookingsQuery,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct BookingHandlers {
    submit_handler: Arc<SubmitBookingHandler>,
    cancel_handler: Arc<CancelBookingHandler>,
    list_handler: Arc<ListUserBookingsHandler>,
}

impl BookingHandlers {
    pub fn new(
        submit_handler: Arc<SubmitBookingHandler>,
        cancel_handler: Arc<CancelBookingHandler>,
        list_handler: Arc<ListUserBookingsHandler>,
    ) -> Self {
        Self {
            submit_handler,
            cancel_handler,
            list_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/bookings - Book a seat at an event
pub async fn create_booking(
    State(handlers): State<BookingHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateBookingRequest>,
) -> Response {
    let event_id = match req.event_id.parse::<EventId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid event ID")),
            )
                .into_response()
        }
    };

    let cmd = SubmitBookingCommand {
        event_id,
        user_id: user.id,
    };

    match handlers.submit_handler.handle(cmd).await {
        Ok(result) => {
            let response: BookingResponse = result.admitted.into();
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/bookings - List the caller's bookings with their events
pub async fn list_bookings(
    State(handlers): State<BookingHandlers>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<ListBookingsQuery>,
) -> Response {
    let query = ListUserBookingsQuery {
        user_id: user.id,
        status: query.status,
        upcoming: query.upcoming,
    };

    match handlers.list_handler.handle(query).await {
        Ok(bookings) => {
            let response: BookingListResponse = bookings.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// DELETE /api/bookings/:id - Cancel one of the caller's bookings
pub async fn cancel_booking(
    State(handlers): State<BookingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(booking_id): Path<String>,
) -> Response {
    let booking_id = match booking_id.parse::<BookingId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid booking ID")),
            )
                .into_response()
        }
    };

    let cmd = CancelBookingCommand {
        booking_id,
        user_id: user.id,
    };

    match handlers.cancel_handler.handle(cmd).await {
        Ok(cancelled) => {
            let response: BookingResponse = cancelled.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}
