//! HTTP routes for booking endpoints.

use axum::{
    routing::{delete, post},
    Router,
};

use super::handlers::{cancel_booking, create_booking, list_bookings, BookingHandlers};

/// Creates the booking router with all endpoints.
pub fn booking_routes(handlers: BookingHandlers) -> Router {
    Router::new()
        .route("/", post(create_booking).get(list_bookings))
        .route("/:id", delete(cancel_booking))
        .with_state(handlers)
}
