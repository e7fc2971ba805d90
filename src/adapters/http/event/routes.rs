//! HTTP routes for event endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_event, get_event, list_events, update_event, EventHandlers};

/// Creates the event router with all endpoints.
pub fn event_routes(handlers: EventHandlers) -> Router {
    Router::new()
        .route("/", post(create_event).get(list_events))
        .route("/:id", get(get_event).put(update_event))
        .with_state(handlers)
}
