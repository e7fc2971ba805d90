//! HTTP adapters - axum routers, handlers, and middleware.

pub mod booking;
pub mod error;
pub mod event;
pub mod middleware;

pub use booking::{booking_routes, BookingHandlers};
pub use error::{domain_error_response, ErrorResponse};
pub use event::{event_routes, EventHandlers};
pub use middleware::{auth_middleware, AuthState, OptionalAuth, RequireAuth};
