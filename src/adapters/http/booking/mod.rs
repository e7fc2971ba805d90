//! HTTP adapter for booking endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::BookingHandlers;
pub use routes::booking_routes;
