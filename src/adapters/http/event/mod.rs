//! HTTP adapter for event endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::EventHandlers;
pub use routes::event_routes;
