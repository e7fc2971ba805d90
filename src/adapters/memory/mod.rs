//! In-memory adapters for tests and local development.

mod booking_store;
mod event_repository;

pub use booking_store::InMemoryBookingStore;
pub use event_repository::InMemoryEventRepository;
