//! PostgreSQL adapters - durable implementations of the storage ports.
//!
//! - `PostgresEventRepository` - events with storage-computed counts
//! - `PostgresBookingStore` - bookings with row-locked atomic admission

mod booking_store;
mod event_repository;

pub use booking_store::PostgresBookingStore;
pub use event_repository::PostgresEventRepository;
