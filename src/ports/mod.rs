//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `EventRepository` - Event aggregate persistence and calendar queries
//! - `BookingStore` - Booking persistence plus the atomic admission unit
//! - `EventPublisher` / `EventSubscriber` / `EventHandler` - event bus
//! - `TokenValidator` - bearer token verification

mod booking_store;
mod event_publisher;
mod event_repository;
mod event_subscriber;
mod token_validator;

pub use booking_store::{AdmittedBooking, BookingFilter, BookingStore, BookingWithEvent};
pub use event_publisher::EventPublisher;
pub use event_repository::{EventFilter, EventRepository, EventWithCount};
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use token_validator::TokenValidator;
