//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, event infrastructure, and error
//! types that form the vocabulary of the Seatcal domain.

mod auth;
mod errors;
mod events;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, UserRole};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    DomainEvent, EventEnvelope, EventMetadata, NotificationId, SerializableDomainEvent,
};
pub use ids::{BookingId, EventId, UserId};
pub use timestamp::Timestamp;
