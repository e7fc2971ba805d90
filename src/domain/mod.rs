//! Domain layer - aggregates, value objects, and domain events.

pub mod booking;
pub mod event;
pub mod foundation;
