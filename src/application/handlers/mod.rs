//! Command and query handlers.

pub mod booking;
pub mod event;
