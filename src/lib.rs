//! Seatcal - Capacity-limited event booking with a live shared calendar.
//!
//! The server side enforces admission control (capacity and one booking
//! per user per event) and fans committed changes out to every connected
//! observer. The `client` module implements the optimistic cache that
//! keeps a local calendar view consistent with eventual server truth.

pub mod adapters;
pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod ports;
