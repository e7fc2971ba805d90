//! Adapters - infrastructure implementations of the ports.
//!
//! `memory` and `events::InMemoryEventBus` back the test suite and
//! single-process deployments; `postgres` is the durable production
//! store; `websocket` carries change notifications to connected
//! observers.

pub mod auth;
pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod websocket;
