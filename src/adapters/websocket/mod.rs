//! WebSocket adapters for live calendar updates.
//!
//! Pushes domain events to connected clients as change notifications on
//! two topics, "event.changed" and "booking.changed".
//!
//! # Components
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`hub`] - Topic-keyed broadcast channels
//! - [`handler`] - Axum WebSocket upgrade handler
//! - [`notifier`] - Bridge between the event bus and the hub

pub mod handler;
pub mod hub;
pub mod messages;
pub mod notifier;

pub use handler::{live_handler, live_router, LiveState};
pub use hub::{BroadcastHub, ClientId};
pub use messages::{
    ChangeBroadcast, ChangeMessage, ClientMessage, ConnectedMessage, ErrorMessage, PongMessage,
    ServerMessage, Topic,
};
pub use notifier::{ChangeNotifier, CHANGE_EVENT_TYPES};
