//! WebSocket message types for live calendar updates.
//!
//! Defines the protocol between server and connected clients:
//! - Server → Client: Connection status, change notifications, errors, pongs
//! - Client → Server: Pings

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Timestamp;

/// The two change topics the notifier fans out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// An event record was created or updated.
    #[serde(rename = "event.changed")]
    EventChanged,

    /// A booking record was confirmed or cancelled.
    #[serde(rename = "booking.changed")]
    BookingChanged,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::EventChanged => "event.changed",
            Topic::BookingChanged => "booking.changed",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established and subscribed to both topics.
    Connected(ConnectedMessage),

    /// A record changed on the server.
    #[serde(rename = "change.notification")]
    Change(ChangeMessage),

    /// Error occurred.
    Error(ErrorMessage),

    /// Heartbeat response.
    Pong(PongMessage),
}

/// Sent when a client successfully connects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub client_id: String,
    pub topics: Vec<Topic>,
    pub timestamp: String,
}

/// Change notification carrying the full updated record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMessage {
    pub topic: Topic,
    /// Originating domain event type, e.g. "booking.confirmed.v1".
    pub event_type: String,
    pub data: serde_json::Value,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// Error message sent to client.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    pub timestamp: String,
}

/// Heartbeat response.
#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Heartbeat request.
    Ping,
}

// ============================================
// Internal Types
// ============================================

/// Internal representation of a change for broadcasting.
///
/// This is what the notifier creates and hands to the hub.
#[derive(Debug, Clone)]
pub struct ChangeBroadcast {
    pub topic: Topic,
    pub event_type: String,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
    pub correlation_id: Option<String>,
}

impl ChangeBroadcast {
    /// Convert to a server message for sending to clients.
    pub fn to_server_message(self) -> ServerMessage {
        ServerMessage::Change(ChangeMessage {
            topic: self.topic,
            event_type: self.event_type,
            data: self.data,
            timestamp: self.timestamp.to_rfc3339(),
            correlation_id: self.correlation_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_serializes_with_type_tag() {
        let msg = ServerMessage::Connected(ConnectedMessage {
            client_id: "client-456".to_string(),
            topics: vec![Topic::EventChanged, Topic::BookingChanged],
            timestamp: "2025-01-10T00:00:00Z".to_string(),
        });

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"connected""#));
        assert!(json.contains(r#""clientId":"client-456""#));
        assert!(json.contains(r#""event.changed""#));
    }

    #[test]
    fn change_message_serializes_correctly() {
        let msg = ServerMessage::Change(ChangeMessage {
            topic: Topic::BookingChanged,
            event_type: "booking.confirmed.v1".to_string(),
            data: serde_json::json!({"status": "CONFIRMED"}),
            timestamp: "2025-01-10T00:00:00Z".to_string(),
            correlation_id: Some("req-789".to_string()),
        });

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"change.notification""#));
        assert!(json.contains(r#""topic":"booking.changed""#));
        assert!(json.contains(r#""eventType":"booking.confirmed.v1""#));
    }

    #[test]
    fn client_message_deserializes_ping() {
        let json = r#"{"type": "ping"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn change_broadcast_converts_to_server_message() {
        let broadcast = ChangeBroadcast {
            topic: Topic::EventChanged,
            event_type: "event.updated.v1".to_string(),
            data: serde_json::json!({"title": "Rust Meetup"}),
            timestamp: Timestamp::now(),
            correlation_id: None,
        };

        let msg = broadcast.to_server_message();
        assert!(matches!(msg, ServerMessage::Change(_)));
    }

    #[test]
    fn topic_displays_wire_name() {
        assert_eq!(Topic::EventChanged.to_string(), "event.changed");
        assert_eq!(Topic::BookingChanged.to_string(), "booking.changed");
    }
}
