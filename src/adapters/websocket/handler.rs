//! WebSocket upgrade handler for live calendar connections.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection
//! lifecycle:
//! 1. Upgrade to WebSocket
//! 2. Subscribe to both change topics
//! 3. Forward changes and answer pings until disconnect

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::domain::foundation::Timestamp;

use super::hub::{BroadcastHub, ClientId};
use super::messages::{
    ChangeBroadcast, ClientMessage, ConnectedMessage, PongMessage, ServerMessage, Topic,
};

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct LiveState {
    pub hub: Arc<BroadcastHub>,
}

impl LiveState {
    pub fn new(hub: Arc<BroadcastHub>) -> Self {
        Self { hub }
    }
}

/// Handle WebSocket upgrade requests for the live calendar feed.
///
/// Route: `GET /api/live`
pub async fn live_handler(ws: WebSocketUpgrade, State(state): State<LiveState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection.
///
/// Runs for the lifetime of the connection. The subscription happens
/// before the connected message is sent, so a client that observes the
/// handshake is guaranteed to see every change published afterwards.
async fn handle_socket(socket: WebSocket, state: LiveState) {
    let (mut sender, mut receiver) = socket.split();
    let client_id = ClientId::new();

    let mut events_rx = state.hub.subscribe(Topic::EventChanged);
    let mut bookings_rx = state.hub.subscribe(Topic::BookingChanged);

    let connected = ServerMessage::Connected(ConnectedMessage {
        client_id: client_id.to_string(),
        topics: vec![Topic::EventChanged, Topic::BookingChanged],
        timestamp: Timestamp::now().to_rfc3339(),
    });
    if send_message(&mut sender, &connected).await.is_err() {
        return; // Client disconnected immediately
    }

    tracing::debug!(client_id = %client_id, "Live client connected");

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Ok(ClientMessage::Ping) = serde_json::from_str::<ClientMessage>(&text) {
                            let pong = ServerMessage::Pong(PongMessage {
                                timestamp: Timestamp::now().to_rfc3339(),
                            });
                            if send_message(&mut sender, &pong).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(client_id = %client_id, "Live client disconnected");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Binary and protocol ping/pong frames need no reply
                    }
                    Some(Err(e)) => {
                        tracing::debug!(client_id = %client_id, "Receive error: {}", e);
                        break;
                    }
                }
            }
            change = events_rx.recv() => {
                if forward_change(&mut sender, &client_id, change).await.is_err() {
                    break;
                }
            }
            change = bookings_rx.recv() => {
                if forward_change(&mut sender, &client_id, change).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// Forward one broadcast result to the client.
///
/// A lagged receiver skips the dropped messages and continues with the
/// newest; there is no replay.
async fn forward_change(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    client_id: &ClientId,
    change: Result<ChangeBroadcast, RecvError>,
) -> Result<(), ()> {
    match change {
        Ok(change) => send_message(sender, &change.to_server_message())
            .await
            .map_err(|e| {
                tracing::debug!(client_id = %client_id, "Send error, closing connection: {}", e);
            }),
        Err(RecvError::Lagged(skipped)) => {
            tracing::warn!(client_id = %client_id, skipped, "Slow live client missed changes");
            Ok(())
        }
        Err(RecvError::Closed) => Err(()),
    }
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).expect("ServerMessage serialization should not fail");
    sender.send(Message::Text(json)).await
}

/// Create the axum router for the live feed endpoint.
pub fn live_router() -> axum::Router<LiveState> {
    use axum::routing::get;

    axum::Router::new().route("/live", get(live_handler))
}
