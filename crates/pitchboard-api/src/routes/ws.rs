//! WebSocket endpoint for live dashboards.
//!
//! On upgrade the connection is registered (optionally filtered to one
//! round via `?round=<uuid>`), greeted with a `welcome` event, and then
//! served from its bounded event queue. Inbound messages are informational:
//! recognized types are logged, everything else is logged and dropped.

use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::get;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use pitchboard_realtime::{ClientMessage, LiveEvent};

use crate::state::AppState;

/// Query parameters accepted on the upgrade request.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Optional round subscription filter; absent means all events.
    pub round: Option<Uuid>,
}

/// GET /ws
#[instrument(skip(state, ws))]
async fn ws_upgrade(
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(state, socket, params.round))
}

async fn send_event(sink: &mut SplitSink<WebSocket, Message>, event: &LiveEvent) -> bool {
    match serde_json::to_string(event) {
        Ok(text) => sink.send(Message::Text(text.into())).await.is_ok(),
        Err(err) => {
            warn!(error = %err, "dropping unencodable live event");
            true
        }
    }
}

async fn read_client_messages(connection_id: Uuid, mut stream: SplitStream<WebSocket>) {
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => match ClientMessage::parse(text.as_str()) {
                Some(ClientMessage::ReadyForScoring) => {
                    info!(connection_id = %connection_id, "client ready for scoring");
                }
                Some(ClientMessage::CustomEvent { data }) => {
                    info!(connection_id = %connection_id, ?data, "custom client event");
                }
                None => {
                    // Malformed or unrecognized payloads never disconnect
                    // the sender.
                    warn!(connection_id = %connection_id, "dropping unrecognized client message");
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                debug!(connection_id = %connection_id, error = %err, "client transport error");
                break;
            }
        }
    }
}

async fn handle_socket(state: AppState, socket: WebSocket, round: Option<Uuid>) {
    let (connection_id, mut events) = state.registry.register(round).await;
    let (mut sink, stream) = socket.split();

    // Handshake: the welcome event opens the connection for delivery.
    let welcome = LiveEvent::Welcome {
        connection_id,
        message: "Welcome to the Pitchboard live feed".to_owned(),
    };
    if !send_event(&mut sink, &welcome).await {
        state.registry.unregister(connection_id).await;
        return;
    }
    state.registry.mark_open(connection_id).await;
    info!(connection_id = %connection_id, ?round, "dashboard connected");

    let mut reader = tokio::spawn(read_client_messages(connection_id, stream));

    loop {
        tokio::select! {
            // The client went away or errored; stop serving it.
            _ = &mut reader => break,
            event = events.recv() => match event {
                Some(event) => {
                    if !send_event(&mut sink, &event).await {
                        break;
                    }
                }
                // Queue closed: the registry evicted this connection.
                None => break,
            },
        }
    }

    reader.abort();
    state.registry.unregister(connection_id).await;
    info!(connection_id = %connection_id, "dashboard disconnected");
}

/// Returns the WebSocket router.
pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(ws_upgrade))
}
