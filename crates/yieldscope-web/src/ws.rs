//! `WebSocket` handler for real-time year update streaming.
//!
//! Clients connect to `GET /ws/sessions/{id}` and receive a JSON-encoded
//! [`YearUpdate`] message each time their session's displayed year
//! changes. All sessions share one broadcast channel; the handler drops
//! updates that belong to other sessions before sending.
//!
//! If a client falls behind, lagged messages are silently skipped and
//! the client resumes from the most recent year.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::{debug, warn};
use yieldscope_types::SessionId;

use crate::error::ApiError;
use crate::sessions::parse_session_id;
use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming one session's year updates.
///
/// Unknown session IDs are rejected before the upgrade so the client
/// sees a plain 404 instead of an immediately closed socket.
///
/// # Route
///
/// `GET /ws/sessions/{id}`
pub async fn ws_session(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_session_id(&id)?;
    if !state.sessions.read().await.contains_key(&id) {
        return Err(ApiError::NotFound(format!("session {id} not found")));
    }
    Ok(ws.on_upgrade(move |socket| handle_ws(socket, state, id)))
}

/// Handle the `WebSocket` lifecycle: subscribe to the broadcast
/// channel and forward the session's updates as text frames.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>, id: SessionId) {
    debug!(session = %id, "WebSocket client connected");

    let mut rx = state.subscribe();

    loop {
        tokio::select! {
            // Receive a year update from any session.
            result = rx.recv() => {
                match result {
                    Ok(update) => {
                        if update.session_id != id {
                            continue;
                        }
                        let json = match serde_json::to_string(&update) {
                            Ok(j) => j,
                            Err(e) => {
                                warn!("Failed to serialize year update: {e}");
                                continue;
                            }
                        };
                        let msg: Message = Message::Text(json.into());
                        if socket.send(msg).await.is_err() {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            // Check if the client sent a close frame or disconnected.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let pong = Message::Pong(data);
                        if socket.send(pong).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {
                        // Ignore other message types (text, binary from client).
                    }
                }
            }
        }
    }
}
