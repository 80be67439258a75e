//! Viewer connection registry.
//!
//! Each WebSocket session subscribes to the location broadcast and forwards
//! every event as a JSON text frame. The server keeps no per-connection
//! state beyond the subscription itself: dropping the receiver on
//! disconnect is the entire cleanup.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Request, State, WebSocketUpgrade};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracking::model::LocationUpdate;

use crate::http::AppState;

/// The single event name viewers subscribe to for the lifetime of their
/// connection.
const LOCATION_UPDATE_EVENT: &str = "locationUpdate";

#[derive(Debug, Serialize)]
struct WsEvent {
    event: &'static str,
    data: LocationUpdate,
}

/// Gate on the `/ws` route. CORS response headers never block a WebSocket
/// handshake, so the origin allow-list is enforced here, before the
/// upgrade is negotiated.
pub async fn require_allowed_origin(
    State(state): State<AppState>, request: Request, next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN);
    if !origin_allowed(&state.allowed_origins, origin) {
        warn!(origin = ?origin, "viewer origin refused");
        return StatusCode::FORBIDDEN.into_response();
    }
    next.run(request).await
}

fn origin_allowed(allowed: &[String], origin: Option<&HeaderValue>) -> bool {
    if allowed.is_empty() {
        return true;
    }
    origin
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| allowed.iter().any(|entry| entry == value))
}

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut updates = state.broadcast.subscribe();
    info!(viewers = state.broadcast.receiver_count(), "viewer connected");

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(update) => {
                    let frame = WsEvent { event: LOCATION_UPDATE_EVENT, data: update };
                    let Ok(text) = serde_json::to_string(&frame) else {
                        continue;
                    };
                    if socket.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    // Best-effort delivery: a stalled viewer skips ahead
                    // rather than stalling the stream.
                    warn!(missed, "viewer lagging, events dropped");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Viewers send nothing the server acts on.
                Some(Ok(_)) => {}
            },
        }
    }

    drop(updates);
    info!(viewers = state.broadcast.receiver_count(), "viewer disconnected");
}
