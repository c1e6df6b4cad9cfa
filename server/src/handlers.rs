use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use sketchboard_shared::{decode_binary, decode_text, encode_binary, DrawEvent, WireError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::logic::{broadcast_except, sanitize_event};
use crate::state::{AppState, PEER_QUEUE};

pub async fn ping_handler() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// `Ok(None)` for frames that carry no event (ping, pong, close).
fn decode_frame(message: &Message) -> Result<Option<DrawEvent>, WireError> {
    match message {
        Message::Text(text) => decode_text(text).map(Some),
        Message::Binary(data) => decode_binary(data).map(Some),
        _ => Ok(None),
    }
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut socket_sender, mut socket_receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<DrawEvent>(PEER_QUEUE);
    let connection_id = Uuid::new_v4();

    let peers = state.join(connection_id, tx).await;
    info!(conn = %connection_id, peers, "peer connected");

    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match encode_binary(&event) {
                Ok(payload) => {
                    if socket_sender.send(Message::Binary(payload)).await.is_err() {
                        break;
                    }
                }
                Err(error) => warn!(%error, event = event.name(), "encode failed"),
            }
        }
    });

    let mut close_frame = None;

    while let Some(Ok(message)) = socket_receiver.next().await {
        if let Message::Close(frame) = message {
            close_frame = frame;
            break;
        }
        let event = match decode_frame(&message) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(error) => {
                warn!(conn = %connection_id, %error, "dropping undecodable frame");
                continue;
            }
        };
        let name = event.name();
        match sanitize_event(event) {
            Some(event) => broadcast_except(&state, connection_id, event).await,
            None => debug!(conn = %connection_id, event = name, "dropping non-finite event"),
        }
    }

    let peers = state.leave(connection_id).await;
    send_task.abort();
    match &close_frame {
        Some(frame) => info!(
            conn = %connection_id,
            peers,
            code = frame.code,
            reason = %frame.reason,
            "peer disconnected"
        ),
        None => info!(conn = %connection_id, peers, "peer disconnected"),
    }
}
