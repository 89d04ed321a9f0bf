//! WebSocket event stream.

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use tokio::sync::broadcast::error::RecvError;

use crate::state::AppState;

/// `GET /api/events`
///
/// Upgrades to a WebSocket and streams every published event as a JSON text
/// frame of the form `{"event": "<name>", "data": ...}`.
pub async fn subscribe(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let receiver = state.events().subscribe();
    ws.on_upgrade(move |socket| stream_events(socket, receiver))
}

async fn stream_events(
    mut socket: WebSocket,
    mut receiver: tokio::sync::broadcast::Receiver<crate::events::Event>,
) {
    loop {
        let event = match receiver.recv().await {
            Ok(event) => event,
            // A slow client misses events rather than killing the stream
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "event subscriber lagged");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        let frame = event.to_message().to_string();
        if socket.send(Message::Text(frame.into())).await.is_err() {
            break;
        }
    }
}
