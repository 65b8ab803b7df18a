//! `/ws`: live text channel. Every inbound text frame is rebroadcast to all
//! connected peers, including the sender. Pings are answered by the
//! WebSocket layer itself.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use crate::server::api::AppState;

pub async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (conn_id, mut outbound) = state.broadcaster.connect().await;
    state.metrics.ws_connections.inc();
    info!(connection = %conn_id, "WebSocket connected");

    let (mut ws_sender, mut ws_receiver) = socket.split();

    let send_task = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let report = state.broadcaster.broadcast(text.as_str()).await;
                state.metrics.ws_messages_broadcast.inc();
                debug!(
                    connection = %conn_id,
                    chars = text.as_str().len(),
                    delivered = report.delivered,
                    dropped = report.dropped,
                    closed = report.closed,
                    "Broadcast"
                );
            }
            Ok(Message::Close(_)) => break,
            Err(e) => {
                warn!(connection = %conn_id, "WebSocket error: {e}");
                break;
            }
            _ => {}
        }
    }

    state.broadcaster.disconnect(conn_id).await;
    state.metrics.ws_connections.dec();
    send_task.abort();
    info!(connection = %conn_id, "WebSocket disconnected");
}
