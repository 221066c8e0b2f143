use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::types::{ClientMessage, ServerMessage};
use crate::AppState;

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Channel feeding this client; the hub's snapshot pump and the read
    // loop both write into it.
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let client_id = state.hub.register(tx.clone());
    info!("WebSocket client connected: {}", client_id);

    // On connect the client gets the universe and whatever the cache holds
    // right now, so the page renders before the next batch lands.
    let symbols = ServerMessage::Symbols {
        data: state.cache.symbols().to_vec(),
    };
    let initial = ServerMessage::Update {
        results: state.cache.snapshot(),
    };
    for msg in [&symbols, &initial] {
        if let Ok(json) = serde_json::to_string(msg) {
            let _ = tx.send(json);
        }
    }

    // Forward queued frames to the socket.
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    // Read loop; the protocol is push-only so client frames are mostly
    // connection upkeep.
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Ping) => {
                    if let Ok(json) = serde_json::to_string(&ServerMessage::Pong) {
                        let _ = tx.send(json);
                    }
                }
                Err(_) => debug!("Ignoring unknown frame from {}: {}", client_id, text),
            },
            Ok(Message::Close(_)) => {
                info!("WebSocket client disconnecting: {}", client_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                // Pong is handled automatically by axum
                debug!("Received ping from {}", client_id);
            }
            Err(e) => {
                error!("WebSocket error for {}: {}", client_id, e);
                break;
            }
            _ => {}
        }
    }

    state.hub.unregister(client_id);
    send_task.abort();
    info!("WebSocket client disconnected: {}", client_id);
}
