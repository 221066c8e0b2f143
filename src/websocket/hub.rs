use crate::services::Snapshot;
use crate::types::ServerMessage;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Tracks connected WebSocket viewers. Every viewer receives every
/// snapshot; there are no per-symbol rooms because the result set is
/// always published whole.
pub struct ClientHub {
    clients: DashMap<Uuid, mpsc::UnboundedSender<String>>,
}

impl ClientHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            clients: DashMap::new(),
        })
    }

    /// Register a new client.
    pub fn register(&self, tx: mpsc::UnboundedSender<String>) -> Uuid {
        let client_id = Uuid::new_v4();
        self.clients.insert(client_id, tx);
        client_id
    }

    /// Unregister a client.
    pub fn unregister(&self, client_id: Uuid) {
        self.clients.remove(&client_id);
    }

    /// Send a frame to every connected client.
    pub fn broadcast_all(&self, message: &str) {
        for client in self.clients.iter() {
            let _ = client.value().send(message.to_string());
        }
    }

    /// Number of connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }
}

impl Default for ClientHub {
    fn default() -> Self {
        Self {
            clients: DashMap::new(),
        }
    }
}

/// Forward published snapshots to all connected clients. Each snapshot is
/// serialized once, not per client. Lagged receivers skip ahead to the
/// newest snapshot, which is safe because every snapshot is complete.
pub fn spawn_snapshot_pump(
    hub: Arc<ClientHub>,
    mut rx: broadcast::Receiver<Snapshot>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(snapshot) => {
                    let msg = ServerMessage::Update {
                        results: snapshot.as_ref().clone(),
                    };
                    match serde_json::to_string(&msg) {
                        Ok(json) => hub.broadcast_all(&json),
                        Err(e) => warn!("Failed to serialize snapshot update: {}", e),
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Snapshot pump lagged, skipped {} updates", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
