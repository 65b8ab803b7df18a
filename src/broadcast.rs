//! Connection broadcaster: fans every inbound text message out to all open
//! WebSocket connections, the sender included.
//!
//! Each connection gets a bounded outbound queue drained by its own writer
//! task. Broadcasting never awaits a peer: a full queue drops the message for
//! that peer only, and a closed queue removes the peer from the registry.

use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

/// Identifies one registered connection.
pub type ConnectionId = Uuid;

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Peers whose queue accepted the message.
    pub delivered: usize,
    /// Peers whose queue was full.
    pub dropped: usize,
    /// Peers found closed and removed.
    pub closed: usize,
}

/// Registry of open connections, kept in connect order.
pub struct Broadcaster {
    connections: RwLock<Vec<(ConnectionId, mpsc::Sender<String>)>>,
    queue_capacity: usize,
}

impl Broadcaster {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            connections: RwLock::new(Vec::new()),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Register a new connection and return its id and outbound queue.
    pub async fn connect(&self) -> (ConnectionId, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let id = Uuid::new_v4();

        let mut connections = self.connections.write().await;
        connections.push((id, tx));
        debug!(connection = %id, total = connections.len(), "Connection registered");

        (id, rx)
    }

    /// Remove a connection. Returns false if it was already gone.
    pub async fn disconnect(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.write().await;
        let before = connections.len();
        connections.retain(|(cid, _)| *cid != id);
        let removed = connections.len() != before;
        if removed {
            debug!(connection = %id, total = connections.len(), "Connection removed");
        }
        removed
    }

    /// Number of registered connections.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Queue `message` for every registered connection.
    pub async fn broadcast(&self, message: &str) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        let mut closed = Vec::new();

        {
            let connections = self.connections.read().await;
            for (id, tx) in connections.iter() {
                match tx.try_send(message.to_string()) {
                    Ok(()) => report.delivered += 1,
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        warn!(connection = %id, "Outbound queue full, dropping message");
                        report.dropped += 1;
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => closed.push(*id),
                }
            }
        }

        if !closed.is_empty() {
            report.closed = closed.len();
            let mut connections = self.connections.write().await;
            connections.retain(|(id, _)| !closed.contains(id));
        }

        report
    }
}
