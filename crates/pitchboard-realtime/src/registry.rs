//! Connection registry.
//!
//! The registry is a lifecycle-scoped object owned by the service instance,
//! not process-wide state, so isolated instances (e.g. in tests) never
//! cross-contaminate. Structural mutation takes the write lock; broadcast
//! iteration snapshots senders under the read lock and sends outside it, so
//! a connection removed mid-broadcast simply misses that message.

use std::collections::HashMap;

use tokio::sync::{RwLock, mpsc};
use tracing::debug;
use uuid::Uuid;

use crate::event::LiveEvent;

/// Default bound of each connection's outbound event queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Lifecycle state of a connection.
///
/// `Closed` has no stored representation: a closed connection's entry is
/// gone, and any operation addressed to its id reports `ConnectionNotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Registered, handshake not yet complete.
    Connecting,
    /// Handshake complete; eligible for delivery.
    Open,
    /// Close initiated; no further delivery.
    Closing,
}

#[derive(Debug)]
struct Connection {
    state: ConnectionState,
    /// Round subscription filter; `None` means all events.
    filter: Option<Uuid>,
    sender: mpsc::Sender<LiveEvent>,
}

/// Registry of live observer connections keyed by opaque identifier.
#[derive(Debug)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<Uuid, Connection>>,
    queue_capacity: usize,
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionRegistry {
    /// Creates an empty registry with the default per-connection queue bound.
    #[must_use]
    pub fn new() -> Self {
        Self::with_queue_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Creates an empty registry with an explicit per-connection queue bound.
    #[must_use]
    pub fn with_queue_capacity(queue_capacity: usize) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            queue_capacity,
        }
    }

    /// Registers a new connection in the `Connecting` state and returns its
    /// generated id together with the receiving end of its event queue.
    pub async fn register(&self, filter: Option<Uuid>) -> (Uuid, mpsc::Receiver<LiveEvent>) {
        let id = Uuid::new_v4();
        let (sender, receiver) = mpsc::channel(self.queue_capacity);
        let mut connections = self.connections.write().await;
        connections.insert(
            id,
            Connection {
                state: ConnectionState::Connecting,
                filter,
                sender,
            },
        );
        debug!(connection_id = %id, "connection registered");
        (id, receiver)
    }

    /// Marks a connection `Open` after a successful handshake. Returns
    /// `false` for an unknown or already-closing id.
    pub async fn mark_open(&self, id: Uuid) -> bool {
        let mut connections = self.connections.write().await;
        match connections.get_mut(&id) {
            Some(connection) if connection.state == ConnectionState::Connecting => {
                connection.state = ConnectionState::Open;
                true
            }
            _ => false,
        }
    }

    /// Removes a connection. Idempotent and safe to call concurrently with
    /// an in-flight broadcast; returns `false` if the id was already gone.
    pub async fn unregister(&self, id: Uuid) -> bool {
        let mut connections = self.connections.write().await;
        if let Some(connection) = connections.get_mut(&id) {
            // Transit Closing before the entry disappears; dropping the
            // sender closes the queue and ends the connection's writer task.
            connection.state = ConnectionState::Closing;
        }
        let removed = connections.remove(&id).is_some();
        if removed {
            debug!(connection_id = %id, "connection unregistered");
        }
        removed
    }

    /// The sender for an open connection, or `None` if the id is unknown or
    /// the connection is not accepting delivery.
    pub async fn get(&self, id: Uuid) -> Option<mpsc::Sender<LiveEvent>> {
        let connections = self.connections.read().await;
        connections
            .get(&id)
            .filter(|c| c.state == ConnectionState::Open)
            .map(|c| c.sender.clone())
    }

    /// The current lifecycle state of a connection, if it still exists.
    pub async fn state_of(&self, id: Uuid) -> Option<ConnectionState> {
        let connections = self.connections.read().await;
        connections.get(&id).map(|c| c.state)
    }

    /// Snapshot of every open connection whose subscription filter matches
    /// `round`. An event with no round key matches every filter; a
    /// connection with no filter matches every event.
    pub async fn open_connections_matching(
        &self,
        round: Option<Uuid>,
    ) -> Vec<(Uuid, mpsc::Sender<LiveEvent>)> {
        let connections = self.connections.read().await;
        connections
            .iter()
            .filter(|(_, c)| c.state == ConnectionState::Open)
            .filter(|(_, c)| match (round, c.filter) {
                (Some(event_round), Some(filter)) => event_round == filter,
                _ => true,
            })
            .map(|(id, c)| (*id, c.sender.clone()))
            .collect()
    }

    /// Number of registered connections in any state.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Whether no connections are registered.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
