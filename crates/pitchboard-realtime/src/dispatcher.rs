//! Broadcast dispatcher.
//!
//! Fan-out is best-effort: a delivery failure on one connection is logged
//! and evicts that connection, and never aborts delivery to the rest. Each
//! connection's queue is bounded; a full queue means the client has fallen
//! too far behind and the connection is evicted rather than buffering
//! without bound.

use std::sync::Arc;

use pitchboard_core::error::DomainError;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::event::LiveEvent;
use crate::registry::ConnectionRegistry;

/// Delivers live events to registered connections.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ConnectionRegistry>,
}

impl Dispatcher {
    /// Creates a dispatcher over `registry`.
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Delivers `event` to every open connection whose filter matches the
    /// event's round. Returns the number of queues the event was placed on.
    pub async fn broadcast_all(&self, event: &LiveEvent) -> usize {
        let targets = self.registry.open_connections_matching(event.round_id()).await;
        let mut delivered = 0;
        for (id, sender) in targets {
            match sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(connection_id = %id, "event queue full, evicting slow connection");
                    self.registry.unregister(id).await;
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(connection_id = %id, "connection closed mid-broadcast, evicting");
                    self.registry.unregister(id).await;
                }
            }
        }
        delivered
    }

    /// Delivers `event` to a single connection.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ConnectionNotFound` if the id is unknown, the
    /// connection is not open, or its transport has gone away. Non-fatal:
    /// callers log and carry on.
    pub async fn send_to(&self, id: Uuid, event: LiveEvent) -> Result<(), DomainError> {
        let sender = self
            .registry
            .get(id)
            .await
            .ok_or(DomainError::ConnectionNotFound(id))?;
        match sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!(connection_id = %id, "event queue full, evicting slow connection");
                self.registry.unregister(id).await;
                Err(DomainError::ConnectionNotFound(id))
            }
            Err(TrySendError::Closed(_)) => {
                self.registry.unregister(id).await;
                Err(DomainError::ConnectionNotFound(id))
            }
        }
    }
}
