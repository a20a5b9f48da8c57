//! Shared application state.

use std::sync::Arc;

use pitchboard_core::clock::Clock;
use pitchboard_core::repository::ScoreRepository;
use pitchboard_realtime::{ConnectionRegistry, Dispatcher};

/// Application state shared across all request handlers. The connection
/// registry is owned here, scoped to this service instance, so isolated
/// instances (e.g. in tests) never share connections.
#[derive(Clone)]
pub struct AppState {
    /// Score record store.
    pub repository: Arc<dyn ScoreRepository>,
    /// Time source for record creation.
    pub clock: Arc<dyn Clock>,
    /// Live connection registry.
    pub registry: Arc<ConnectionRegistry>,
    /// Live event fan-out.
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Create new application state with a fresh connection registry.
    #[must_use]
    pub fn new(repository: Arc<dyn ScoreRepository>, clock: Arc<dyn Clock>) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));
        Self {
            repository,
            clock,
            registry,
            dispatcher,
        }
    }
}
