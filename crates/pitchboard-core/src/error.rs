//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or out-of-range input, rejected before reaching the store.
    #[error("validation error: {0}")]
    Validation(String),

    /// A score already exists for this (startup, judge, round) key.
    #[error("duplicate submission for startup {startup_id}, judge {judge_id}, round {round_id}")]
    DuplicateSubmission {
        /// The startup being scored.
        startup_id: Uuid,
        /// The judge who already submitted.
        judge_id: Uuid,
        /// The round of the existing submission.
        round_id: Uuid,
    },

    /// A referenced record is absent.
    #[error("record not found: {0}")]
    NotFound(Uuid),

    /// A targeted delivery addressed a dead or unknown connection.
    #[error("connection not found: {0}")]
    ConnectionNotFound(Uuid),

    /// The persistence layer is unavailable or timed out. Eligible for
    /// caller-directed retry; the core never retries silently.
    #[error("transient store error: {0}")]
    TransientStore(String),
}

impl DomainError {
    /// Whether the caller may retry the failed operation.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientStore(_))
    }
}
