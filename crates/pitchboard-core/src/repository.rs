//! Score repository abstraction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;
use crate::record::{ScoreCorrection, ScoreRecord};

/// Repository trait for persisting and retrieving score records.
///
/// Implementations must make `insert_if_absent` atomic with respect to the
/// (startup, judge, round) uniqueness check: two concurrent inserts for the
/// same key result in exactly one success and one `DuplicateSubmission`.
/// A record becomes visible to readers atomically or not at all.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    /// Persists `record` unless a record with the same
    /// (startup, judge, round) key already exists.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateSubmission` if the key is taken, or
    /// `DomainError::TransientStore` if the store is unavailable.
    async fn insert_if_absent(&self, record: ScoreRecord) -> Result<ScoreRecord, DomainError>;

    /// Looks up a single record by its identifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TransientStore` if the store is unavailable.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScoreRecord>, DomainError>;

    /// All records for a startup, ordered by creation time. Empty when none
    /// match; "not found" semantics belong to the web layer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TransientStore` if the store is unavailable.
    async fn find_by_startup(&self, startup_id: Uuid) -> Result<Vec<ScoreRecord>, DomainError>;

    /// All records for a round, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TransientStore` if the store is unavailable.
    async fn find_by_round(&self, round_id: Uuid) -> Result<Vec<ScoreRecord>, DomainError>;

    /// All records for one (startup, round) group, ordered by creation
    /// time. The aggregation engine's read path.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TransientStore` if the store is unavailable.
    async fn find_by_group(
        &self,
        startup_id: Uuid,
        round_id: Uuid,
    ) -> Result<Vec<ScoreRecord>, DomainError>;

    /// Applies a privileged correction to an existing record, replacing only
    /// its mutable fields, and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if `id` is absent, or
    /// `DomainError::TransientStore` if the store is unavailable.
    async fn update(
        &self,
        id: Uuid,
        correction: ScoreCorrection,
    ) -> Result<ScoreRecord, DomainError>;

    /// Removes a record, returning the removed record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if `id` is absent, or
    /// `DomainError::TransientStore` if the store is unavailable.
    async fn delete(&self, id: Uuid) -> Result<ScoreRecord, DomainError>;
}
