//! Test repositories — `ScoreRepository` doubles for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use pitchboard_core::error::DomainError;
use pitchboard_core::record::{ScoreCorrection, ScoreRecord};
use pitchboard_core::repository::ScoreRepository;
use uuid::Uuid;

/// An in-memory `ScoreRepository` backed by a mutex-guarded map keyed by the
/// (startup, judge, round) composite. The uniqueness check and insert happen
/// under one lock acquisition, so concurrent duplicate submissions resolve
/// to exactly one winner, same as the production store.
#[derive(Debug, Default)]
pub struct InMemoryScoreRepository {
    records: Mutex<HashMap<(Uuid, Uuid, Uuid), ScoreRecord>>,
}

impl InMemoryScoreRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Whether the repository holds no records.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sorted(mut records: Vec<ScoreRecord>) -> Vec<ScoreRecord> {
        // Creation-time order; record ids are time-ordered UUIDs, which
        // breaks ties when a fixed test clock collapses timestamps.
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        records
    }
}

#[async_trait]
impl ScoreRepository for InMemoryScoreRepository {
    async fn insert_if_absent(&self, record: ScoreRecord) -> Result<ScoreRecord, DomainError> {
        let key = (record.startup_id, record.judge_id, record.round_id);
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&key) {
            return Err(DomainError::DuplicateSubmission {
                startup_id: record.startup_id,
                judge_id: record.judge_id,
                round_id: record.round_id,
            });
        }
        records.insert(key, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScoreRecord>, DomainError> {
        let records = self.records.lock().unwrap();
        Ok(records.values().find(|r| r.id == id).cloned())
    }

    async fn find_by_startup(&self, startup_id: Uuid) -> Result<Vec<ScoreRecord>, DomainError> {
        let records = self.records.lock().unwrap();
        Ok(Self::sorted(
            records
                .values()
                .filter(|r| r.startup_id == startup_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_round(&self, round_id: Uuid) -> Result<Vec<ScoreRecord>, DomainError> {
        let records = self.records.lock().unwrap();
        Ok(Self::sorted(
            records
                .values()
                .filter(|r| r.round_id == round_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_group(
        &self,
        startup_id: Uuid,
        round_id: Uuid,
    ) -> Result<Vec<ScoreRecord>, DomainError> {
        let records = self.records.lock().unwrap();
        Ok(Self::sorted(
            records
                .values()
                .filter(|r| r.startup_id == startup_id && r.round_id == round_id)
                .cloned()
                .collect(),
        ))
    }

    async fn update(
        &self,
        id: Uuid,
        correction: ScoreCorrection,
    ) -> Result<ScoreRecord, DomainError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .values_mut()
            .find(|r| r.id == id)
            .ok_or(DomainError::NotFound(id))?;
        correction.apply_to(record);
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<ScoreRecord, DomainError> {
        let mut records = self.records.lock().unwrap();
        let key = records
            .iter()
            .find(|(_, r)| r.id == id)
            .map(|(key, _)| *key)
            .ok_or(DomainError::NotFound(id))?;
        Ok(records.remove(&key).expect("key located above"))
    }
}

/// A repository that always fails with a transient store error. Useful for
/// testing degraded-mode paths.
#[derive(Debug)]
pub struct FailingScoreRepository;

impl FailingScoreRepository {
    fn unavailable() -> DomainError {
        DomainError::TransientStore("connection refused".into())
    }
}

#[async_trait]
impl ScoreRepository for FailingScoreRepository {
    async fn insert_if_absent(&self, _record: ScoreRecord) -> Result<ScoreRecord, DomainError> {
        Err(Self::unavailable())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<ScoreRecord>, DomainError> {
        Err(Self::unavailable())
    }

    async fn find_by_startup(&self, _startup_id: Uuid) -> Result<Vec<ScoreRecord>, DomainError> {
        Err(Self::unavailable())
    }

    async fn find_by_round(&self, _round_id: Uuid) -> Result<Vec<ScoreRecord>, DomainError> {
        Err(Self::unavailable())
    }

    async fn find_by_group(
        &self,
        _startup_id: Uuid,
        _round_id: Uuid,
    ) -> Result<Vec<ScoreRecord>, DomainError> {
        Err(Self::unavailable())
    }

    async fn update(
        &self,
        _id: Uuid,
        _correction: ScoreCorrection,
    ) -> Result<ScoreRecord, DomainError> {
        Err(Self::unavailable())
    }

    async fn delete(&self, _id: Uuid) -> Result<ScoreRecord, DomainError> {
        Err(Self::unavailable())
    }
}
