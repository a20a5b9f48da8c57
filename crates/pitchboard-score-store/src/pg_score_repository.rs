//! PostgreSQL implementation of the `ScoreRepository` trait.
//!
//! Every statement runs under a timeout; a store that stops answering
//! surfaces as a retryable `TransientStore` error, never a hang.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::error;
use uuid::Uuid;

use pitchboard_core::error::DomainError;
use pitchboard_core::record::{ScoreCorrection, ScoreRecord, ScoreValues};
use pitchboard_core::repository::ScoreRepository;

use crate::schema::CREATE_SCORE_RECORDS_TABLE;

const STATEMENT_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_COLUMNS: &str = "SELECT id, startup_id, judge_id, round_id, \
     problem_score, solution_score, innovation_score, team_score, \
     business_model_score, market_opportunity_score, technical_feasibility_score, \
     execution_strategy_score, pitch_quality_score, \
     feedback, nominated, nomination_reason, created_at FROM score_records";

fn store_error(err: sqlx::Error) -> DomainError {
    // Degraded-mode signal for operators; in-flight requests for unrelated
    // keys keep being served.
    error!(error = %err, "score store unavailable");
    DomainError::TransientStore(err.to_string())
}

async fn with_timeout<T, F>(fut: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>> + Send,
{
    match tokio::time::timeout(STATEMENT_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => {
            error!("score store statement timed out");
            Err(DomainError::TransientStore("statement timed out".into()))
        }
    }
}

fn sub_score(row: &PgRow, column: &str) -> Result<u8, DomainError> {
    let value: i16 = row.try_get(column).map_err(store_error)?;
    u8::try_from(value).map_err(|_| {
        DomainError::TransientStore(format!("corrupt sub-score in column {column}"))
    })
}

fn record_from_row(row: &PgRow) -> Result<ScoreRecord, DomainError> {
    Ok(ScoreRecord {
        id: row.try_get("id").map_err(store_error)?,
        startup_id: row.try_get("startup_id").map_err(store_error)?,
        judge_id: row.try_get("judge_id").map_err(store_error)?,
        round_id: row.try_get("round_id").map_err(store_error)?,
        scores: ScoreValues {
            problem: sub_score(row, "problem_score")?,
            solution: sub_score(row, "solution_score")?,
            innovation: sub_score(row, "innovation_score")?,
            team: sub_score(row, "team_score")?,
            business_model: sub_score(row, "business_model_score")?,
            market_opportunity: sub_score(row, "market_opportunity_score")?,
            technical_feasibility: sub_score(row, "technical_feasibility_score")?,
            execution_strategy: sub_score(row, "execution_strategy_score")?,
            pitch_quality: sub_score(row, "pitch_quality_score")?,
        },
        feedback: row.try_get("feedback").map_err(store_error)?,
        nominated: row.try_get("nominated").map_err(store_error)?,
        nomination_reason: row.try_get("nomination_reason").map_err(store_error)?,
        created_at: row.try_get("created_at").map_err(store_error)?,
    })
}

/// PostgreSQL-backed score repository.
#[derive(Debug, Clone)]
pub struct PgScoreRepository {
    pool: PgPool,
}

impl PgScoreRepository {
    /// Creates a new `PgScoreRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the score records table and indexes if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TransientStore` if the DDL cannot be applied.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        with_timeout(async {
            sqlx::raw_sql(CREATE_SCORE_RECORDS_TABLE)
                .execute(&self.pool)
                .await
                .map_err(store_error)?;
            Ok(())
        })
        .await
    }

    async fn fetch_ordered(&self, sql: &str, key: Uuid) -> Result<Vec<ScoreRecord>, DomainError> {
        let rows = sqlx::query(sql)
            .bind(key)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;
        rows.iter().map(record_from_row).collect()
    }
}

#[async_trait]
impl ScoreRepository for PgScoreRepository {
    async fn insert_if_absent(&self, record: ScoreRecord) -> Result<ScoreRecord, DomainError> {
        with_timeout(async {
            // The uniqueness check and the insert are one statement; two
            // concurrent submissions for the same key resolve in the
            // database, not in application code.
            let result = sqlx::query(
                "INSERT INTO score_records (id, startup_id, judge_id, round_id, \
                 problem_score, solution_score, innovation_score, team_score, \
                 business_model_score, market_opportunity_score, \
                 technical_feasibility_score, execution_strategy_score, \
                 pitch_quality_score, feedback, nominated, nomination_reason, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
                 ON CONFLICT (startup_id, judge_id, round_id) DO NOTHING",
            )
            .bind(record.id)
            .bind(record.startup_id)
            .bind(record.judge_id)
            .bind(record.round_id)
            .bind(i16::from(record.scores.problem))
            .bind(i16::from(record.scores.solution))
            .bind(i16::from(record.scores.innovation))
            .bind(i16::from(record.scores.team))
            .bind(i16::from(record.scores.business_model))
            .bind(i16::from(record.scores.market_opportunity))
            .bind(i16::from(record.scores.technical_feasibility))
            .bind(i16::from(record.scores.execution_strategy))
            .bind(i16::from(record.scores.pitch_quality))
            .bind(record.feedback.as_deref())
            .bind(record.nominated)
            .bind(record.nomination_reason.as_deref())
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

            if result.rows_affected() == 0 {
                return Err(DomainError::DuplicateSubmission {
                    startup_id: record.startup_id,
                    judge_id: record.judge_id,
                    round_id: record.round_id,
                });
            }
            Ok(record)
        })
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScoreRecord>, DomainError> {
        with_timeout(async {
            let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?;
            row.as_ref().map(record_from_row).transpose()
        })
        .await
    }

    async fn find_by_startup(&self, startup_id: Uuid) -> Result<Vec<ScoreRecord>, DomainError> {
        with_timeout(self.fetch_ordered(
            &format!("{SELECT_COLUMNS} WHERE startup_id = $1 ORDER BY created_at, id"),
            startup_id,
        ))
        .await
    }

    async fn find_by_round(&self, round_id: Uuid) -> Result<Vec<ScoreRecord>, DomainError> {
        with_timeout(self.fetch_ordered(
            &format!("{SELECT_COLUMNS} WHERE round_id = $1 ORDER BY created_at, id"),
            round_id,
        ))
        .await
    }

    async fn find_by_group(
        &self,
        startup_id: Uuid,
        round_id: Uuid,
    ) -> Result<Vec<ScoreRecord>, DomainError> {
        with_timeout(async {
            let rows = sqlx::query(&format!(
                "{SELECT_COLUMNS} WHERE startup_id = $1 AND round_id = $2 ORDER BY created_at, id"
            ))
            .bind(startup_id)
            .bind(round_id)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;
            rows.iter().map(record_from_row).collect()
        })
        .await
    }

    async fn update(
        &self,
        id: Uuid,
        correction: ScoreCorrection,
    ) -> Result<ScoreRecord, DomainError> {
        with_timeout(async {
            // Row lock for the read-modify-write so the updated record is
            // visible atomically; readers see the old or new record, never
            // a partially corrected one.
            let mut tx = self.pool.begin().await.map_err(store_error)?;

            let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = $1 FOR UPDATE"))
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(store_error)?;
            let Some(row) = row else {
                return Err(DomainError::NotFound(id));
            };

            let mut record = record_from_row(&row)?;
            correction.apply_to(&mut record);

            sqlx::query(
                "UPDATE score_records SET \
                 problem_score = $2, solution_score = $3, innovation_score = $4, \
                 team_score = $5, business_model_score = $6, market_opportunity_score = $7, \
                 technical_feasibility_score = $8, execution_strategy_score = $9, \
                 pitch_quality_score = $10, feedback = $11, nominated = $12, \
                 nomination_reason = $13 \
                 WHERE id = $1",
            )
            .bind(record.id)
            .bind(i16::from(record.scores.problem))
            .bind(i16::from(record.scores.solution))
            .bind(i16::from(record.scores.innovation))
            .bind(i16::from(record.scores.team))
            .bind(i16::from(record.scores.business_model))
            .bind(i16::from(record.scores.market_opportunity))
            .bind(i16::from(record.scores.technical_feasibility))
            .bind(i16::from(record.scores.execution_strategy))
            .bind(i16::from(record.scores.pitch_quality))
            .bind(record.feedback.as_deref())
            .bind(record.nominated)
            .bind(record.nomination_reason.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

            tx.commit().await.map_err(store_error)?;
            Ok(record)
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<ScoreRecord, DomainError> {
        with_timeout(async {
            let row = sqlx::query(
                "DELETE FROM score_records WHERE id = $1 \
                 RETURNING id, startup_id, judge_id, round_id, \
                 problem_score, solution_score, innovation_score, team_score, \
                 business_model_score, market_opportunity_score, \
                 technical_feasibility_score, execution_strategy_score, \
                 pitch_quality_score, feedback, nominated, nomination_reason, created_at",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
            row.as_ref()
                .map(record_from_row)
                .transpose()?
                .ok_or(DomainError::NotFound(id))
        })
        .await
    }
}
