//! PostgreSQL-backed score record store.
//!
//! The uniqueness constraint on (startup, judge, round) lives in the
//! database, so the duplicate check and the insert are one atomic
//! statement rather than a read-then-write race.

pub mod pg_score_repository;
pub mod schema;

pub use pg_score_repository::PgScoreRepository;
