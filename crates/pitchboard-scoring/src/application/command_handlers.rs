//! Command handlers for the scoring context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: validate input, mutate the score store, and
//! describe the committed change for the live update pipeline.

use pitchboard_core::clock::Clock;
use pitchboard_core::error::DomainError;
use pitchboard_core::record::ScoreRecord;
use pitchboard_core::repository::ScoreRepository;
use uuid::Uuid;

use crate::domain::commands::{CorrectScore, DeleteScore, SubmitScore};
use crate::domain::events::{ScoreChange, ScoreChangeKind};

fn change_for(kind: ScoreChangeKind, record: &ScoreRecord) -> ScoreChange {
    ScoreChange {
        kind,
        startup_id: record.startup_id,
        round_id: record.round_id,
        judge_id: record.judge_id,
    }
}

/// Handles the `SubmitScore` command: validates the sub-scores, persists the
/// record through the atomic insert-if-absent path, and returns the created
/// record together with the change to broadcast.
///
/// # Errors
///
/// Returns `DomainError::Validation` for out-of-range sub-scores,
/// `DomainError::DuplicateSubmission` if this judge already scored this
/// startup in this round, or `DomainError::TransientStore` if persistence
/// fails.
pub async fn handle_submit_score(
    command: &SubmitScore,
    clock: &dyn Clock,
    repo: &dyn ScoreRepository,
) -> Result<(ScoreRecord, ScoreChange), DomainError> {
    command.scores.validate()?;

    let record = ScoreRecord {
        id: Uuid::now_v7(),
        startup_id: command.startup_id,
        judge_id: command.judge_id,
        round_id: command.round_id,
        scores: command.scores,
        feedback: command.feedback.clone(),
        nominated: command.nominated,
        nomination_reason: command.nomination_reason.clone(),
        created_at: clock.now(),
    };

    let record = repo.insert_if_absent(record).await?;
    let change = change_for(ScoreChangeKind::Submitted, &record);
    Ok((record, change))
}

/// Handles the `CorrectScore` command: validates the replacement values and
/// applies the privileged partial update in place.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an empty correction or out-of-range
/// replacement sub-scores, `DomainError::NotFound` if the record is absent,
/// or `DomainError::TransientStore` if persistence fails.
pub async fn handle_correct_score(
    command: &CorrectScore,
    repo: &dyn ScoreRepository,
) -> Result<(ScoreRecord, ScoreChange), DomainError> {
    if command.correction.is_empty() {
        return Err(DomainError::Validation(
            "correction must change at least one field".into(),
        ));
    }
    if let Some(scores) = &command.correction.scores {
        scores.validate()?;
    }

    let record = repo.update(command.score_id, command.correction.clone()).await?;
    let change = change_for(ScoreChangeKind::Corrected, &record);
    Ok((record, change))
}

/// Handles the `DeleteScore` command: removes the record so the affected
/// group's aggregate converges without it.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the record is absent, or
/// `DomainError::TransientStore` if persistence fails.
pub async fn handle_delete_score(
    command: &DeleteScore,
    repo: &dyn ScoreRepository,
) -> Result<(ScoreRecord, ScoreChange), DomainError> {
    let record = repo.delete(command.score_id).await?;
    let change = change_for(ScoreChangeKind::Deleted, &record);
    Ok((record, change))
}
