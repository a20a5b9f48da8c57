//! Commands for the scoring context.

use pitchboard_core::command::Command;
use pitchboard_core::record::{ScoreCorrection, ScoreValues};
use uuid::Uuid;

/// Command to submit a judge's score for a startup in a round.
#[derive(Debug, Clone)]
pub struct SubmitScore {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The startup being scored.
    pub startup_id: Uuid,
    /// The submitting judge.
    pub judge_id: Uuid,
    /// The round the evaluation belongs to.
    pub round_id: Uuid,
    /// The nine sub-scores.
    pub scores: ScoreValues,
    /// Optional free-text feedback.
    pub feedback: Option<String>,
    /// Whether the judge nominates this startup.
    pub nominated: bool,
    /// Optional nomination rationale.
    pub nomination_reason: Option<String>,
}

impl Command for SubmitScore {
    fn command_type(&self) -> &'static str {
        "scoring.submit_score"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Privileged command to correct an existing score record in place.
#[derive(Debug, Clone)]
pub struct CorrectScore {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The record to correct.
    pub score_id: Uuid,
    /// The partial field updates to apply.
    pub correction: ScoreCorrection,
}

impl Command for CorrectScore {
    fn command_type(&self) -> &'static str {
        "scoring.correct_score"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Privileged command to remove a score record.
#[derive(Debug, Clone)]
pub struct DeleteScore {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The record to remove.
    pub score_id: Uuid,
}

impl Command for DeleteScore {
    fn command_type(&self) -> &'static str {
        "scoring.delete_score"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
