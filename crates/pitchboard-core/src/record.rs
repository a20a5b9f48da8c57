//! Score record types.
//!
//! A [`ScoreRecord`] is one judge's evaluation of one startup in one round.
//! Its identity is the composite key (startup, judge, round); a second
//! submission for the same key is rejected, never overwritten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Inclusive lower bound for every sub-score.
pub const SUB_SCORE_MIN: u8 = 1;
/// Inclusive upper bound for every sub-score.
pub const SUB_SCORE_MAX: u8 = 5;

/// The nine bounded sub-scores of a single evaluation, each in
/// [[`SUB_SCORE_MIN`], [`SUB_SCORE_MAX`]].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreValues {
    /// Problem understanding.
    pub problem: u8,
    /// Solution quality.
    pub solution: u8,
    /// Degree of innovation.
    pub innovation: u8,
    /// Team strength.
    pub team: u8,
    /// Business model soundness.
    pub business_model: u8,
    /// Market opportunity size.
    pub market_opportunity: u8,
    /// Technical feasibility.
    pub technical_feasibility: u8,
    /// Execution strategy.
    pub execution_strategy: u8,
    /// Pitch delivery quality.
    pub pitch_quality: u8,
}

impl ScoreValues {
    /// All nine sub-scores in declaration order.
    #[must_use]
    pub fn as_array(&self) -> [u8; 9] {
        [
            self.problem,
            self.solution,
            self.innovation,
            self.team,
            self.business_model,
            self.market_opportunity,
            self.technical_feasibility,
            self.execution_strategy,
            self.pitch_quality,
        ]
    }

    /// Validates that every sub-score lies within the closed scoring range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` naming the range if any sub-score
    /// is out of bounds.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self
            .as_array()
            .iter()
            .all(|v| (SUB_SCORE_MIN..=SUB_SCORE_MAX).contains(v))
        {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "every sub-score must be between {SUB_SCORE_MIN} and {SUB_SCORE_MAX}"
            )))
        }
    }
}

/// One judge's persisted evaluation of one startup in one round.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    /// Unique record identifier (time-ordered UUID).
    pub id: Uuid,
    /// The startup being scored.
    pub startup_id: Uuid,
    /// The judge who submitted.
    pub judge_id: Uuid,
    /// The round the evaluation belongs to.
    pub round_id: Uuid,
    /// The nine bounded sub-scores.
    pub scores: ScoreValues,
    /// Free-text feedback.
    pub feedback: Option<String>,
    /// Whether the judge nominated this startup.
    pub nominated: bool,
    /// Optional rationale for the nomination.
    pub nomination_reason: Option<String>,
    /// Timestamp of submission.
    pub created_at: DateTime<Utc>,
}

/// Partial update applied through the privileged correction path. Only the
/// mutable fields of a record may change; identity and creation time never
/// do. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCorrection {
    /// Replacement sub-scores.
    pub scores: Option<ScoreValues>,
    /// Replacement feedback text.
    pub feedback: Option<String>,
    /// Replacement nomination flag.
    pub nominated: Option<bool>,
    /// Replacement nomination rationale.
    pub nomination_reason: Option<String>,
}

impl ScoreCorrection {
    /// Whether the correction changes anything at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_none()
            && self.feedback.is_none()
            && self.nominated.is_none()
            && self.nomination_reason.is_none()
    }

    /// Applies this correction to `record`, replacing only the fields that
    /// are present.
    pub fn apply_to(&self, record: &mut ScoreRecord) {
        if let Some(scores) = self.scores {
            record.scores = scores;
        }
        if let Some(feedback) = &self.feedback {
            record.feedback = Some(feedback.clone());
        }
        if let Some(nominated) = self.nominated {
            record.nominated = nominated;
        }
        if let Some(reason) = &self.nomination_reason {
            record.nomination_reason = Some(reason.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(fill: u8) -> ScoreValues {
        ScoreValues {
            problem: fill,
            solution: fill,
            innovation: fill,
            team: fill,
            business_model: fill,
            market_opportunity: fill,
            technical_feasibility: fill,
            execution_strategy: fill,
            pitch_quality: fill,
        }
    }

    #[test]
    fn test_validate_accepts_range_bounds() {
        assert!(values(SUB_SCORE_MIN).validate().is_ok());
        assert!(values(SUB_SCORE_MAX).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_and_six() {
        assert!(values(0).validate().is_err());
        assert!(values(6).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_single_out_of_range_field() {
        let mut v = values(3);
        v.pitch_quality = 6;
        assert!(v.validate().is_err());
    }

    #[test]
    fn test_correction_applies_only_present_fields() {
        let mut record = ScoreRecord {
            id: Uuid::now_v7(),
            startup_id: Uuid::new_v4(),
            judge_id: Uuid::new_v4(),
            round_id: Uuid::new_v4(),
            scores: values(3),
            feedback: Some("original".to_owned()),
            nominated: false,
            nomination_reason: None,
            created_at: Utc::now(),
        };

        let correction = ScoreCorrection {
            scores: None,
            feedback: None,
            nominated: Some(true),
            nomination_reason: Some("strong team".to_owned()),
        };
        correction.apply_to(&mut record);

        assert_eq!(record.scores, values(3));
        assert_eq!(record.feedback.as_deref(), Some("original"));
        assert!(record.nominated);
        assert_eq!(record.nomination_reason.as_deref(), Some("strong team"));
    }

    #[test]
    fn test_empty_correction_is_detected() {
        assert!(ScoreCorrection::default().is_empty());
        let correction = ScoreCorrection {
            nominated: Some(true),
            ..ScoreCorrection::default()
        };
        assert!(!correction.is_empty());
    }
}
