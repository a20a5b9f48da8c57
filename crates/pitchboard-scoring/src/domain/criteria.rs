//! The nine evaluation criteria.

use pitchboard_core::record::ScoreValues;
use serde::{Deserialize, Serialize};

/// One named evaluation dimension of a pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Criterion {
    /// Problem understanding.
    Problem,
    /// Solution quality.
    Solution,
    /// Degree of innovation.
    Innovation,
    /// Team strength.
    Team,
    /// Business model soundness.
    BusinessModel,
    /// Market opportunity size.
    MarketOpportunity,
    /// Technical feasibility.
    TechnicalFeasibility,
    /// Execution strategy.
    ExecutionStrategy,
    /// Pitch delivery quality.
    PitchQuality,
}

impl Criterion {
    /// All criteria in rubric order.
    pub const ALL: [Criterion; 9] = [
        Criterion::Problem,
        Criterion::Solution,
        Criterion::Innovation,
        Criterion::Team,
        Criterion::BusinessModel,
        Criterion::MarketOpportunity,
        Criterion::TechnicalFeasibility,
        Criterion::ExecutionStrategy,
        Criterion::PitchQuality,
    ];

    /// The wire key used in weight configuration and summaries.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Criterion::Problem => "problem",
            Criterion::Solution => "solution",
            Criterion::Innovation => "innovation",
            Criterion::Team => "team",
            Criterion::BusinessModel => "businessModel",
            Criterion::MarketOpportunity => "marketOpportunity",
            Criterion::TechnicalFeasibility => "technicalFeasibility",
            Criterion::ExecutionStrategy => "executionStrategy",
            Criterion::PitchQuality => "pitchQuality",
        }
    }

    /// Extracts this criterion's sub-score from a set of score values.
    #[must_use]
    pub fn value_of(self, values: &ScoreValues) -> u8 {
        match self {
            Criterion::Problem => values.problem,
            Criterion::Solution => values.solution,
            Criterion::Innovation => values.innovation,
            Criterion::Team => values.team,
            Criterion::BusinessModel => values.business_model,
            Criterion::MarketOpportunity => values.market_opportunity,
            Criterion::TechnicalFeasibility => values.technical_feasibility,
            Criterion::ExecutionStrategy => values.execution_strategy,
            Criterion::PitchQuality => values.pitch_quality,
        }
    }
}
