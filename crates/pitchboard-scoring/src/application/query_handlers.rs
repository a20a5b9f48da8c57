//! Query handlers for the scoring context.
//!
//! Aggregation is a pure function over a snapshot of score records: it never
//! stores its result, and a recompute that overlaps a write simply reflects
//! whichever snapshot the store returned. Intermediate math stays in f64;
//! rounding to two decimals happens only at the presentation boundary.

use pitchboard_core::error::DomainError;
use pitchboard_core::record::ScoreRecord;
use pitchboard_core::repository::ScoreRepository;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::criteria::Criterion;
use crate::domain::weights::WeightSet;

/// Per-criterion arithmetic means for one (startup, round) group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionAverages {
    /// Mean problem score.
    pub problem: f64,
    /// Mean solution score.
    pub solution: f64,
    /// Mean innovation score.
    pub innovation: f64,
    /// Mean team score.
    pub team: f64,
    /// Mean business model score.
    pub business_model: f64,
    /// Mean market opportunity score.
    pub market_opportunity: f64,
    /// Mean technical feasibility score.
    pub technical_feasibility: f64,
    /// Mean execution strategy score.
    pub execution_strategy: f64,
    /// Mean pitch quality score.
    pub pitch_quality: f64,
}

impl CriterionAverages {
    /// The mean for one criterion.
    #[must_use]
    pub fn get(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Problem => self.problem,
            Criterion::Solution => self.solution,
            Criterion::Innovation => self.innovation,
            Criterion::Team => self.team,
            Criterion::BusinessModel => self.business_model,
            Criterion::MarketOpportunity => self.market_opportunity,
            Criterion::TechnicalFeasibility => self.technical_feasibility,
            Criterion::ExecutionStrategy => self.execution_strategy,
            Criterion::PitchQuality => self.pitch_quality,
        }
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            problem: f(self.problem),
            solution: f(self.solution),
            innovation: f(self.innovation),
            team: f(self.team),
            business_model: f(self.business_model),
            market_opportunity: f(self.market_opportunity),
            technical_feasibility: f(self.technical_feasibility),
            execution_strategy: f(self.execution_strategy),
            pitch_quality: f(self.pitch_quality),
        }
    }
}

/// Derived summary of all judge submissions for one (startup, round) group.
/// Never stored; recomputed per request or per triggering event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    /// The startup the summary describes.
    pub startup_id: Uuid,
    /// The round the summary describes.
    pub round_id: Uuid,
    /// Per-criterion arithmetic means.
    pub average_scores: CriterionAverages,
    /// Count of records with the nomination flag set.
    pub total_nominations: u64,
    /// Number of distinct contributing judge submissions.
    pub judge_count: u64,
    /// Weighted composite score, present only when weights were supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite: Option<f64>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl AggregateSummary {
    /// A copy with every numeric field rounded to two decimal places, for
    /// the presentation boundary only.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            average_scores: self.average_scores.map(round2),
            composite: self.composite.map(round2),
            ..self.clone()
        }
    }
}

/// Computes the aggregate summary for one (startup, round) group from a
/// snapshot of its score records. Returns `None` when the snapshot is empty;
/// a group nobody has scored has no data rather than a zero mean.
///
/// When `weights` is supplied the composite is the sum over criteria of
/// (criterion mean × weight / 100); criteria absent from the weight set
/// contribute zero but their means are still reported.
#[must_use]
pub fn compute_aggregate(
    startup_id: Uuid,
    round_id: Uuid,
    records: &[ScoreRecord],
    weights: Option<&WeightSet>,
) -> Option<AggregateSummary> {
    if records.is_empty() {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let count = records.len() as f64;
    let mean_of = |criterion: Criterion| -> f64 {
        let sum: f64 = records
            .iter()
            .map(|r| f64::from(criterion.value_of(&r.scores)))
            .sum();
        sum / count
    };

    let average_scores = CriterionAverages {
        problem: mean_of(Criterion::Problem),
        solution: mean_of(Criterion::Solution),
        innovation: mean_of(Criterion::Innovation),
        team: mean_of(Criterion::Team),
        business_model: mean_of(Criterion::BusinessModel),
        market_opportunity: mean_of(Criterion::MarketOpportunity),
        technical_feasibility: mean_of(Criterion::TechnicalFeasibility),
        execution_strategy: mean_of(Criterion::ExecutionStrategy),
        pitch_quality: mean_of(Criterion::PitchQuality),
    };

    let composite = weights.map(|set| {
        Criterion::ALL
            .iter()
            .map(|&criterion| {
                set.weight_for(criterion.key())
                    .map_or(0.0, |weight| average_scores.get(criterion) * weight / 100.0)
            })
            .sum::<f64>()
    });

    let total_nominations = records.iter().filter(|r| r.nominated).count() as u64;

    Some(AggregateSummary {
        startup_id,
        round_id,
        average_scores,
        total_nominations,
        judge_count: records.len() as u64,
        composite,
    })
}

/// Retrieves the live aggregate for a (startup, round) group, pulling the
/// group's records and computing the summary on demand.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the supplied weights are out of
/// range, or `DomainError::TransientStore` if the store is unavailable.
pub async fn get_group_aggregate(
    startup_id: Uuid,
    round_id: Uuid,
    weights: Option<&WeightSet>,
    repo: &dyn ScoreRepository,
) -> Result<Option<AggregateSummary>, DomainError> {
    if let Some(set) = weights {
        set.validate()?;
    }
    let records = repo.find_by_group(startup_id, round_id).await?;
    Ok(compute_aggregate(startup_id, round_id, &records, weights))
}

/// All scores submitted for a startup, ordered by creation time. Empty when
/// none exist.
///
/// # Errors
///
/// Returns `DomainError::TransientStore` if the store is unavailable.
pub async fn list_scores_for_startup(
    startup_id: Uuid,
    repo: &dyn ScoreRepository,
) -> Result<Vec<ScoreRecord>, DomainError> {
    repo.find_by_startup(startup_id).await
}

/// All scores submitted in a round, ordered by creation time. Empty when
/// none exist.
///
/// # Errors
///
/// Returns `DomainError::TransientStore` if the store is unavailable.
pub async fn list_scores_for_round(
    round_id: Uuid,
    repo: &dyn ScoreRepository,
) -> Result<Vec<ScoreRecord>, DomainError> {
    repo.find_by_round(round_id).await
}
