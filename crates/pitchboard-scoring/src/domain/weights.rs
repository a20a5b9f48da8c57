//! Per-round criteria weight configuration.

use std::collections::BTreeMap;

use pitchboard_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Weight configuration for a single criterion.
///
/// Weights are advisory inputs to the composite computation; a round's
/// weights are not required to sum to 100. `sub_criteria` is accepted and
/// carried for forward compatibility but is not consumed by aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaWeight {
    /// The criterion wire key (e.g. `"problem"`, `"businessModel"`).
    pub criteria_key: String,
    /// Weight in [0, 100].
    pub weight: f64,
    /// Reserved nested sub-criteria weights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_criteria: Option<BTreeMap<String, f64>>,
}

/// A set of criteria weights for one round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightSet(pub Vec<CriteriaWeight>);

impl WeightSet {
    /// Validates that every weight lies in [0, 100].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` naming the offending criterion.
    pub fn validate(&self) -> Result<(), DomainError> {
        for entry in &self.0 {
            if !(0.0..=100.0).contains(&entry.weight) {
                return Err(DomainError::Validation(format!(
                    "weight for '{}' must be between 0 and 100",
                    entry.criteria_key
                )));
            }
        }
        Ok(())
    }

    /// The configured weight for a criterion key, if any. A criterion with
    /// no configured weight contributes zero to the composite.
    #[must_use]
    pub fn weight_for(&self, key: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|entry| entry.criteria_key == key)
            .map(|entry| entry.weight)
    }
}
