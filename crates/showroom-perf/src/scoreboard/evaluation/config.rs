use serde::{Deserialize, Serialize};

use super::super::domain::MetricValues;

/// Rubric configuration: nominal metric weights, goal maxima, and the bonus
/// thresholds. Immutable for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Nominal weights; normalized to sum to 1 before use.
    pub weights: MetricValues,
    /// Upper bound for each metric's goal, also the default goal value.
    pub maxima: MetricValues,
    /// Public-rating score at or above which the rating bonus applies.
    pub rating_bonus_threshold: f64,
    /// Flat bonus granted per satisfied bonus signal.
    pub bonus_value: f64,
    /// Cap on per-metric attainment and on the final score (120%).
    pub attainment_cap: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: MetricValues {
                sales: 0.30,
                featured: 0.15,
                dispatcher: 0.15,
                finance_rate: 0.15,
                finance_profitability: 0.15,
                trade_in: 0.15,
            },
            maxima: MetricValues {
                sales: 8.0,
                featured: 2.0,
                dispatcher: 0.7,
                finance_rate: 0.35,
                finance_profitability: 3250.0,
                trade_in: 0.25,
            },
            rating_bonus_threshold: 4.6,
            bonus_value: 0.05,
            attainment_cap: 1.2,
        }
    }
}

impl ScoringConfig {
    /// Rejects rubrics whose nominal weights cannot be normalized.
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        let sum = self.weights.sum();
        if sum <= 0.0 {
            return Err(ScoringConfigError::NonPositiveWeightSum(sum));
        }
        Ok(())
    }

    /// Each nominal weight divided by the nominal sum. For a valid config the
    /// results sum to 1 within floating-point tolerance.
    pub fn normalized_weights(&self) -> MetricValues {
        let sum = self.weights.sum();
        MetricValues::from_fn(|key| self.weights.get(key) / sum)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("nominal metric weights must sum to a positive value, got {0}")]
    NonPositiveWeightSum(f64),
}
