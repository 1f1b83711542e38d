mod config;
mod policy;
mod rules;

pub use config::{ScoringConfig, ScoringConfigError};
pub use policy::{grade_for, Grade};

use serde::{Deserialize, Serialize};

use super::domain::{MetricKey, MetricValues, RecordId, SalespersonRecord};

/// Stateless scorer applying the rubric to roster records. Weights are
/// validated and normalized once at construction.
pub struct ScoringEngine {
    config: ScoringConfig,
    normalized_weights: MetricValues,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        config.validate()?;
        let normalized_weights = config.normalized_weights();
        Ok(Self {
            config,
            normalized_weights,
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn normalized_weights(&self) -> &MetricValues {
        &self.normalized_weights
    }

    /// Scores one record. Pure: the same record always yields the same
    /// evaluation, and the record is never modified.
    pub fn score(&self, record: &SalespersonRecord) -> Evaluation {
        let (components, attainment, signals) =
            rules::score_record(record, &self.config, &self.normalized_weights);

        let has_zero_metric = policy::has_critical_zero(&signals.zeroed);
        let base_score: f64 = components.iter().map(|component| component.weighted).sum();
        let bonus = policy::bonuses(&signals, &self.config).total();
        let final_score = (base_score + bonus).clamp(0.0, self.config.attainment_cap);

        Evaluation {
            record_id: record.id.clone(),
            attainment,
            components,
            base_score,
            bonus,
            final_score,
            has_zero_metric,
            grade: policy::grade_for(final_score, has_zero_metric),
        }
    }
}

/// Discrete per-metric contribution, kept for transparent score audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub metric: MetricKey,
    pub attainment: f64,
    pub weight: f64,
    pub weighted: f64,
    pub zeroed: bool,
    pub notes: String,
}

/// Full scoring output for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub record_id: RecordId,
    pub attainment: MetricValues,
    pub components: Vec<ScoreComponent>,
    pub base_score: f64,
    pub bonus: f64,
    pub final_score: f64,
    pub has_zero_metric: bool,
    pub grade: Grade,
}

impl Evaluation {
    /// Final score rendered the way the scoreboard shows it, e.g. "95.7%".
    pub fn final_percent(&self) -> String {
        format!("{:.1}%", self.final_score * 100.0)
    }
}
