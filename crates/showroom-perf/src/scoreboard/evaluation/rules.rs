use super::super::domain::{ComplaintRating, MetricKey, MetricValues, SalespersonRecord};
use super::config::ScoringConfig;
use super::ScoreComponent;

pub(crate) struct ScoreSignals {
    pub zeroed: Vec<MetricKey>,
    pub rating_score: f64,
    pub complaint_rating: ComplaintRating,
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Upper bound for actual results: counts stay generous, proportion-style
/// metrics cannot exceed 100%, profitability is bounded against fat-finger
/// entries.
const fn actual_ceiling(key: MetricKey) -> f64 {
    match key {
        MetricKey::Sales | MetricKey::Featured => 9999.0,
        MetricKey::Dispatcher | MetricKey::FinanceRate | MetricKey::TradeIn => 1.0,
        MetricKey::FinanceProfitability => 999_999.0,
    }
}

pub(crate) fn clamped_goals(record: &SalespersonRecord, config: &ScoringConfig) -> MetricValues {
    MetricValues::from_fn(|key| {
        clamp(record.goals.get(key).as_number(), 0.0, config.maxima.get(key))
    })
}

pub(crate) fn clamped_actuals(record: &SalespersonRecord) -> MetricValues {
    MetricValues::from_fn(|key| {
        clamp(record.actuals.get(key).as_number(), 0.0, actual_ceiling(key))
    })
}

/// Goal-attainment ratio for one metric, capped at the configured
/// over-achievement ceiling. A zero goal earns no credit and never divides.
fn attainment(goal: f64, actual: f64, cap: f64) -> f64 {
    if goal > 0.0 {
        clamp(actual / goal, 0.0, cap)
    } else {
        0.0
    }
}

pub(crate) fn score_record(
    record: &SalespersonRecord,
    config: &ScoringConfig,
    normalized_weights: &MetricValues,
) -> (Vec<ScoreComponent>, MetricValues, ScoreSignals) {
    let goals = clamped_goals(record, config);
    let actuals = clamped_actuals(record);

    let attainments =
        MetricValues::from_fn(|key| attainment(goals.get(key), actuals.get(key), config.attainment_cap));

    let mut components = Vec::with_capacity(MetricKey::ALL.len());
    let mut zeroed = Vec::new();

    for key in MetricKey::ALL {
        let goal = goals.get(key);
        let actual = actuals.get(key);
        let attained = attainments.get(key);
        let weight = normalized_weights.get(key);
        let is_zeroed = goal > 0.0 && actual == 0.0;

        if is_zeroed {
            zeroed.push(key);
        }

        let notes = if is_zeroed {
            format!("goal {goal} set but no result recorded")
        } else if goal > 0.0 {
            format!("attained {:.1}% of goal {goal}", attained * 100.0)
        } else {
            "no goal set".to_string()
        };

        components.push(ScoreComponent {
            metric: key,
            attainment: attained,
            weight,
            weighted: attained * weight,
            zeroed: is_zeroed,
            notes,
        });
    }

    let signals = ScoreSignals {
        zeroed,
        rating_score: record.bonus_signals.rating_score.as_number(),
        complaint_rating: record.bonus_signals.complaint_rating,
    };

    (components, attainments, signals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoreboard::domain::RecordField;

    fn record_with(goal: &str, actual: &str, key: MetricKey) -> SalespersonRecord {
        SalespersonRecord::new("Loja Padrão")
            .with_field(RecordField::Goal(key), goal)
            .with_field(RecordField::Actual(key), actual)
    }

    #[test]
    fn attainment_is_capped_at_120_percent() {
        assert_eq!(attainment(8.0, 16.0, 1.2), 1.2);
        assert_eq!(attainment(8.0, 8.0, 1.2), 1.0);
        assert_eq!(attainment(8.0, 4.0, 1.2), 0.5);
    }

    #[test]
    fn zero_goal_earns_no_credit() {
        assert_eq!(attainment(0.0, 5.0, 1.2), 0.0);
    }

    #[test]
    fn goals_clamp_to_the_configured_maximum() {
        let config = ScoringConfig::default();
        let record = record_with("50", "8", MetricKey::Sales);
        let goals = clamped_goals(&record, &config);
        assert_eq!(goals.get(MetricKey::Sales), 8.0);
    }

    #[test]
    fn rate_actuals_clamp_to_one() {
        let record = record_with("0.7", "1.8", MetricKey::Dispatcher);
        let actuals = clamped_actuals(&record);
        assert_eq!(actuals.get(MetricKey::Dispatcher), 1.0);
    }

    #[test]
    fn negative_entries_clamp_to_zero() {
        let record = record_with("8", "-3", MetricKey::Sales);
        let actuals = clamped_actuals(&record);
        assert_eq!(actuals.get(MetricKey::Sales), 0.0);
    }

    #[test]
    fn zeroed_metrics_are_flagged_in_components() {
        let config = ScoringConfig::default();
        let record = record_with("0.35", "0", MetricKey::FinanceRate);
        let (components, _, signals) =
            score_record(&record, &config, &config.normalized_weights());
        assert!(signals.zeroed.contains(&MetricKey::FinanceRate));
        let component = components
            .iter()
            .find(|c| c.metric == MetricKey::FinanceRate)
            .expect("component present");
        assert!(component.zeroed);
        assert_eq!(component.attainment, 0.0);
    }
}
