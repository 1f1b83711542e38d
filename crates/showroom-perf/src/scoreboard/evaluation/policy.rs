use std::fmt;

use serde::{Deserialize, Serialize};

use super::super::domain::{ComplaintRating, MetricKey};
use super::config::ScoringConfig;
use super::rules::ScoreSignals;

/// Letter grade for a period's final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub const fn label(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failing to sell the featured vehicle alone must not force a failing grade.
const CRITICAL_ZERO_EXEMPT: MetricKey = MetricKey::Featured;

/// A record fails the critical-zero check when any non-exempt metric has a
/// goal set but a zero result.
pub(crate) fn has_critical_zero(zeroed: &[MetricKey]) -> bool {
    zeroed.iter().any(|key| *key != CRITICAL_ZERO_EXEMPT)
}

pub(crate) struct BonusBreakdown {
    pub rating: f64,
    pub complaint: f64,
}

impl BonusBreakdown {
    pub fn total(&self) -> f64 {
        self.rating + self.complaint
    }
}

pub(crate) fn bonuses(signals: &ScoreSignals, config: &ScoringConfig) -> BonusBreakdown {
    let rating = if signals.rating_score >= config.rating_bonus_threshold {
        config.bonus_value
    } else {
        0.0
    };
    let complaint = if signals.complaint_rating == ComplaintRating::Otimo {
        config.bonus_value
    } else {
        0.0
    };
    BonusBreakdown { rating, complaint }
}

/// Maps a final score to its letter grade. Thresholds compare the fractional
/// score directly (0.95 is exactly the top of B; A needs strictly more).
/// A critical zero forces F regardless of the numeric score.
pub fn grade_for(final_score: f64, has_zero_metric: bool) -> Grade {
    if has_zero_metric {
        return Grade::F;
    }
    if final_score > 0.95 {
        Grade::A
    } else if final_score >= 0.85 {
        Grade::B
    } else if final_score >= 0.75 {
        Grade::C
    } else if final_score >= 0.65 {
        Grade::D
    } else {
        Grade::F
    }
}
