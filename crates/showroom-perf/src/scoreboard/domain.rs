use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::evaluation::ScoringConfig;
use super::numeric::RawValue;
use crate::tenancy::slugify;

/// The fixed set of scored metrics. Iteration order is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    Sales,
    Featured,
    Dispatcher,
    FinanceRate,
    FinanceProfitability,
    TradeIn,
}

impl MetricKey {
    pub const ALL: [MetricKey; 6] = [
        MetricKey::Sales,
        MetricKey::Featured,
        MetricKey::Dispatcher,
        MetricKey::FinanceRate,
        MetricKey::FinanceProfitability,
        MetricKey::TradeIn,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            MetricKey::Sales => "Sales",
            MetricKey::Featured => "Featured vehicle",
            MetricKey::Dispatcher => "Dispatcher",
            MetricKey::FinanceRate => "F&I rate",
            MetricKey::FinanceProfitability => "F&I profitability",
            MetricKey::TradeIn => "Trade-in",
        }
    }

    /// Parses a metric name as typed on the command line. Case, dashes, and
    /// underscores are ignored, so `financeRate`, `finance-rate`, and
    /// `FINANCE_RATE` all resolve.
    pub fn parse_key(raw: &str) -> Option<Self> {
        let folded: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "sales" => Some(MetricKey::Sales),
            "featured" => Some(MetricKey::Featured),
            "dispatcher" => Some(MetricKey::Dispatcher),
            "financerate" => Some(MetricKey::FinanceRate),
            "financeprofitability" => Some(MetricKey::FinanceProfitability),
            "tradein" => Some(MetricKey::TradeIn),
            _ => None,
        }
    }
}

/// Fixed-size per-metric value table. Keeping one field per metric instead of
/// an open map removes runtime key-existence checks from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValues {
    pub sales: f64,
    pub featured: f64,
    pub dispatcher: f64,
    pub finance_rate: f64,
    pub finance_profitability: f64,
    pub trade_in: f64,
}

impl MetricValues {
    pub fn get(&self, key: MetricKey) -> f64 {
        match key {
            MetricKey::Sales => self.sales,
            MetricKey::Featured => self.featured,
            MetricKey::Dispatcher => self.dispatcher,
            MetricKey::FinanceRate => self.finance_rate,
            MetricKey::FinanceProfitability => self.finance_profitability,
            MetricKey::TradeIn => self.trade_in,
        }
    }

    pub fn set(&mut self, key: MetricKey, value: f64) {
        match key {
            MetricKey::Sales => self.sales = value,
            MetricKey::Featured => self.featured = value,
            MetricKey::Dispatcher => self.dispatcher = value,
            MetricKey::FinanceRate => self.finance_rate = value,
            MetricKey::FinanceProfitability => self.finance_profitability = value,
            MetricKey::TradeIn => self.trade_in = value,
        }
    }

    pub fn from_fn(mut f: impl FnMut(MetricKey) -> f64) -> Self {
        let mut values = MetricValues::default();
        for key in MetricKey::ALL {
            values.set(key, f(key));
        }
        values
    }

    pub fn sum(&self) -> f64 {
        MetricKey::ALL.iter().map(|key| self.get(*key)).sum()
    }
}

/// Per-metric goal cells as entered. Missing keys deserialize to the
/// configured metric maximum; serialization always emits all six keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoalSheet {
    pub sales: RawValue,
    pub featured: RawValue,
    pub dispatcher: RawValue,
    pub finance_rate: RawValue,
    pub finance_profitability: RawValue,
    pub trade_in: RawValue,
}

impl GoalSheet {
    pub fn from_values(values: &MetricValues) -> Self {
        Self {
            sales: RawValue::from(values.sales),
            featured: RawValue::from(values.featured),
            dispatcher: RawValue::from(values.dispatcher),
            finance_rate: RawValue::from(values.finance_rate),
            finance_profitability: RawValue::from(values.finance_profitability),
            trade_in: RawValue::from(values.trade_in),
        }
    }

    pub fn get(&self, key: MetricKey) -> &RawValue {
        match key {
            MetricKey::Sales => &self.sales,
            MetricKey::Featured => &self.featured,
            MetricKey::Dispatcher => &self.dispatcher,
            MetricKey::FinanceRate => &self.finance_rate,
            MetricKey::FinanceProfitability => &self.finance_profitability,
            MetricKey::TradeIn => &self.trade_in,
        }
    }

    pub fn set(&mut self, key: MetricKey, value: RawValue) {
        match key {
            MetricKey::Sales => self.sales = value,
            MetricKey::Featured => self.featured = value,
            MetricKey::Dispatcher => self.dispatcher = value,
            MetricKey::FinanceRate => self.finance_rate = value,
            MetricKey::FinanceProfitability => self.finance_profitability = value,
            MetricKey::TradeIn => self.trade_in = value,
        }
    }
}

impl Default for GoalSheet {
    fn default() -> Self {
        Self::from_values(&ScoringConfig::default().maxima)
    }
}

/// Per-metric actual results as entered. Missing keys deserialize to "0".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActualSheet {
    pub sales: RawValue,
    pub featured: RawValue,
    pub dispatcher: RawValue,
    pub finance_rate: RawValue,
    pub finance_profitability: RawValue,
    pub trade_in: RawValue,
}

impl ActualSheet {
    pub fn get(&self, key: MetricKey) -> &RawValue {
        match key {
            MetricKey::Sales => &self.sales,
            MetricKey::Featured => &self.featured,
            MetricKey::Dispatcher => &self.dispatcher,
            MetricKey::FinanceRate => &self.finance_rate,
            MetricKey::FinanceProfitability => &self.finance_profitability,
            MetricKey::TradeIn => &self.trade_in,
        }
    }

    pub fn set(&mut self, key: MetricKey, value: RawValue) {
        match key {
            MetricKey::Sales => self.sales = value,
            MetricKey::Featured => self.featured = value,
            MetricKey::Dispatcher => self.dispatcher = value,
            MetricKey::FinanceRate => self.finance_rate = value,
            MetricKey::FinanceProfitability => self.finance_profitability = value,
            MetricKey::TradeIn => self.trade_in = value,
        }
    }
}

impl Default for ActualSheet {
    fn default() -> Self {
        Self {
            sales: RawValue::new("0"),
            featured: RawValue::new("0"),
            dispatcher: RawValue::new("0"),
            finance_rate: RawValue::new("0"),
            finance_profitability: RawValue::new("0"),
            trade_in: RawValue::new("0"),
        }
    }
}

/// Complaint-site rating scale. Parsing is case- and accent-insensitive;
/// anything unrecognized maps to [`ComplaintRating::Unset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComplaintRating {
    #[default]
    Unset,
    Otimo,
    Bom,
    Regular,
    Ruim,
    Pessimo,
}

impl ComplaintRating {
    pub const fn label(self) -> &'static str {
        match self {
            ComplaintRating::Unset => "",
            ComplaintRating::Otimo => "Ótimo",
            ComplaintRating::Bom => "Bom",
            ComplaintRating::Regular => "Regular",
            ComplaintRating::Ruim => "Ruim",
            ComplaintRating::Pessimo => "Péssimo",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match slugify(raw).as_str() {
            "otimo" => ComplaintRating::Otimo,
            "bom" => ComplaintRating::Bom,
            "regular" => ComplaintRating::Regular,
            "ruim" => ComplaintRating::Ruim,
            "pessimo" => ComplaintRating::Pessimo,
            _ => ComplaintRating::Unset,
        }
    }
}

impl Serialize for ComplaintRating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ComplaintRating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Secondary inputs that can add a flat bonus to the final score.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BonusSignals {
    pub rating_score: RawValue,
    pub complaint_rating: ComplaintRating,
}

/// Identifier wrapper for roster records. Assigned once at creation and
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

static RECORD_SEQUENCE: AtomicU64 = AtomicU64::new(0);

impl RecordId {
    /// Millisecond timestamp plus a process-local sequence, so identifiers
    /// stay unique across sessions that append to the same slot.
    pub fn generate() -> Self {
        let sequence = RECORD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        RecordId(format!("sp-{millis:x}-{sequence:04x}"))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One salesperson's goals, results, and bonus signals for the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalespersonRecord {
    #[serde(default = "RecordId::generate")]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub store_label: String,
    #[serde(default)]
    pub goals: GoalSheet,
    #[serde(default)]
    pub actuals: ActualSheet,
    #[serde(default)]
    pub bonus_signals: BonusSignals,
    #[serde(default)]
    pub notes: String,
}

impl SalespersonRecord {
    /// A fresh record: goals preset to the configured maxima, actuals at "0",
    /// store label stamped from the active tenant.
    pub fn new(store_label: &str) -> Self {
        Self {
            id: RecordId::generate(),
            name: String::new(),
            store_label: store_label.to_string(),
            goals: GoalSheet::default(),
            actuals: ActualSheet::default(),
            bonus_signals: BonusSignals::default(),
            notes: String::new(),
        }
    }

    /// Immutable field update: returns a new record with `field` replaced,
    /// sharing no mutable state with `self`.
    pub fn with_field(&self, field: RecordField, value: &str) -> Self {
        let mut next = self.clone();
        match field {
            RecordField::Name => next.name = value.to_string(),
            RecordField::StoreLabel => next.store_label = value.to_string(),
            RecordField::Notes => next.notes = value.to_string(),
            RecordField::Goal(key) => next.goals.set(key, RawValue::new(value)),
            RecordField::Actual(key) => next.actuals.set(key, RawValue::new(value)),
            RecordField::RatingScore => next.bonus_signals.rating_score = RawValue::new(value),
            RecordField::ComplaintRating => {
                next.bonus_signals.complaint_rating = ComplaintRating::parse(value)
            }
        }
        next
    }
}

/// Field path for record edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Name,
    StoreLabel,
    Notes,
    Goal(MetricKey),
    Actual(MetricKey),
    RatingScore,
    ComplaintRating,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_defaults_goals_to_maxima() {
        let record = SalespersonRecord::new("Toyota Morumbi");
        assert_eq!(record.store_label, "Toyota Morumbi");
        assert_eq!(record.goals.get(MetricKey::Sales).as_number(), 8.0);
        assert_eq!(record.goals.get(MetricKey::TradeIn).as_number(), 0.25);
        assert_eq!(record.actuals.get(MetricKey::Sales).as_str(), "0");
        assert_eq!(record.bonus_signals.complaint_rating, ComplaintRating::Unset);
    }

    #[test]
    fn with_field_leaves_the_original_untouched() {
        let record = SalespersonRecord::new("BYD Ibirapuera");
        let edited = record.with_field(RecordField::Actual(MetricKey::Sales), "7");
        assert_eq!(record.actuals.get(MetricKey::Sales).as_str(), "0");
        assert_eq!(edited.actuals.get(MetricKey::Sales).as_str(), "7");
        assert_eq!(edited.id, record.id);
    }

    #[test]
    fn complaint_rating_parses_accent_insensitively() {
        assert_eq!(ComplaintRating::parse("Ótimo"), ComplaintRating::Otimo);
        assert_eq!(ComplaintRating::parse("otimo"), ComplaintRating::Otimo);
        assert_eq!(ComplaintRating::parse("PÉSSIMO"), ComplaintRating::Pessimo);
        assert_eq!(ComplaintRating::parse("bom"), ComplaintRating::Bom);
        assert_eq!(ComplaintRating::parse("mediano"), ComplaintRating::Unset);
        assert_eq!(ComplaintRating::parse(""), ComplaintRating::Unset);
    }

    #[test]
    fn records_deserialize_with_missing_keys_filled() {
        let raw = r#"{
            "name": "Ana",
            "goals": { "sales": 6 },
            "actuals": { "sales": "4", "dispatcher": 0.5 }
        }"#;
        let record: SalespersonRecord = serde_json::from_str(raw).expect("partial record");
        assert_eq!(record.name, "Ana");
        assert_eq!(record.goals.get(MetricKey::Sales).as_number(), 6.0);
        // untouched goal cells fall back to the configured maxima
        assert_eq!(record.goals.get(MetricKey::Featured).as_number(), 2.0);
        assert_eq!(record.actuals.get(MetricKey::Dispatcher).as_number(), 0.5);
        assert_eq!(record.actuals.get(MetricKey::TradeIn).as_str(), "0");
        assert!(!record.id.0.is_empty());
    }

    #[test]
    fn record_serialization_emits_every_metric_key() {
        let record = SalespersonRecord::new("Hyundai Guarulhos");
        let json = serde_json::to_value(&record).expect("serialize");
        for key in ["sales", "featured", "dispatcher", "financeRate", "financeProfitability", "tradeIn"] {
            assert!(json["goals"].get(key).is_some(), "missing goal key {key}");
            assert!(json["actuals"].get(key).is_some(), "missing actual key {key}");
        }
        assert_eq!(json["bonusSignals"]["complaintRating"], "");
    }

    #[test]
    fn metric_key_parsing_accepts_common_spellings() {
        assert_eq!(MetricKey::parse_key("financeRate"), Some(MetricKey::FinanceRate));
        assert_eq!(MetricKey::parse_key("finance-rate"), Some(MetricKey::FinanceRate));
        assert_eq!(MetricKey::parse_key("trade_in"), Some(MetricKey::TradeIn));
        assert_eq!(MetricKey::parse_key("sales"), Some(MetricKey::Sales));
        assert_eq!(MetricKey::parse_key("margin"), None);
    }

    #[test]
    fn record_ids_are_unique() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
    }
}
