//! Roster records, the scoring engine, and tenant-keyed persistence.

pub mod domain;
pub mod evaluation;
pub mod numeric;
pub mod repository;
pub mod service;
pub mod store;

pub use domain::{
    ActualSheet, BonusSignals, ComplaintRating, GoalSheet, MetricKey, MetricValues, RecordField,
    RecordId, SalespersonRecord,
};
pub use evaluation::{
    grade_for, Evaluation, Grade, ScoreComponent, ScoringConfig, ScoringConfigError, ScoringEngine,
};
pub use numeric::{coerce, RawValue};
pub use repository::{RepositoryError, RosterRepository};
pub use service::{ImportError, RosterService, RosterServiceError};
pub use store::{DebouncedWriter, InMemoryRoster, JsonSlotStore};
