use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::domain::{RecordField, RecordId, SalespersonRecord};
use super::evaluation::{Evaluation, ScoringConfig, ScoringConfigError, ScoringEngine};
use super::repository::{RepositoryError, RosterRepository};
use super::store::DebouncedWriter;
use crate::tenancy::Store;

/// Session facade over one tenant's roster.
///
/// The in-memory roster is the single source of truth; the persisted slot is
/// a best-effort mirror refreshed through the debounced writer after every
/// settled change. Dropping the service flushes any pending write.
pub struct RosterService<R: RosterRepository + 'static> {
    repository: Arc<R>,
    tenant: Store,
    read_only: bool,
    engine: ScoringEngine,
    records: Vec<SalespersonRecord>,
    writer: DebouncedWriter,
}

impl<R: RosterRepository + 'static> RosterService<R> {
    /// Loads the tenant's slot, falling back to one default record when the
    /// slot is missing or malformed. A slot holding an empty roster is
    /// authoritative and stays empty. Load failures are logged, never
    /// surfaced: the session always starts usable.
    pub fn open(
        repository: Arc<R>,
        tenant: Store,
        read_only: bool,
        config: ScoringConfig,
        debounce: Duration,
    ) -> Result<Self, RosterServiceError> {
        let engine = ScoringEngine::new(config)?;

        let records = match repository.load(tenant.slot()) {
            Ok(Some(records)) => records,
            Ok(None) => vec![SalespersonRecord::new(tenant.label())],
            Err(err) => {
                warn!(slot = tenant.slot(), error = %err, "roster slot unreadable, starting from defaults");
                vec![SalespersonRecord::new(tenant.label())]
            }
        };

        info!(
            slot = tenant.slot(),
            records = records.len(),
            read_only,
            "roster session opened"
        );

        let writer = DebouncedWriter::spawn(repository.clone(), tenant.slot().to_string(), debounce);

        Ok(Self {
            repository,
            tenant,
            read_only,
            engine,
            records,
            writer,
        })
    }

    pub fn tenant(&self) -> &Store {
        &self.tenant
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn records(&self) -> &[SalespersonRecord] {
        &self.records
    }

    pub fn find(&self, id: &RecordId) -> Option<&SalespersonRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    fn guard_mutation(&self) -> Result<(), RosterServiceError> {
        if self.read_only {
            return Err(RosterServiceError::ReadOnly);
        }
        Ok(())
    }

    /// Queues the current roster for persistence, restarting the debounce
    /// timer.
    fn settle(&self) {
        self.writer.schedule(self.records.clone());
    }

    /// Adds a default-initialized record stamped with the tenant's label.
    pub fn create(&mut self) -> Result<SalespersonRecord, RosterServiceError> {
        self.guard_mutation()?;
        let record = SalespersonRecord::new(self.tenant.label());
        self.records.push(record.clone());
        self.settle();
        Ok(record)
    }

    /// Replaces one field of one record. The stored record is swapped for a
    /// fresh value; the previous snapshot is never mutated in place.
    pub fn apply_edit(
        &mut self,
        id: &RecordId,
        field: RecordField,
        value: &str,
    ) -> Result<SalespersonRecord, RosterServiceError> {
        self.guard_mutation()?;
        let index = self
            .records
            .iter()
            .position(|record| &record.id == id)
            .ok_or_else(|| RosterServiceError::UnknownRecord(id.clone()))?;
        let next = self.records[index].with_field(field, value);
        self.records[index] = next.clone();
        self.settle();
        Ok(next)
    }

    pub fn remove(&mut self, id: &RecordId) -> Result<(), RosterServiceError> {
        self.guard_mutation()?;
        let before = self.records.len();
        self.records.retain(|record| &record.id != id);
        if self.records.len() == before {
            return Err(RosterServiceError::UnknownRecord(id.clone()));
        }
        self.settle();
        Ok(())
    }

    pub fn evaluate(&self, id: &RecordId) -> Result<Evaluation, RosterServiceError> {
        let record = self
            .find(id)
            .ok_or_else(|| RosterServiceError::UnknownRecord(id.clone()))?;
        Ok(self.engine.score(record))
    }

    pub fn evaluate_all(&self) -> Vec<(&SalespersonRecord, Evaluation)> {
        self.records
            .iter()
            .map(|record| (record, self.engine.score(record)))
            .collect()
    }

    /// Pretty-printed JSON array of the whole roster.
    pub fn export_json(&self) -> Result<String, RosterServiceError> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    /// Default export filename, keyed by the tenant slot.
    pub fn export_filename(&self) -> String {
        format!("performance_{}.json", self.tenant.slot())
    }

    /// Scoreboard summary as CSV: one row per record with score and grade.
    pub fn export_csv(&self) -> Result<String, RosterServiceError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "id",
            "name",
            "storeLabel",
            "baseScore",
            "bonus",
            "finalScore",
            "grade",
            "criticalZero",
        ])?;
        for (record, evaluation) in self.evaluate_all() {
            writer.write_record([
                record.id.0.as_str(),
                record.name.as_str(),
                record.store_label.as_str(),
                &format!("{:.4}", evaluation.base_score),
                &format!("{:.2}", evaluation.bonus),
                &format!("{:.4}", evaluation.final_score),
                evaluation.grade.label(),
                if evaluation.has_zero_metric { "yes" } else { "no" },
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| RepositoryError::Io(err.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Replaces the roster from an exported JSON array. Malformed payloads
    /// and non-array payloads reset the roster to one default record; the
    /// returned error is surfaced once to the user. Deliberately available
    /// in read-only sessions, like export.
    pub fn import_json(&mut self, raw: &str) -> Result<usize, ImportError> {
        let outcome = match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(value) if value.is_array() => match serde_json::from_value(value) {
                Ok(records) => Ok(records),
                Err(err) => Err(ImportError::Parse(err)),
            },
            Ok(_) => Err(ImportError::NotAnArray),
            Err(err) => Err(ImportError::Parse(err)),
        };

        match outcome {
            Ok(records) => {
                self.records = records;
                self.settle();
                Ok(self.records.len())
            }
            Err(err) => {
                warn!(slot = self.tenant.slot(), error = %err, "import failed, roster reset to defaults");
                self.records = vec![SalespersonRecord::new(self.tenant.label())];
                self.settle();
                Err(err)
            }
        }
    }

    /// Repository handle, mainly for tests that inspect the slot directly.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }
}

/// Error raised by roster operations.
#[derive(Debug, thiserror::Error)]
pub enum RosterServiceError {
    #[error("this session is read-only")]
    ReadOnly,
    #[error("no salesperson with id {0}")]
    UnknownRecord(RecordId),
    #[error(transparent)]
    Config(#[from] ScoringConfigError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("export failed: {0}")]
    Export(#[from] serde_json::Error),
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Import failures; the roster has already been reset when these surface.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("expected a JSON array of salesperson records")]
    NotAnArray,
}
