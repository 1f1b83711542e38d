use super::domain::SalespersonRecord;

/// Storage abstraction for tenant-keyed roster slots, so the service can be
/// exercised against in-memory storage in tests.
pub trait RosterRepository: Send + Sync {
    /// Reads the slot. `Ok(None)` means the slot has never been written.
    fn load(&self, slot: &str) -> Result<Option<Vec<SalespersonRecord>>, RepositoryError>;

    /// Replaces the slot contents with the given roster snapshot.
    fn save(&self, slot: &str, records: &[SalespersonRecord]) -> Result<(), RepositoryError>;
}

/// Error enumeration for slot storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("slot storage unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("slot contents are not a valid roster: {0}")]
    Malformed(#[from] serde_json::Error),
}
