use crate::config::ConfigError;
use crate::scoreboard::{ImportError, RosterServiceError};
use crate::telemetry::TelemetryError;

/// Top-level error for binaries built on this crate.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Roster(#[from] RosterServiceError),
    #[error("import failed: {0}")]
    Import(#[from] ImportError),
}
