use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub storage: StorageConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("PERF_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let data_dir = PathBuf::from(env::var("PERF_DATA_DIR").unwrap_or_else(|_| "./data".to_string()));

        let debounce_ms = env::var("PERF_DEBOUNCE_MS")
            .unwrap_or_else(|_| "120".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidDebounce)?;

        let log_level = env::var("PERF_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            storage: StorageConfig {
                data_dir,
                debounce: Duration::from_millis(debounce_ms),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Settings controlling where roster slots live and how writes coalesce.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    /// Delay after the last edit before the slot is rewritten.
    pub debounce: Duration,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PERF_DEBOUNCE_MS must be a whole number of milliseconds")]
    InvalidDebounce,
}
