//! Configuration management.
//!
//! Configuration can be set via environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `DATASET_PATH` - Optional. CSV file loaded for every pipeline run. Defaults to `dataset.csv`.
//! - `STRICT_TASK_RESOLUTION` - Optional. When true, unknown task names produce an
//!   error report instead of being skipped. Defaults to `false`.

use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::UnresolvedTask;
use crate::util::env_var_bool;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Dataset loaded for each pipeline run
    pub dataset_path: PathBuf,

    /// Report unknown task names instead of skipping them
    pub strict_task_resolution: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let dataset_path = std::env::var("DATASET_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("dataset.csv"));

        let strict_task_resolution = env_var_bool("STRICT_TASK_RESOLUTION", false);

        Ok(Self {
            host,
            port,
            dataset_path,
            strict_task_resolution,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            dataset_path: dataset_path.into(),
            strict_task_resolution: false,
        }
    }

    /// How the runner treats task names the registry does not know.
    pub fn unresolved_policy(&self) -> UnresolvedTask {
        if self.strict_task_resolution {
            UnresolvedTask::Report
        } else {
            UnresolvedTask::Skip
        }
    }
}
