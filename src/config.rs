//! Logging configuration parsing and validation.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::models::LogLevel;
use crate::sink::ConsoleTarget;
use crate::{AppError, Result};

/// Environment variable overriding [`LoggingConfig::log_dir`].
pub const LOG_DIR_ENV: &str = "REGIMENT_LOG_DIR";

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_module() -> String {
    "system".into()
}

/// Logging configuration parsed from `regiment-log.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Directory receiving one `<sink>.log` file per sink.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Minimum level for sinks opened lazily on first use.
    #[serde(default)]
    pub default_level: LogLevel,
    /// Console destination shared by every sink.
    #[serde(default)]
    pub console: ConsoleTarget,
    /// Sink used by `log_event` when the caller names no module.
    #[serde(default = "default_module")]
    pub default_module: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            default_level: LogLevel::default(),
            console: ConsoleTarget::default(),
            default_module: default_module(),
        }
    }
}

impl LoggingConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides. Only [`LOG_DIR_ENV`] is read.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = env::var(LOG_DIR_ENV) {
            if !dir.trim().is_empty() {
                debug!(log_dir = %dir, "log directory overridden from environment");
                self.log_dir = PathBuf::from(dir);
            }
        }
        self
    }

    fn validate(&mut self) -> Result<()> {
        if self.log_dir.as_os_str().is_empty() {
            return Err(AppError::Config("log_dir must not be empty".into()));
        }
        self.default_module = self.default_module.trim().to_owned();
        if self.default_module.is_empty() {
            return Err(AppError::Config("default_module must not be empty".into()));
        }
        Ok(())
    }
}
