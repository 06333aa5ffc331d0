//! Centralized configuration management for fieldgrid

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file with the table rows; built-in sample data when unset
    pub data_path: Option<PathBuf>,
    /// Directory the log file is written to
    pub log_dir: PathBuf,
    /// Log file name inside `log_dir`
    pub log_file: String,
    /// Whether the table shows the checkbox column
    pub selectable: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            log_dir: PathBuf::from("."),
            log_file: "fieldgrid.log".to_string(),
            selectable: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let data_path = std::env::var("FIELDGRID_DATA_PATH").ok().map(PathBuf::from);

        let log_dir = std::env::var("FIELDGRID_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);

        let log_file = std::env::var("FIELDGRID_LOG_FILE").unwrap_or(defaults.log_file);

        let selectable = parse_env_var("FIELDGRID_SELECTABLE")?.unwrap_or(defaults.selectable);

        Ok(Config {
            data_path,
            log_dir,
            log_file,
            selectable,
        })
    }

    /// Full path of the log file
    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(&self.log_file)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(ref path) = self.data_path {
            if !path.is_file() {
                return Err(anyhow::anyhow!(
                    "Data file does not exist: {}",
                    path.display()
                ));
            }
        }

        std::fs::create_dir_all(&self.log_dir)
            .with_context(|| format!("Cannot create log directory: {}", self.log_dir.display()))?;

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}
