//! Engine configuration
//!
//! Settings come from, in increasing precedence: built-in defaults, a YAML or
//! TOML file, and `FRAMEKIT_*` environment variables.

use std::path::Path;
use std::str::FromStr;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod loader;

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Worker pool settings
    pub threading: ThreadingConfig,
    /// Log level exposed to the embedding application
    pub logging: LoggingConfig,
}

/// Threading configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadingConfig {
    /// Number of worker threads (0 = one per logical CPU)
    pub worker_threads: usize,
    /// Smallest slice of a parallel range handed to one worker
    pub min_parallel_len: usize,
}

impl Default for ThreadingConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            min_parallel_len: 1,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level name understood by `log::LevelFilter` (off, error, warn, info, debug, trace)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl ThreadingConfig {
    /// Worker count after resolving 0 to the number of logical CPUs
    pub fn effective_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            num_cpus::get()
        } else {
            self.worker_threads
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        loader::load_from_env()
    }

    /// Load configuration from a file (YAML or TOML)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        loader::load_from_file(path.as_ref())
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        loader::load_from_yaml(yaml)
    }

    pub fn from_toml(toml: &str) -> Result<Self> {
        loader::load_from_toml(toml)
    }

    /// defaults -> `FRAMEKIT_CONFIG_FILE` (if set) -> environment
    pub fn load() -> Result<Self> {
        loader::load()
    }

    /// Validate configuration and return errors if invalid
    pub fn validate(&self) -> Result<()> {
        if self.threading.min_parallel_len == 0 {
            return Err(Error::ConfigurationError(
                "threading.min_parallel_len must be at least 1".to_string(),
            ));
        }
        self.log_level_filter().map(|_| ())
    }

    /// Parsed `logging.level`
    pub fn log_level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(self.logging.level.trim()).map_err(|_| {
            Error::ConfigurationError(format!("Unknown log level: {}", self.logging.level))
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            Error::ConfigurationError(format!("Failed to serialize config to YAML: {}", e))
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| {
            Error::ConfigurationError(format!("Failed to serialize config to TOML: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.log_level_filter().unwrap(), LevelFilter::Warn);
        assert!(config.threading.effective_worker_threads() >= 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.threading.min_parallel_len = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.logging.level = "loud".to_string();
        assert!(matches!(config.validate(), Err(Error::ConfigurationError(_))));
    }
}
