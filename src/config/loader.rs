//! Configuration loading utilities

use std::env;
use std::fs;
use std::path::Path;

use super::EngineConfig;
use crate::error::{Error, Result};

pub const ENV_CONFIG_FILE: &str = "FRAMEKIT_CONFIG_FILE";
pub const ENV_WORKER_THREADS: &str = "FRAMEKIT_WORKER_THREADS";
pub const ENV_MIN_PARALLEL_LEN: &str = "FRAMEKIT_MIN_PARALLEL_LEN";
pub const ENV_LOG_LEVEL: &str = "FRAMEKIT_LOG_LEVEL";

/// Load configuration from environment variables
pub fn load_from_env() -> Result<EngineConfig> {
    let mut config = EngineConfig::default();
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Overwrites the fields whose environment variable is set
pub fn apply_env_overrides(config: &mut EngineConfig) -> Result<()> {
    if let Ok(threads) = env::var(ENV_WORKER_THREADS) {
        config.threading.worker_threads = threads.trim().parse().map_err(|e| {
            Error::ConfigurationError(format!("Invalid {}: {}", ENV_WORKER_THREADS, e))
        })?;
    }

    if let Ok(len) = env::var(ENV_MIN_PARALLEL_LEN) {
        config.threading.min_parallel_len = len.trim().parse().map_err(|e| {
            Error::ConfigurationError(format!("Invalid {}: {}", ENV_MIN_PARALLEL_LEN, e))
        })?;
    }

    if let Ok(level) = env::var(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }

    Ok(())
}

/// Load configuration from a file (YAML or TOML based on extension)
pub fn load_from_file(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        return Err(Error::ConfigurationError(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        Error::ConfigurationError(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => load_from_yaml(&contents),
        Some("toml") => load_from_toml(&contents),
        Some(ext) => Err(Error::ConfigurationError(format!(
            "Unsupported config file format: {}",
            ext
        ))),
        None => load_from_yaml(&contents).or_else(|_| load_from_toml(&contents)),
    }
}

pub fn load_from_yaml(yaml: &str) -> Result<EngineConfig> {
    serde_yaml::from_str(yaml)
        .map_err(|e| Error::ConfigurationError(format!("Failed to parse YAML config: {}", e)))
}

pub fn load_from_toml(toml: &str) -> Result<EngineConfig> {
    toml::from_str(toml)
        .map_err(|e| Error::ConfigurationError(format!("Failed to parse TOML config: {}", e)))
}

/// Load configuration with precedence: defaults -> file -> environment
pub fn load_with_precedence<P: AsRef<Path>>(config_file: Option<P>) -> Result<EngineConfig> {
    let mut config = match config_file {
        Some(path) => load_from_file(path.as_ref())?,
        None => EngineConfig::default(),
    };
    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Same as [`load_with_precedence`] with the file named by `FRAMEKIT_CONFIG_FILE`
pub fn load() -> Result<EngineConfig> {
    load_with_precedence(env::var(ENV_CONFIG_FILE).ok())
}
