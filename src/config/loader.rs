//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `backend.host`.
pub const MODULE_HOST_ENV: &str = "MODULE_HOST";
/// Environment variable overriding `backend.port`.
pub const MODULE_PORT_ENV: &str = "MODULE_PORT";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("MODULE_PORT is not a port number: {0}")]
    InvalidPortOverride(String),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProxyConfig::default(),
    };

    let config = apply_overrides(config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `MODULE_HOST` / `MODULE_PORT` style overrides read through `lookup`.
pub fn apply_overrides<F>(mut config: ProxyConfig, lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup(MODULE_HOST_ENV) {
        config.backend.host = host;
    }
    if let Some(port) = lookup(MODULE_PORT_ENV) {
        config.backend.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPortOverride(port))?;
    }
    Ok(config)
}
