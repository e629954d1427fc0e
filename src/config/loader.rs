//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `upstream.api_base_url`.
pub const API_BASE_URL_ENV: &str = "ATS_API_BASE_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;
    prepare(config)
}

/// Apply environment overrides and validate an in-memory configuration.
pub fn prepare(mut config: GatewayConfig) -> Result<GatewayConfig, ConfigError> {
    if let Ok(base_url) = std::env::var(API_BASE_URL_ENV) {
        if !base_url.trim().is_empty() {
            config.upstream.api_base_url = base_url;
        }
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
