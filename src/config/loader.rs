//! Configuration loader

use config::{Config, Environment, File, FileFormat};
use std::path::Path;

use super::types::AppConfig;
use crate::common::errors::{PlannerError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with EXPEDITION_)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    // Pick up a local .env before reading the environment
    dotenvy::dotenv().ok();

    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::new(path, FileFormat::Toml).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("EXPEDITION")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| PlannerError::Configuration(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| PlannerError::Configuration(e.to_string()))
}

/// Parse configuration from an in-memory TOML document
pub fn load_from_str(toml: &str) -> Result<AppConfig> {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .and_then(|config| config.try_deserialize())
        .map_err(|e| PlannerError::Configuration(e.to_string()))
}
