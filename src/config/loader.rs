//! Configuration loader with environment variable support

use super::{validation, Settings};
use crate::error::Result;
use config::{Environment, File};
use std::path::Path;

/// Prefix for environment overrides, e.g. `QDRANT_ADDON__ADDON__URL`
pub const ENV_PREFIX: &str = "QDRANT_ADDON";

/// Load settings from a TOML file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let config = config::Config::builder()
        .add_source(File::from(path.as_ref()))
        .build()?;

    let settings: Settings = config.try_deserialize()?;
    validation::validate_settings(&settings)?;
    Ok(settings)
}

/// Load settings from a TOML file with environment variable overrides
pub fn load_settings_with_env<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let config = config::Config::builder()
        .add_source(File::from(path.as_ref()))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
        )
        .build()?;

    let settings: Settings = config.try_deserialize()?;
    validation::validate_settings(&settings)?;
    Ok(settings)
}
