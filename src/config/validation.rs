//! Configuration validation

use super::*;
use crate::error::{AddonError, Result};

/// Upper bound for the per-request timeout
const MAX_TIMEOUT_SECS: u64 = 3600;

/// Validate complete settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_addon_config(&settings.addon)?;
    validate_logging_config(&settings.logging)?;
    validate_server_config(&settings.server)?;
    Ok(())
}

/// Validate the addon configuration
pub fn validate_addon_config(config: &AddonConfig) -> Result<()> {
    if config.id.trim().is_empty() {
        return Err(AddonError::Config(
            "Addon id cannot be empty".to_string()
        ));
    }

    if config.name.trim().is_empty() {
        return Err(AddonError::Config(
            "Addon name cannot be empty".to_string()
        ));
    }

    if let Some(url) = config.url.as_deref().filter(|u| !u.is_empty()) {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AddonError::Config(
                "Qdrant URL must start with http:// or https://".to_string()
            ));
        }
    }

    if config.port == 0 {
        return Err(AddonError::Config(
            "Qdrant port must be greater than 0".to_string()
        ));
    }

    if config.grpc_port == Some(0) {
        return Err(AddonError::Config(
            "Qdrant gRPC port must be greater than 0".to_string()
        ));
    }

    if config.timeout == 0 {
        return Err(AddonError::Config(
            "Timeout must be greater than 0".to_string()
        ));
    }

    if config.timeout > MAX_TIMEOUT_SECS {
        return Err(AddonError::Config(
            format!("Timeout too large (max: {} seconds)", MAX_TIMEOUT_SECS)
        ));
    }

    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    match config.format.as_str() {
        "json" | "compact" | "pretty" => Ok(()),
        other => Err(AddonError::Config(
            format!("Unsupported log format '{}' (expected json, compact or pretty)", other)
        )),
    }
}

fn validate_server_config(config: &ServerConfig) -> Result<()> {
    if config.port == 0 {
        return Err(AddonError::Config(
            "Server port must be greater than 0".to_string()
        ));
    }

    if config.host.is_empty() {
        return Err(AddonError::Config(
            "Server host cannot be empty".to_string()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        tokio_test::assert_ok!(validate_settings(&Settings::default_config()));
    }

    #[test]
    fn test_rejects_url_without_scheme() {
        let config = AddonConfig::new("id", "name").with_url("localhost:6333");
        assert!(validate_addon_config(&config).is_err());
    }

    #[test]
    fn test_empty_url_is_ignored() {
        let config = AddonConfig::new("id", "name").with_url("");
        assert!(validate_addon_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = AddonConfig::new("id", "name");
        config.timeout = 0;
        assert!(validate_addon_config(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_grpc_port() {
        let mut config = AddonConfig::new("id", "name");
        config.grpc_port = Some(0);
        assert!(validate_addon_config(&config).is_err());
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let mut settings = Settings::default_config();
        settings.logging.format = "xml".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
