//! Qdrant Addon Server Binary
//!
//! Serves the addon's actions over HTTP until Ctrl+C or SIGTERM.

use anyhow::Context;
use qdrant_addon::{config::Settings, observability::init_observability, server::start_server};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration from file, environment overrides on top
    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let settings = Settings::from_file_with_env(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    init_observability(&settings.logging.level, &settings.logging.format)
        .context("Failed to initialize logging")?;

    info!("Starting Qdrant Addon Server");
    info!("Configuration loaded and validated from {}", config_path);
    info!(
        "Addon '{}' ({}) targeting {:?}",
        settings.addon.name,
        settings.addon.id,
        settings.addon.address()
    );

    start_server(&settings).await?;

    Ok(())
}
