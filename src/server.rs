//! HTTP server wiring

use crate::actions::ActionExecutor;
use crate::addon::QdrantAddon;
use crate::api::{build_router, AppState};
use crate::config::Settings;
use crate::error::{AddonError, Result};
use crate::observability::{HealthChecker, MetricsCollector};
use crate::vector_db::{QdrantConnector, StoreConnector};
use axum::Router;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Build application state for the configured addon
pub fn build_state(settings: &Settings, connector: Arc<dyn StoreConnector>) -> Result<AppState> {
    let metrics = Arc::new(MetricsCollector::new());
    let executor = ActionExecutor::new(connector.clone()).with_metrics(metrics.clone());

    let mut addon = QdrantAddon::with_executor(executor);
    addon.load_config(settings.addon.clone())?;

    Ok(AppState {
        addon: Arc::new(RwLock::new(addon)),
        health_checker: Arc::new(HealthChecker::new(connector)),
        metrics,
    })
}

/// Build the router for the given settings, backed by Qdrant
pub fn create_app(settings: &Settings) -> Result<Router> {
    let state = build_state(settings, Arc::new(QdrantConnector))?;
    let max_body_size = settings.server.max_body_size_mb * 1024 * 1024;
    Ok(build_router(state, max_body_size))
}

/// Serve until a shutdown signal arrives
pub async fn start_server(settings: &Settings) -> Result<()> {
    let app = create_app(settings)?;
    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AddonError::Internal(format!("Failed to bind {}: {}", addr, e)))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(crate::shutdown::shutdown_signal())
        .await
        .map_err(|e| AddonError::Internal(e.to_string()))?;

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_app_creation() {
        let settings = Settings::default_config();
        assert!(create_app(&settings).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_addon_config_is_rejected() {
        let mut settings = Settings::default_config();
        settings.addon.timeout = 0;
        assert!(create_app(&settings).is_err());
    }
}
