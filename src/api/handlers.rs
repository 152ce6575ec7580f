//! API request handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use crate::addon::QdrantAddon;
use crate::error::AddonError;
use crate::observability::{HealthChecker, HealthStatus, MetricsCollector};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub addon: Arc<RwLock<QdrantAddon>>,
    pub health_checker: Arc<HealthChecker>,
    pub metrics: Arc<MetricsCollector>,
}

/// Generic error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// HTTP status for errors raised before an action runs
fn error_status(err: &AddonError) -> StatusCode {
    match err {
        AddonError::UnknownAction(_) => StatusCode::NOT_FOUND,
        AddonError::InvalidArguments(_) => StatusCode::BAD_REQUEST,
        AddonError::NotConfigured | AddonError::Disabled(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Run an action; the HTTP status mirrors the envelope code
pub async fn run_action(
    State(state): State<AppState>,
    Path(action): Path<String>,
    Json(args): Json<serde_json::Value>,
) -> Response {
    let addon = state.addon.read().await;

    match addon.dispatch(&action, args).await {
        Ok(envelope) => (envelope.status(), Json(envelope)).into_response(),
        Err(e) => {
            warn!("Rejected action '{}': {}", action, e);
            (
                error_status(&e),
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Service description
pub async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "service": "Qdrant Addon",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

/// Health check handler
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let addon = state.addon.read().await;
    let health = state.health_checker.check_health(addon.config()).await;

    let status_code = match health.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Liveness handler - always returns 200
pub async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "alive"})))
}

/// Metrics handler (Prometheus text format)
pub async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.export_prometheus()
}
