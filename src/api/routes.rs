//! API route configuration

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{self, AppState};

/// Build the complete API router.
///
/// `max_body_size` is in bytes; 0 disables the limit.
pub fn build_router(app_state: AppState, max_body_size: usize) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler))
        .route("/health/live", get(handlers::liveness_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(app_state.clone());

    let mut api_routes = Router::new()
        .route("/api/v1/actions/:action", post(handlers::run_action))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state);

    if max_body_size > 0 {
        api_routes = api_routes.layer(RequestBodyLimitLayer::new(max_body_size));
    }

    public_routes.merge(api_routes)
}
