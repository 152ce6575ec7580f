//! HTTP API exposing the addon's actions

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::build_router;
