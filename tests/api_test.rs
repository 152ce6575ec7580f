//! HTTP surface tests driven through the router

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common::{result, FakeConnector};
use qdrant_addon::api::build_router;
use qdrant_addon::config::Settings;
use qdrant_addon::server::build_state;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(connector: &FakeConnector, settings: &Settings) -> Router {
    let state = build_state(settings, Arc::new(connector.clone())).unwrap();
    build_router(state, 1024 * 1024)
}

fn app(connector: &FakeConnector) -> Router {
    app_with(connector, &Settings::default_config())
}

async fn post_action(app: &Router, action: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/v1/actions/{}", action))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_root_and_liveness() {
    let app = app(&FakeConnector::new());

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Qdrant Addon"));

    let (status, body) = get(&app, "/health/live").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("alive"));
}

#[tokio::test]
async fn test_create_conflict_maps_to_409() {
    let connector = FakeConnector::with_collections(&["docs"]);
    let app = app(&connector);

    let (status, body) = post_action(
        &app,
        "create_collection",
        json!({"collection_name": "docs", "vector_size": 128, "distance": "Cosine", "if_exists": "error"}),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], json!(409));
    assert_eq!(body["output"]["success"], json!(false));
    assert_eq!(body["output"]["message"], json!("Collection 'docs' already exists"));
}

#[tokio::test]
async fn test_search_over_http() {
    let connector = FakeConnector::new();
    connector.state().search_results = vec![result(1, 0.9, "a"), result(2, 0.8, "b")];
    let app = app(&connector);

    let (status, body) = post_action(
        &app,
        "search_points",
        json!({"collection_name": "docs", "query_vector": [0.1, 0.2], "limit": 2}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output"]["results_count"], json!(2));
    assert_eq!(body["output"]["results"][1]["id"], json!(2));
    assert_eq!(body["tokens"]["stepAmount"], json!(0));
}

#[tokio::test]
async fn test_remote_failure_maps_to_500() {
    let connector = FakeConnector::new();
    connector.state().fail_remote = true;
    let app = app(&connector);

    let (status, body) = post_action(&app, "delete_collection", json!({"collection_name": "docs"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], json!(500));
    assert_eq!(body["output"]["success"], json!(false));
}

#[tokio::test]
async fn test_unknown_action_is_404() {
    let app = app(&FakeConnector::new());

    let (status, body) = post_action(&app, "drop_database", json!({})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("drop_database"));
}

#[tokio::test]
async fn test_non_object_body_is_400() {
    let connector = FakeConnector::new();
    let app = app(&connector);

    let (status, _) = post_action(&app, "upsert_points", json!([{"collection_name": "docs"}])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(connector.calls().is_empty());
}

#[tokio::test]
async fn test_mistyped_field_is_500_envelope() {
    let connector = FakeConnector::new();
    let app = app(&connector);

    let (status, body) = post_action(
        &app,
        "create_collection",
        json!({"collection_name": "docs", "vector_size": -5}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], json!(500));
    assert_eq!(body["output"]["collection_name"], json!("docs"));
    assert_eq!(body["output"]["success"], json!(false));
    assert!(body["message"].as_str().unwrap().starts_with("Failed to create collection"));
    assert!(connector.calls().is_empty());
}

#[tokio::test]
async fn test_disabled_addon_is_503() {
    let mut settings = Settings::default_config();
    settings.addon.enabled = false;
    let app = app_with(&FakeConnector::new(), &settings);

    let (status, _) = post_action(&app, "delete_collection", json!({"collection_name": "docs"})).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_health_reports_store_status() {
    let app = app(&FakeConnector::new());

    let (status, body) = get(&app, "/health").await;
    let health: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], json!("healthy"));
    assert_eq!(health["components"][0]["name"], json!("vector_database"));
}

#[tokio::test]
async fn test_metrics_after_actions() {
    let app = app(&FakeConnector::new());

    post_action(&app, "delete_collection", json!({"collection_name": "docs"})).await;
    let (status, body) = get(&app, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("qdrant_addon_actions_total{action=\"delete_collection\",status=\"ok\"} 1"));
    assert!(body.contains("qdrant_addon_uptime_seconds"));
}
