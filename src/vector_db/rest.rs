//! Qdrant REST client implementation

use super::models::{Distance, Payload, PointId, SearchParams, SearchResult, VectorPoint};
use super::VectorStore;
use crate::connection::ConnectionParams;
use crate::error::{Result, VectorDbError};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error};

/// Header Qdrant reads the API key from
const API_KEY_HEADER: &str = "api-key";

/// Successful Qdrant reply: `{"result": ..., "status": "ok", "time": ...}`
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    result: T,
}

/// Failed Qdrant reply: `{"status": {"error": "..."}, "time": ...}`
#[derive(Debug, Deserialize)]
struct ApiError {
    status: ApiErrorStatus,
}

#[derive(Debug, Deserialize)]
struct ApiErrorStatus {
    error: String,
}

#[derive(Debug, Deserialize)]
struct CollectionsList {
    collections: Vec<CollectionDescription>,
}

#[derive(Debug, Deserialize)]
struct CollectionDescription {
    name: String,
}

#[derive(Debug, Serialize)]
struct SearchRequest {
    vector: Vec<f32>,
    limit: u64,
    with_payload: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    score_threshold: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ScoredPoint {
    id: PointId,
    score: f32,
    #[serde(default)]
    payload: Option<Payload>,
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    version: String,
}

/// Client session for a Qdrant server over its HTTP API
pub struct QdrantRestStore {
    http_client: Client,
    base_url: Url,
    api_key: Option<Secret<String>>,
}

impl QdrantRestStore {
    /// Build a client from connection parameters. No request is sent until
    /// the first operation.
    pub fn new(params: &ConnectionParams) -> Result<Self> {
        let endpoint = params.endpoint()?;
        debug!("Building Qdrant REST client for {}", endpoint);

        let base_url = Url::parse(&endpoint)
            .map_err(|e| VectorDbError::Connection(format!("Invalid URL '{}': {}", endpoint, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(VectorDbError::Connection(format!("URL '{}' cannot be a base", endpoint)).into());
        }

        let http_client = Client::builder()
            .timeout(params.timeout)
            .build()
            .map_err(|e| VectorDbError::Connection(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
            api_key: params.api_key.clone(),
        })
    }

    /// Base URL extended with percent-encoded path segments
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments.iter().copied());
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http_client.request(method, url);
        match &self.api_key {
            Some(key) => builder.header(API_KEY_HEADER, key.expose_secret().as_str()),
            None => builder,
        }
    }

    /// Send a request and decode the reply; failures come back as text for
    /// the caller to wrap in its own error variant
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> std::result::Result<T, String> {
        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(|e| e.to_string());
        }

        let error_text = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ApiError>(&error_text)
            .map(|e| e.status.error)
            .unwrap_or(error_text);

        error!("Qdrant request failed with status {}: {}", status, detail);
        Err(format!("Status {}: {}", status, detail))
    }
}

#[async_trait]
impl VectorStore for QdrantRestStore {
    async fn list_collections(&self) -> Result<Vec<String>> {
        let request = self.request(Method::GET, self.url(&["collections"]));
        let response: ApiResponse<CollectionsList> = self
            .send(request)
            .await
            .map_err(VectorDbError::ListCollections)?;

        Ok(response.result.collections.into_iter().map(|c| c.name).collect())
    }

    async fn create_collection(&self, name: &str, vector_size: u64, distance: Distance) -> Result<()> {
        debug!("Creating collection: {} (size: {}, distance: {})", name, vector_size, distance);

        let request = self
            .request(Method::PUT, self.url(&["collections", name]))
            .json(&json!({
                "vectors": {"size": vector_size, "distance": distance.as_str()}
            }));
        self.send::<ApiResponse<serde_json::Value>>(request)
            .await
            .map_err(VectorDbError::CreateCollection)?;

        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        debug!("Deleting collection: {}", name);

        let request = self.request(Method::DELETE, self.url(&["collections", name]));
        self.send::<ApiResponse<serde_json::Value>>(request)
            .await
            .map_err(VectorDbError::DeleteCollection)?;

        Ok(())
    }

    async fn upsert_points(&self, collection: &str, points: Vec<VectorPoint>) -> Result<()> {
        debug!("Upserting {} points into collection: {}", points.len(), collection);

        let request = self
            .request(Method::PUT, self.url(&["collections", collection, "points"]))
            .query(&[("wait", "true")])
            .json(&json!({ "points": points }));
        self.send::<ApiResponse<serde_json::Value>>(request)
            .await
            .map_err(VectorDbError::Upsert)?;

        Ok(())
    }

    async fn search(&self, collection: &str, params: SearchParams) -> Result<Vec<SearchResult>> {
        debug!("Searching in collection: {} with limit: {}", collection, params.limit);

        let body = SearchRequest {
            vector: params.vector,
            limit: params.limit,
            with_payload: true,
            score_threshold: params.score_threshold,
        };
        let request = self
            .request(Method::POST, self.url(&["collections", collection, "points", "search"]))
            .json(&body);
        let response: ApiResponse<Vec<ScoredPoint>> = self
            .send(request)
            .await
            .map_err(VectorDbError::Search)?;

        Ok(response
            .result
            .into_iter()
            .map(|point| SearchResult {
                id: point.id,
                score: point.score,
                payload: point.payload.unwrap_or_default(),
            })
            .collect())
    }

    async fn health_check(&self) -> Result<String> {
        let request = self.request(Method::GET, self.url(&[]));
        let info: VersionInfo = self.send(request).await.map_err(VectorDbError::Health)?;

        Ok(info.version)
    }
}
