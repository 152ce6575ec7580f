//! Qdrant gRPC client implementation

use super::models::{Distance, Payload, PointId, SearchParams, SearchResult, VectorPoint};
use super::rest::QdrantRestStore;
use super::{StoreConnector, VectorStore};
use crate::connection::{ConnectionParams, Transport};
use crate::error::{Result, VectorDbError};
use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, ListValue, PointStruct, ScoredPoint, SearchPointsBuilder, Struct,
    UpsertPointsBuilder, Value, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use secrecy::ExposeSecret;
use std::collections::HashMap;
use tracing::debug;

/// Connector producing Qdrant sessions: [`QdrantRestStore`] by default,
/// [`QdrantStore`] when gRPC is preferred
#[derive(Debug, Clone, Copy, Default)]
pub struct QdrantConnector;

impl StoreConnector for QdrantConnector {
    fn connect(&self, params: &ConnectionParams) -> Result<Box<dyn VectorStore>> {
        match params.transport() {
            Transport::Rest => Ok(Box::new(QdrantRestStore::new(params)?)),
            Transport::Grpc => Ok(Box::new(QdrantStore::new(params)?)),
        }
    }
}

/// Client session for a Qdrant server over gRPC
pub struct QdrantStore {
    client: Qdrant,
}

impl QdrantStore {
    /// Build a client from connection parameters. No request is sent until
    /// the first operation.
    pub fn new(params: &ConnectionParams) -> Result<Self> {
        let endpoint = params.endpoint()?;
        debug!("Building Qdrant client for {}", endpoint);

        let mut builder = Qdrant::from_url(&endpoint)
            .timeout(params.timeout)
            .skip_compatibility_check();

        if let Some(api_key) = &params.api_key {
            builder = builder.api_key(api_key.expose_secret().clone());
        }

        let client = builder
            .build()
            .map_err(|e| VectorDbError::Connection(e.to_string()))?;

        Ok(Self { client })
    }

    /// Access the underlying Qdrant client
    pub fn client(&self) -> &Qdrant {
        &self.client
    }
}

/// Convert Distance enum to Qdrant Distance
fn to_qdrant_distance(distance: Distance) -> qdrant_client::qdrant::Distance {
    match distance {
        Distance::Cosine => qdrant_client::qdrant::Distance::Cosine,
        Distance::Euclid => qdrant_client::qdrant::Distance::Euclid,
        Distance::Dot => qdrant_client::qdrant::Distance::Dot,
    }
}

fn to_qdrant_point_id(id: PointId) -> qdrant_client::qdrant::PointId {
    match id {
        PointId::Num(n) => n.into(),
        PointId::Uuid(s) => s.into(),
    }
}

fn from_qdrant_point_id(id: Option<qdrant_client::qdrant::PointId>) -> Result<PointId> {
    match id.and_then(|pid| pid.point_id_options) {
        Some(PointIdOptions::Num(n)) => Ok(PointId::Num(n)),
        Some(PointIdOptions::Uuid(s)) => Ok(PointId::Uuid(s)),
        None => Err(VectorDbError::Search("Scored point without an id".to_string()).into()),
    }
}

/// Convert a JSON value to a Qdrant value
pub(crate) fn json_to_qdrant(value: serde_json::Value) -> Value {
    let kind = match value {
        serde_json::Value::Null => Kind::NullValue(0),
        serde_json::Value::Bool(b) => Kind::BoolValue(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Kind::IntegerValue(i),
            None => Kind::DoubleValue(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => Kind::StringValue(s),
        serde_json::Value::Array(items) => Kind::ListValue(ListValue {
            values: items.into_iter().map(json_to_qdrant).collect(),
        }),
        serde_json::Value::Object(map) => Kind::StructValue(Struct {
            fields: map.into_iter().map(|(k, v)| (k, json_to_qdrant(v))).collect(),
        }),
    };

    Value { kind: Some(kind) }
}

/// Convert a Qdrant value back to JSON
pub(crate) fn qdrant_to_json(value: Value) -> serde_json::Value {
    match value.kind {
        None | Some(Kind::NullValue(_)) => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(Kind::IntegerValue(i)) => serde_json::Value::Number(i.into()),
        Some(Kind::DoubleValue(d)) => serde_json::Number::from_f64(d)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s),
        Some(Kind::ListValue(list)) => {
            serde_json::Value::Array(list.values.into_iter().map(qdrant_to_json).collect())
        }
        Some(Kind::StructValue(s)) => serde_json::Value::Object(
            s.fields.into_iter().map(|(k, v)| (k, qdrant_to_json(v))).collect(),
        ),
    }
}

fn to_qdrant_payload(payload: Payload) -> HashMap<String, Value> {
    payload
        .into_iter()
        .map(|(key, value)| (key, json_to_qdrant(value)))
        .collect()
}

fn scored_point_to_result(point: ScoredPoint) -> Result<SearchResult> {
    let id = from_qdrant_point_id(point.id)?;
    let payload: Payload = point
        .payload
        .into_iter()
        .map(|(key, value)| (key, qdrant_to_json(value)))
        .collect();

    Ok(SearchResult {
        id,
        score: point.score,
        payload,
    })
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn list_collections(&self) -> Result<Vec<String>> {
        let response = self.client
            .list_collections()
            .await
            .map_err(|e| VectorDbError::ListCollections(e.to_string()))?;

        Ok(response.collections.into_iter().map(|c| c.name).collect())
    }

    async fn create_collection(&self, name: &str, vector_size: u64, distance: Distance) -> Result<()> {
        debug!("Creating collection: {} (size: {}, distance: {})", name, vector_size, distance);

        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(vector_size, to_qdrant_distance(distance))),
            )
            .await
            .map_err(|e| VectorDbError::CreateCollection(e.to_string()))?;

        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        debug!("Deleting collection: {}", name);

        self.client
            .delete_collection(name)
            .await
            .map_err(|e| VectorDbError::DeleteCollection(e.to_string()))?;

        Ok(())
    }

    async fn upsert_points(&self, collection: &str, points: Vec<VectorPoint>) -> Result<()> {
        debug!("Upserting {} points into collection: {}", points.len(), collection);

        let qdrant_points: Vec<PointStruct> = points
            .into_iter()
            .map(|point| {
                PointStruct::new(
                    to_qdrant_point_id(point.id),
                    point.vector,
                    to_qdrant_payload(point.payload),
                )
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, qdrant_points).wait(true))
            .await
            .map_err(|e| VectorDbError::Upsert(e.to_string()))?;

        Ok(())
    }

    async fn search(&self, collection: &str, params: SearchParams) -> Result<Vec<SearchResult>> {
        debug!("Searching in collection: {} with limit: {}", collection, params.limit);

        let mut request = SearchPointsBuilder::new(collection, params.vector, params.limit)
            .with_payload(true);

        if let Some(threshold) = params.score_threshold {
            request = request.score_threshold(threshold);
        }

        let response = self.client
            .search_points(request)
            .await
            .map_err(|e| VectorDbError::Search(e.to_string()))?;

        response
            .result
            .into_iter()
            .map(scored_point_to_result)
            .collect()
    }

    async fn health_check(&self) -> Result<String> {
        let reply = self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::Health(e.to_string()))?;

        Ok(reply.version)
    }
}
