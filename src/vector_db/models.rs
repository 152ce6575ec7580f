//! Data models for vector database operations

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;
use uuid::Uuid;

use crate::error::VectorDbError;

/// Arbitrary JSON metadata stored alongside a point
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Distance metrics supported by the store
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "String")]
pub enum Distance {
    #[default]
    Cosine,
    Euclid,
    Dot,
}

impl Distance {
    /// Parse a metric name; unrecognized names fall back to cosine
    pub fn parse_lenient(name: &str) -> Self {
        match name {
            "Cosine" => Distance::Cosine,
            "Euclid" => Distance::Euclid,
            "Dot" => Distance::Dot,
            other => {
                warn!("Unknown distance metric '{}', falling back to Cosine", other);
                Distance::Cosine
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Distance::Cosine => "Cosine",
            Distance::Euclid => "Euclid",
            Distance::Dot => "Dot",
        }
    }
}

impl From<String> for Distance {
    fn from(name: String) -> Self {
        Distance::parse_lenient(&name)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point identifier: unsigned integer or UUID string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum PointId {
    Num(u64),
    Uuid(String),
}

impl PointId {
    /// Check that string ids are well-formed UUIDs, normalizing them to
    /// the hyphenated lowercase form the store reports back
    pub fn normalized(self) -> Result<Self, VectorDbError> {
        match self {
            PointId::Num(n) => Ok(PointId::Num(n)),
            PointId::Uuid(s) => Uuid::parse_str(&s)
                .map(|uuid| PointId::Uuid(uuid.hyphenated().to_string()))
                .map_err(|e| VectorDbError::InvalidIdFormat(format!("'{}' is not a valid UUID: {}", s, e))),
        }
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointId::Num(n) => write!(f, "{}", n),
            PointId::Uuid(s) => f.write_str(s),
        }
    }
}

impl From<u64> for PointId {
    fn from(n: u64) -> Self {
        PointId::Num(n)
    }
}

impl From<Uuid> for PointId {
    fn from(uuid: Uuid) -> Self {
        PointId::Uuid(uuid.to_string())
    }
}

/// Point to be stored in the vector database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorPoint {
    /// Unique identifier
    pub id: PointId,

    /// Vector embedding
    pub vector: Vec<f32>,

    /// Associated metadata
    #[serde(default)]
    pub payload: Payload,
}

impl VectorPoint {
    pub fn new(id: impl Into<PointId>, vector: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            vector,
            payload: Payload::new(),
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }
}

/// Search parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Query vector
    pub vector: Vec<f32>,

    /// Maximum number of results
    pub limit: u64,

    /// Minimum similarity score; `None` leaves filtering to the store
    pub score_threshold: Option<f32>,
}

impl SearchParams {
    pub fn new(vector: Vec<f32>, limit: u64) -> Self {
        Self {
            vector,
            limit,
            score_threshold: None,
        }
    }

    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = Some(threshold);
        self
    }
}

/// Search result, passed through from the store unchanged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Point ID
    pub id: PointId,

    /// Similarity score
    pub score: f32,

    /// Stored payload
    pub payload: Payload,
}
