//! Similarity search

use super::{ActionOutput, InputValidator};
use crate::error::{AddonError, Result};
use crate::response::Outcome;
use crate::vector_db::{SearchParams, SearchResult, VectorStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Result limit when none is given
pub const DEFAULT_LIMIT: u64 = 5;

fn default_limit() -> u64 { DEFAULT_LIMIT }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPointsInput {
    pub collection_name: String,
    pub query_vector: Vec<f32>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub score_threshold: Option<f32>,
}

impl SearchPointsInput {
    pub fn new(collection_name: impl Into<String>, query_vector: Vec<f32>) -> Self {
        Self {
            collection_name: collection_name.into(),
            query_vector,
            limit: DEFAULT_LIMIT,
            score_threshold: None,
        }
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = Some(threshold);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPointsOutput {
    pub collection_name: String,
    pub results: Vec<SearchResult>,
    pub results_count: usize,
    pub success: bool,
    pub message: String,
}

impl ActionOutput for SearchPointsOutput {
    fn failed(collection_name: &str, error: &AddonError) -> Self {
        Self {
            collection_name: collection_name.to_string(),
            results: Vec::new(),
            results_count: 0,
            success: false,
            message: format!("Error: {}", error),
        }
    }
}

pub(crate) async fn run(store: &dyn VectorStore, input: SearchPointsInput) -> Result<Outcome<SearchPointsOutput>> {
    let name = input.collection_name;
    debug!("Searching collection: {} with limit: {}", name, input.limit);

    InputValidator::validate_collection_name(&name)?;
    InputValidator::validate_vector(&input.query_vector)?;
    InputValidator::validate_limit(input.limit)?;
    InputValidator::validate_score_threshold(input.score_threshold)?;

    let mut params = SearchParams::new(input.query_vector, input.limit);
    if let Some(threshold) = input.score_threshold {
        params = params.with_score_threshold(threshold);
    }

    // Store order is kept as-is
    let results = store.search(&name, params).await?;
    let count = results.len();

    info!("Found {} results in collection '{}'", count, name);

    Ok(Outcome::ok(
        SearchPointsOutput {
            collection_name: name,
            results,
            results_count: count,
            success: true,
            message: format!("Found {} results", count),
        },
        "Search completed successfully",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_defaults() {
        let input: SearchPointsInput =
            serde_json::from_value(json!({"collection_name": "docs", "query_vector": [0.1]})).unwrap();

        assert_eq!(input.limit, DEFAULT_LIMIT);
        assert_eq!(input.score_threshold, None);
    }

    #[test]
    fn test_output_result_shape() {
        let output = SearchPointsOutput {
            collection_name: "docs".to_string(),
            results: vec![SearchResult {
                id: crate::vector_db::PointId::Num(1),
                score: 0.5,
                payload: serde_json::Map::new(),
            }],
            results_count: 1,
            success: true,
            message: "Found 1 results".to_string(),
        };

        let value = serde_json::to_value(output).unwrap();
        assert_eq!(value["results"][0], json!({"id": 1, "score": 0.5, "payload": {}}));
    }
}
