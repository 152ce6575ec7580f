//! Batch point upsert

use super::{ActionOutput, InputValidator};
use crate::error::{AddonError, Result};
use crate::response::Outcome;
use crate::vector_db::{VectorPoint, VectorStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertPointsInput {
    pub collection_name: String,
    pub points: Vec<VectorPoint>,
}

impl UpsertPointsInput {
    pub fn new(collection_name: impl Into<String>, points: Vec<VectorPoint>) -> Self {
        Self {
            collection_name: collection_name.into(),
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertPointsOutput {
    pub collection_name: String,
    /// Points submitted, not points the store reports as written
    pub points_count: usize,
    pub success: bool,
    pub message: String,
}

impl ActionOutput for UpsertPointsOutput {
    fn failed(collection_name: &str, error: &AddonError) -> Self {
        Self {
            collection_name: collection_name.to_string(),
            points_count: 0,
            success: false,
            message: format!("Error: {}", error),
        }
    }
}

/// The whole batch goes out in one call. Partial failures are not split
/// or retried here.
pub(crate) async fn run(store: &dyn VectorStore, input: UpsertPointsInput) -> Result<Outcome<UpsertPointsOutput>> {
    let name = input.collection_name;
    let count = input.points.len();
    debug!("Upserting {} points to collection: {}", count, name);

    InputValidator::validate_collection_name(&name)?;

    let points = input
        .points
        .into_iter()
        .map(|point| -> Result<VectorPoint> {
            InputValidator::validate_vector(&point.vector)?;
            Ok(VectorPoint {
                id: point.id.normalized()?,
                vector: point.vector,
                payload: point.payload,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    store.upsert_points(&name, points).await?;

    info!("Successfully upserted {} points to collection '{}'", count, name);

    Ok(Outcome::ok(
        UpsertPointsOutput {
            collection_name: name,
            points_count: count,
            success: true,
            message: format!("Successfully upserted {} points", count),
        },
        "Points upserted successfully",
    ))
}
