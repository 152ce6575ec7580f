//! Collection deletion

use super::{ActionOutput, InputValidator};
use crate::error::{AddonError, Result};
use crate::response::Outcome;
use crate::vector_db::VectorStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteCollectionInput {
    pub collection_name: String,
}

impl DeleteCollectionInput {
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteCollectionOutput {
    pub collection_name: String,
    pub success: bool,
    pub message: String,
}

impl ActionOutput for DeleteCollectionOutput {
    fn failed(collection_name: &str, error: &AddonError) -> Self {
        Self {
            collection_name: collection_name.to_string(),
            success: false,
            message: format!("Error: {}", error),
        }
    }
}

/// Deletion is unconditional; whether a missing collection is an error is
/// up to the store.
pub(crate) async fn run(store: &dyn VectorStore, input: DeleteCollectionInput) -> Result<Outcome<DeleteCollectionOutput>> {
    let name = input.collection_name;
    debug!("Deleting collection: {}", name);

    InputValidator::validate_collection_name(&name)?;
    store.delete_collection(&name).await?;

    info!("Collection '{}' deleted successfully", name);

    let message = format!("Collection '{}' deleted successfully", name);
    Ok(Outcome::ok(
        DeleteCollectionOutput {
            collection_name: name,
            success: true,
            message,
        },
        "Collection deleted successfully",
    ))
}
