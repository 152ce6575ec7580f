//! Collection creation with an existence policy

use super::{ActionOutput, InputValidator};
use crate::error::{AddonError, Result};
use crate::response::Outcome;
use crate::vector_db::{Distance, VectorStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// What to do when the target collection already exists
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ExistsPolicy {
    /// Report a conflict
    #[default]
    Error,

    /// Leave the collection alone and report success
    Skip,

    /// Drop the collection and create it again
    Recreate,
}

impl ExistsPolicy {
    /// Parse a policy name; unrecognized values behave like `error`
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "error" => ExistsPolicy::Error,
            "skip" => ExistsPolicy::Skip,
            "recreate" => ExistsPolicy::Recreate,
            other => {
                warn!("Unknown if_exists value: {}, defaulting to 'error'", other);
                ExistsPolicy::Error
            }
        }
    }
}

impl From<String> for ExistsPolicy {
    fn from(value: String) -> Self {
        ExistsPolicy::parse_lenient(&value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCollectionInput {
    pub collection_name: String,
    pub vector_size: u64,
    #[serde(default)]
    pub distance: Distance,
    #[serde(default)]
    pub if_exists: ExistsPolicy,
}

impl CreateCollectionInput {
    pub fn new(collection_name: impl Into<String>, vector_size: u64) -> Self {
        Self {
            collection_name: collection_name.into(),
            vector_size,
            distance: Distance::default(),
            if_exists: ExistsPolicy::default(),
        }
    }

    pub fn with_distance(mut self, distance: Distance) -> Self {
        self.distance = distance;
        self
    }

    pub fn if_exists(mut self, policy: ExistsPolicy) -> Self {
        self.if_exists = policy;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCollectionOutput {
    pub collection_name: String,
    pub success: bool,
    pub message: String,
}

impl CreateCollectionOutput {
    fn new(collection_name: &str, success: bool, message: String) -> Self {
        Self {
            collection_name: collection_name.to_string(),
            success,
            message,
        }
    }
}

impl ActionOutput for CreateCollectionOutput {
    fn failed(collection_name: &str, error: &AddonError) -> Self {
        let name = if collection_name.is_empty() { "unknown" } else { collection_name };
        Self::new(name, false, format!("Error: {}", error))
    }
}

pub(crate) async fn run(store: &dyn VectorStore, input: CreateCollectionInput) -> Result<Outcome<CreateCollectionOutput>> {
    let name = input.collection_name.as_str();
    debug!(
        "Creating collection: {} with vector size: {}, distance: {}, if_exists: {:?}",
        name, input.vector_size, input.distance, input.if_exists
    );

    InputValidator::validate_collection_name(name)?;
    InputValidator::validate_vector_size(input.vector_size)?;

    // An unreachable listing is treated as "does not exist"
    let exists = match store.list_collections().await {
        Ok(collections) => collections.iter().any(|c| c == name),
        Err(e) => {
            warn!("Could not check if collection exists: {}", e);
            false
        }
    };

    let mut recreated = false;
    if exists {
        match input.if_exists {
            ExistsPolicy::Skip => {
                info!("Collection '{}' already exists, skipping creation", name);
                return Ok(Outcome::ok(
                    CreateCollectionOutput::new(name, true, format!("Collection '{}' already exists (skipped)", name)),
                    "Collection already exists, skipped creation",
                ));
            }
            ExistsPolicy::Recreate => {
                info!("Collection '{}' already exists, recreating", name);
                store.delete_collection(name).await?;
                info!("Deleted existing collection '{}'", name);
                recreated = true;
            }
            ExistsPolicy::Error => {
                error!("Collection '{}' already exists", name);
                let message = format!("Collection '{}' already exists", name);
                return Ok(Outcome::conflict(
                    CreateCollectionOutput::new(name, false, message.clone()),
                    message,
                ));
            }
        }
    }

    store.create_collection(name, input.vector_size, input.distance).await?;

    let action_taken = if recreated { "recreated" } else { "created" };
    info!("Collection '{}' {} successfully", name, action_taken);

    Ok(Outcome::ok(
        CreateCollectionOutput::new(name, true, format!("Collection '{}' {} successfully", name, action_taken)),
        format!("Collection {} successfully", action_taken),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_defaults() {
        let input: CreateCollectionInput =
            serde_json::from_value(json!({"collection_name": "docs", "vector_size": 128})).unwrap();

        assert_eq!(input.distance, Distance::Cosine);
        assert_eq!(input.if_exists, ExistsPolicy::Error);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(ExistsPolicy::parse_lenient("skip"), ExistsPolicy::Skip);
        assert_eq!(ExistsPolicy::parse_lenient("recreate"), ExistsPolicy::Recreate);
        assert_eq!(ExistsPolicy::parse_lenient("error"), ExistsPolicy::Error);
        assert_eq!(ExistsPolicy::parse_lenient("overwrite"), ExistsPolicy::Error);

        let input: CreateCollectionInput = serde_json::from_value(json!({
            "collection_name": "docs",
            "vector_size": 4,
            "distance": "Dot",
            "if_exists": "SKIP"
        }))
        .unwrap();
        assert_eq!(input.distance, Distance::Dot);
        assert_eq!(input.if_exists, ExistsPolicy::Error);
    }

    #[test]
    fn test_policy_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ExistsPolicy::Recreate).unwrap(), json!("recreate"));
    }

    #[test]
    fn test_failed_output_names_unknown_collection() {
        let err = AddonError::Internal("boom".to_string());
        let output = CreateCollectionOutput::failed("", &err);

        assert_eq!(output.collection_name, "unknown");
        assert!(!output.success);
        assert_eq!(output.message, "Error: Internal error: boom");
    }
}
