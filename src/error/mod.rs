//! Error types for the Qdrant addon

use thiserror::Error;

/// Result type alias for addon operations
pub type Result<T> = std::result::Result<T, AddonError>;

/// Main error type for the addon
#[derive(Error, Debug)]
pub enum AddonError {
    #[error("Vector database error: {0}")]
    VectorDb(#[from] VectorDbError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Addon is not configured")]
    NotConfigured,

    #[error("Addon '{0}' is disabled")]
    Disabled(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors related to vector database operations
#[derive(Error, Debug)]
pub enum VectorDbError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Failed to list collections: {0}")]
    ListCollections(String),

    #[error("Failed to create collection: {0}")]
    CreateCollection(String),

    #[error("Failed to delete collection: {0}")]
    DeleteCollection(String),

    #[error("Upsert error: {0}")]
    Upsert(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Invalid ID format: {0}")]
    InvalidIdFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Health check failed: {0}")]
    Health(String),
}

/// Errors raised while validating action input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Collection name cannot be empty")]
    EmptyCollectionName,

    #[error("Collection name too long: {length} characters (max: {max_length})")]
    CollectionNameTooLong { length: usize, max_length: usize },

    #[error("Collection name contains invalid characters")]
    InvalidCollectionName,

    #[error("Vector size must be greater than 0")]
    ZeroVectorSize,

    #[error("Vector size too large: {size} (max: {max_size})")]
    VectorSizeTooLarge { size: u64, max_size: u64 },

    #[error("Limit must be greater than 0")]
    ZeroLimit,

    #[error("Vector cannot be empty")]
    EmptyVector,

    #[error("Vector contains a non-finite value at index {index}")]
    NonFiniteComponent { index: usize },

    #[error("Score threshold must be a finite number")]
    InvalidScoreThreshold,
}

impl From<config::ConfigError> for AddonError {
    fn from(err: config::ConfigError) -> Self {
        AddonError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AddonError {
    fn from(err: serde_json::Error) -> Self {
        AddonError::InvalidArguments(err.to_string())
    }
}
