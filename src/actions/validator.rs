//! Input validation for action arguments

use crate::error::ValidationError;
use tracing::{debug, warn};

/// Maximum collection name length accepted by Qdrant
const MAX_COLLECTION_NAME_LENGTH: usize = 255;

/// Maximum vector dimension accepted by Qdrant
const MAX_VECTOR_SIZE: u64 = 65536;

/// Characters Qdrant refuses in collection names
const FORBIDDEN_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Input validator
pub struct InputValidator;

impl InputValidator {
    /// Validate a collection name
    pub fn validate_collection_name(name: &str) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            warn!("Validation failed: empty collection name");
            return Err(ValidationError::EmptyCollectionName);
        }

        let length = name.chars().count();
        if length > MAX_COLLECTION_NAME_LENGTH {
            warn!("Validation failed: collection name too long ({} > {})", length, MAX_COLLECTION_NAME_LENGTH);
            return Err(ValidationError::CollectionNameTooLong {
                length,
                max_length: MAX_COLLECTION_NAME_LENGTH,
            });
        }

        if name.chars().any(|c| c.is_control() || FORBIDDEN_NAME_CHARS.contains(&c)) {
            warn!("Validation failed: collection name contains invalid characters");
            return Err(ValidationError::InvalidCollectionName);
        }

        debug!("Collection name validation passed");
        Ok(())
    }

    /// Validate a vector dimension
    pub fn validate_vector_size(size: u64) -> Result<(), ValidationError> {
        if size == 0 {
            warn!("Validation failed: zero vector size");
            return Err(ValidationError::ZeroVectorSize);
        }

        if size > MAX_VECTOR_SIZE {
            warn!("Validation failed: vector size too large ({} > {})", size, MAX_VECTOR_SIZE);
            return Err(ValidationError::VectorSizeTooLarge {
                size,
                max_size: MAX_VECTOR_SIZE,
            });
        }

        Ok(())
    }

    /// Validate a query or point vector
    pub fn validate_vector(vector: &[f32]) -> Result<(), ValidationError> {
        if vector.is_empty() {
            warn!("Validation failed: empty vector");
            return Err(ValidationError::EmptyVector);
        }

        if let Some(index) = vector.iter().position(|v| !v.is_finite()) {
            warn!("Validation failed: non-finite vector component at {}", index);
            return Err(ValidationError::NonFiniteComponent { index });
        }

        Ok(())
    }

    /// Validate a result limit
    pub fn validate_limit(limit: u64) -> Result<(), ValidationError> {
        if limit == 0 {
            warn!("Validation failed: zero limit");
            return Err(ValidationError::ZeroLimit);
        }

        Ok(())
    }

    /// Validate an optional score threshold
    pub fn validate_score_threshold(threshold: Option<f32>) -> Result<(), ValidationError> {
        match threshold {
            Some(t) if !t.is_finite() => {
                warn!("Validation failed: non-finite score threshold");
                Err(ValidationError::InvalidScoreThreshold)
            }
            _ => Ok(()),
        }
    }
}
