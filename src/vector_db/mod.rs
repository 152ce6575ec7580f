//! Vector database integration with Qdrant

pub mod client;
pub mod models;
pub mod rest;

pub use client::{QdrantConnector, QdrantStore};
pub use rest::QdrantRestStore;
pub use models::{Distance, Payload, PointId, SearchParams, SearchResult, VectorPoint};

use async_trait::async_trait;
use crate::connection::ConnectionParams;
use crate::error::Result;

/// Trait for vector storage operations
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Names of all collections in the store
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Create a new collection
    async fn create_collection(&self, name: &str, vector_size: u64, distance: Distance) -> Result<()>;

    /// Delete a collection
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Insert or replace points in one batch
    async fn upsert_points(&self, collection: &str, points: Vec<VectorPoint>) -> Result<()>;

    /// Search for similar vectors, in store order
    async fn search(&self, collection: &str, params: SearchParams) -> Result<Vec<SearchResult>>;

    /// Ping the store, returning its version string
    async fn health_check(&self) -> Result<String>;
}

/// Builds a store session from resolved connection parameters.
///
/// Implementations must not perform I/O; connecting happens lazily on the
/// first call made through the returned store.
pub trait StoreConnector: Send + Sync {
    fn connect(&self, params: &ConnectionParams) -> Result<Box<dyn VectorStore>>;
}
