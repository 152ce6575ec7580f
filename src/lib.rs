//! Qdrant Addon - storage actions against a Qdrant vector database
//!
//! The addon exposes four actions to its host: creating and deleting
//! collections, upserting points and similarity search. Every action
//! returns the same envelope of `{output, tokens, message, code}` where
//! `code` is 200 on success, 409 when a collection already exists under
//! the `error` policy, and 500 for any failure.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qdrant_addon::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut addon = QdrantAddon::new();
//!     addon.load_addon_config(json!({
//!         "id": "qdrant-1",
//!         "name": "qdrant",
//!         "url": "http://localhost:6333"
//!     }))?;
//!
//!     let response = addon
//!         .dispatch(
//!             "create_collection",
//!             json!({"collection_name": "docs", "vector_size": 384, "if_exists": "skip"}),
//!         )
//!         .await?;
//!     println!("{} {}", response.code, response.message);
//!
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod addon;
pub mod api;
pub mod config;
pub mod connection;
pub mod error;
pub mod observability;
pub mod response;
pub mod server;
pub mod shutdown;
pub mod vector_db;

pub use addon::QdrantAddon;
pub use config::{AddonConfig, Settings};
pub use error::{AddonError, Result};
pub use response::ActionResponse;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::actions::{
        ActionExecutor, ActionKind, CreateCollectionInput, DeleteCollectionInput, ExistsPolicy,
        SearchPointsInput, UpsertPointsInput,
    };
    pub use crate::addon::{ActionEvent, QdrantAddon};
    pub use crate::config::{AddonConfig, Settings};
    pub use crate::connection::ConnectionParams;
    pub use crate::error::{AddonError, Result};
    pub use crate::observability::{HealthChecker, MetricsCollector};
    pub use crate::response::{ActionResponse, TokensSchema};
    pub use crate::vector_db::{Distance, PointId, StoreConnector, VectorPoint, VectorStore};
}
