//! Storage actions exposed to the host
//!
//! Every action follows the same shape: resolve connection parameters,
//! open a store session, validate and translate the input, perform the
//! remote operation, and wrap the result in an [`ActionResponse`]. Errors
//! never escape an action; they become 500 envelopes.

pub mod create_collection;
pub mod delete_collection;
pub mod search_points;
pub mod upsert_points;
pub mod validator;

pub use create_collection::{CreateCollectionInput, CreateCollectionOutput, ExistsPolicy};
pub use delete_collection::{DeleteCollectionInput, DeleteCollectionOutput};
pub use search_points::{SearchPointsInput, SearchPointsOutput};
pub use upsert_points::{UpsertPointsInput, UpsertPointsOutput};
pub use validator::InputValidator;

use crate::config::AddonConfig;
use crate::connection::ConnectionParams;
use crate::error::{AddonError, Result};
use crate::observability::MetricsCollector;
use crate::response::{ActionResponse, Outcome};
use crate::vector_db::{QdrantConnector, StoreConnector, VectorStore};
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

/// The actions this addon provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    CreateCollection,
    DeleteCollection,
    UpsertPoints,
    SearchPoints,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::CreateCollection,
        ActionKind::DeleteCollection,
        ActionKind::UpsertPoints,
        ActionKind::SearchPoints,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::CreateCollection => "create_collection",
            ActionKind::DeleteCollection => "delete_collection",
            ActionKind::UpsertPoints => "upsert_points",
            ActionKind::SearchPoints => "search_points",
        }
    }

    /// Verb phrase used in failure messages
    fn description(&self) -> &'static str {
        match self {
            ActionKind::CreateCollection => "create collection",
            ActionKind::DeleteCollection => "delete collection",
            ActionKind::UpsertPoints => "upsert points",
            ActionKind::SearchPoints => "search points",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = AddonError;

    fn from_str(s: &str) -> Result<Self> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AddonError::UnknownAction(s.to_string()))
    }
}

/// Output records that can describe a failed invocation
pub trait ActionOutput: Serialize {
    fn failed(collection_name: &str, error: &AddonError) -> Self;
}

/// Runs actions against stores produced by a connector
#[derive(Clone)]
pub struct ActionExecutor {
    connector: Arc<dyn StoreConnector>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl ActionExecutor {
    pub fn new(connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            connector,
            metrics: None,
        }
    }

    /// Executor backed by the Qdrant client
    pub fn qdrant() -> Self {
        Self::new(Arc::new(QdrantConnector))
    }

    /// Record per-action metrics
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Open a fresh store session for one invocation
    fn connect(&self, config: &AddonConfig) -> Result<Box<dyn VectorStore>> {
        self.connector.connect(&ConnectionParams::resolve(config))
    }

    /// Shared tail of every action: map the outcome to an envelope
    async fn execute<O, Fut>(&self, kind: ActionKind, collection_name: &str, action: Fut) -> ActionResponse<O>
    where
        O: ActionOutput,
        Fut: Future<Output = Result<Outcome<O>>>,
    {
        let start = Instant::now();

        let response = match action.await {
            Ok(outcome) => outcome.into_response(),
            Err(e) => {
                error!("Failed to {}: {}", kind.description(), e);
                ActionResponse::internal_error(
                    O::failed(collection_name, &e),
                    format!("Failed to {}: {}", kind.description(), e),
                )
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_action(kind, response.code, start.elapsed());
        }

        response
    }

    pub async fn create_collection(
        &self,
        config: &AddonConfig,
        input: CreateCollectionInput,
    ) -> ActionResponse<CreateCollectionOutput> {
        let name = input.collection_name.clone();
        self.execute(ActionKind::CreateCollection, &name, async {
            let store = self.connect(config)?;
            create_collection::run(store.as_ref(), input).await
        })
        .await
    }

    pub async fn delete_collection(
        &self,
        config: &AddonConfig,
        input: DeleteCollectionInput,
    ) -> ActionResponse<DeleteCollectionOutput> {
        let name = input.collection_name.clone();
        self.execute(ActionKind::DeleteCollection, &name, async {
            let store = self.connect(config)?;
            delete_collection::run(store.as_ref(), input).await
        })
        .await
    }

    pub async fn upsert_points(
        &self,
        config: &AddonConfig,
        input: UpsertPointsInput,
    ) -> ActionResponse<UpsertPointsOutput> {
        let name = input.collection_name.clone();
        self.execute(ActionKind::UpsertPoints, &name, async {
            let store = self.connect(config)?;
            upsert_points::run(store.as_ref(), input).await
        })
        .await
    }

    pub async fn search_points(
        &self,
        config: &AddonConfig,
        input: SearchPointsInput,
    ) -> ActionResponse<SearchPointsOutput> {
        let name = input.collection_name.clone();
        self.execute(ActionKind::SearchPoints, &name, async {
            let store = self.connect(config)?;
            search_points::run(store.as_ref(), input).await
        })
        .await
    }

    /// Run an action from untyped JSON arguments.
    ///
    /// Only a body that is not a JSON object is reported as `Err`. Fields
    /// of the wrong type fail the action like any other bad input, as a
    /// 500 envelope, and nothing reaches the store.
    pub async fn dispatch(
        &self,
        config: &AddonConfig,
        kind: ActionKind,
        args: serde_json::Value,
    ) -> Result<ActionResponse<serde_json::Value>> {
        let collection_name = match &args {
            serde_json::Value::Object(fields) => fields
                .get("collection_name")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string(),
            _ => {
                return Err(AddonError::InvalidArguments(format!(
                    "Arguments for {} must be a JSON object",
                    kind
                )))
            }
        };

        let response = match kind {
            ActionKind::CreateCollection => match serde_json::from_value(args) {
                Ok(input) => self.create_collection(config, input).await.erase(),
                Err(e) => self.reject::<CreateCollectionOutput>(kind, &collection_name, e).await.erase(),
            },
            ActionKind::DeleteCollection => match serde_json::from_value(args) {
                Ok(input) => self.delete_collection(config, input).await.erase(),
                Err(e) => self.reject::<DeleteCollectionOutput>(kind, &collection_name, e).await.erase(),
            },
            ActionKind::UpsertPoints => match serde_json::from_value(args) {
                Ok(input) => self.upsert_points(config, input).await.erase(),
                Err(e) => self.reject::<UpsertPointsOutput>(kind, &collection_name, e).await.erase(),
            },
            ActionKind::SearchPoints => match serde_json::from_value(args) {
                Ok(input) => self.search_points(config, input).await.erase(),
                Err(e) => self.reject::<SearchPointsOutput>(kind, &collection_name, e).await.erase(),
            },
        };

        Ok(response)
    }

    /// Envelope for arguments that did not deserialize into the action's input
    async fn reject<O: ActionOutput>(
        &self,
        kind: ActionKind,
        collection_name: &str,
        err: serde_json::Error,
    ) -> ActionResponse<O> {
        self.execute(kind, collection_name, async move { Err::<Outcome<O>, _>(AddonError::from(err)) })
            .await
    }
}

impl Default for ActionExecutor {
    fn default() -> Self {
        Self::qdrant()
    }
}

/// Create a collection on the configured Qdrant server
pub async fn create_collection(
    config: &AddonConfig,
    input: CreateCollectionInput,
) -> ActionResponse<CreateCollectionOutput> {
    ActionExecutor::qdrant().create_collection(config, input).await
}

/// Delete a collection on the configured Qdrant server
pub async fn delete_collection(
    config: &AddonConfig,
    input: DeleteCollectionInput,
) -> ActionResponse<DeleteCollectionOutput> {
    ActionExecutor::qdrant().delete_collection(config, input).await
}

/// Upsert points into a collection on the configured Qdrant server
pub async fn upsert_points(
    config: &AddonConfig,
    input: UpsertPointsInput,
) -> ActionResponse<UpsertPointsOutput> {
    ActionExecutor::qdrant().upsert_points(config, input).await
}

/// Search a collection on the configured Qdrant server
pub async fn search_points(
    config: &AddonConfig,
    input: SearchPointsInput,
) -> ActionResponse<SearchPointsOutput> {
    ActionExecutor::qdrant().search_points(config, input).await
}
