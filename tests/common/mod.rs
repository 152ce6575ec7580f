//! In-memory store used by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use qdrant_addon::connection::ConnectionParams;
use qdrant_addon::error::{Result, VectorDbError};
use qdrant_addon::vector_db::{
    Distance, PointId, SearchParams, SearchResult, StoreConnector, VectorPoint, VectorStore,
};
use std::sync::{Arc, Mutex};

/// Remote calls observed by the fake store
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Create {
        name: String,
        vector_size: u64,
        distance: Distance,
    },
    Delete(String),
    Upsert {
        collection: String,
        points: Vec<VectorPoint>,
    },
    Search {
        collection: String,
        params: SearchParams,
    },
    Health,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub collections: Vec<String>,
    pub calls: Vec<Call>,
    pub search_results: Vec<SearchResult>,
    pub connections: Vec<ConnectionParams>,
    pub fail_connect: bool,
    pub fail_list: bool,
    pub fail_remote: bool,
}

/// Connector handing out stores that share one recorded state
#[derive(Clone, Default)]
pub struct FakeConnector {
    state: Arc<Mutex<FakeState>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collections(names: &[&str]) -> Self {
        let connector = Self::new();
        connector.state().collections = names.iter().map(|n| n.to_string()).collect();
        connector
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Calls that change the store
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Create { .. } | Call::Delete(_) | Call::Upsert { .. }))
            .collect()
    }
}

impl StoreConnector for FakeConnector {
    fn connect(&self, params: &ConnectionParams) -> Result<Box<dyn VectorStore>> {
        let mut state = self.state();
        if state.fail_connect {
            return Err(VectorDbError::Connection("invalid endpoint".to_string()).into());
        }
        state.connections.push(params.clone());

        Ok(Box::new(FakeStore {
            state: self.state.clone(),
        }))
    }
}

struct FakeStore {
    state: Arc<Mutex<FakeState>>,
}

impl FakeStore {
    fn record(&self, call: Call) -> std::sync::MutexGuard<'_, FakeState> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state
    }
}

#[async_trait]
impl VectorStore for FakeStore {
    async fn list_collections(&self) -> Result<Vec<String>> {
        let state = self.record(Call::List);
        if state.fail_list {
            return Err(VectorDbError::ListCollections("store unavailable".to_string()).into());
        }
        Ok(state.collections.clone())
    }

    async fn create_collection(&self, name: &str, vector_size: u64, distance: Distance) -> Result<()> {
        let mut state = self.record(Call::Create {
            name: name.to_string(),
            vector_size,
            distance,
        });
        if state.fail_remote {
            return Err(VectorDbError::CreateCollection("store rejected request".to_string()).into());
        }
        state.collections.push(name.to_string());
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut state = self.record(Call::Delete(name.to_string()));
        if state.fail_remote {
            return Err(VectorDbError::DeleteCollection(format!("Collection `{}` doesn't exist", name)).into());
        }
        state.collections.retain(|c| c != name);
        Ok(())
    }

    async fn upsert_points(&self, collection: &str, points: Vec<VectorPoint>) -> Result<()> {
        let state = self.record(Call::Upsert {
            collection: collection.to_string(),
            points,
        });
        if state.fail_remote {
            return Err(VectorDbError::Upsert("wrong vector dimension".to_string()).into());
        }
        Ok(())
    }

    async fn search(&self, collection: &str, params: SearchParams) -> Result<Vec<SearchResult>> {
        let state = self.record(Call::Search {
            collection: collection.to_string(),
            params,
        });
        if state.fail_remote {
            return Err(VectorDbError::Search("collection not found".to_string()).into());
        }
        Ok(state.search_results.clone())
    }

    async fn health_check(&self) -> Result<String> {
        let state = self.record(Call::Health);
        if state.fail_remote {
            return Err(VectorDbError::Health("unreachable".to_string()).into());
        }
        Ok("1.13.0".to_string())
    }
}

pub fn result(id: u64, score: f32, title: &str) -> SearchResult {
    let mut payload = serde_json::Map::new();
    payload.insert("title".to_string(), serde_json::Value::String(title.to_string()));
    SearchResult {
        id: PointId::Num(id),
        score,
        payload,
    }
}
