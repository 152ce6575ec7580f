//! Health checks against the configured Qdrant server

use crate::config::AddonConfig;
use crate::connection::ConnectionParams;
use crate::vector_db::StoreConnector;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Upper bound on a single health check
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Health status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Component health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,

    /// Health status
    pub status: HealthStatus,

    /// Optional message
    pub message: Option<String>,

    /// Response time in milliseconds
    pub response_time_ms: Option<u64>,
}

/// Overall system health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemHealth {
    /// Overall status
    pub status: HealthStatus,

    /// Uptime in seconds
    pub uptime_secs: u64,

    /// Component health checks
    pub components: Vec<ComponentHealth>,

    /// Timestamp
    pub timestamp: i64,
}

/// Cached health check result
#[derive(Debug, Clone)]
struct CachedHealth {
    result: SystemHealth,
    cached_at: Instant,
}

/// Health checker with caching
pub struct HealthChecker {
    start_time: Instant,
    connector: Arc<dyn StoreConnector>,
    cached_result: RwLock<Option<CachedHealth>>,
    cache_ttl: Duration,
}

impl HealthChecker {
    /// Create a new health checker with default 30-second cache TTL
    pub fn new(connector: Arc<dyn StoreConnector>) -> Self {
        Self::with_cache_ttl(connector, Duration::from_secs(30))
    }

    /// Create a new health checker with custom cache TTL
    pub fn with_cache_ttl(connector: Arc<dyn StoreConnector>, cache_ttl: Duration) -> Self {
        Self {
            start_time: Instant::now(),
            connector,
            cached_result: RwLock::new(None),
            cache_ttl,
        }
    }

    /// Check overall health, reusing a recent result when available
    pub async fn check_health(&self, config: Option<&AddonConfig>) -> SystemHealth {
        {
            let cached = self.cached_result.read().await;
            if let Some(cached_health) = &*cached {
                if cached_health.cached_at.elapsed() < self.cache_ttl {
                    debug!("Returning cached health check result");
                    return cached_health.result.clone();
                }
            }
        }

        debug!("Performing fresh health check");
        let components = vec![self.check_vector_db(config).await];
        let health = SystemHealth {
            status: overall_status(&components),
            uptime_secs: self.start_time.elapsed().as_secs(),
            components,
            timestamp: chrono::Utc::now().timestamp(),
        };

        *self.cached_result.write().await = Some(CachedHealth {
            result: health.clone(),
            cached_at: Instant::now(),
        });

        health
    }

    async fn check_vector_db(&self, config: Option<&AddonConfig>) -> ComponentHealth {
        let name = "vector_database".to_string();

        let Some(config) = config else {
            return ComponentHealth {
                name,
                status: HealthStatus::Degraded,
                message: Some("Not configured".to_string()),
                response_time_ms: None,
            };
        };

        let start = Instant::now();
        let store = match self.connector.connect(&ConnectionParams::resolve(config)) {
            Ok(store) => store,
            Err(e) => {
                return ComponentHealth {
                    name,
                    status: HealthStatus::Unhealthy,
                    message: Some(format!("Client error: {}", e)),
                    response_time_ms: None,
                };
            }
        };

        match tokio::time::timeout(CHECK_TIMEOUT, store.health_check()).await {
            Ok(Ok(version)) => ComponentHealth {
                name,
                status: HealthStatus::Healthy,
                message: Some(format!("Qdrant {} operational", version)),
                response_time_ms: Some(start.elapsed().as_millis() as u64),
            },
            Ok(Err(e)) => ComponentHealth {
                name,
                status: HealthStatus::Unhealthy,
                message: Some(format!("Database error: {}", e)),
                response_time_ms: Some(start.elapsed().as_millis() as u64),
            },
            Err(_) => ComponentHealth {
                name,
                status: HealthStatus::Unhealthy,
                message: Some("Health check timeout".to_string()),
                response_time_ms: Some(CHECK_TIMEOUT.as_millis() as u64),
            },
        }
    }
}

fn overall_status(components: &[ComponentHealth]) -> HealthStatus {
    if components.iter().all(|c| c.status == HealthStatus::Healthy) {
        HealthStatus::Healthy
    } else if components.iter().any(|c| c.status == HealthStatus::Unhealthy) {
        HealthStatus::Unhealthy
    } else {
        HealthStatus::Degraded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, VectorDbError};
    use crate::vector_db::{Distance, SearchParams, SearchResult, VectorPoint, VectorStore};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubStore {
        healthy: bool,
    }

    #[async_trait]
    impl VectorStore for StubStore {
        async fn list_collections(&self) -> Result<Vec<String>> { Ok(Vec::new()) }
        async fn create_collection(&self, _: &str, _: u64, _: Distance) -> Result<()> { Ok(()) }
        async fn delete_collection(&self, _: &str) -> Result<()> { Ok(()) }
        async fn upsert_points(&self, _: &str, _: Vec<VectorPoint>) -> Result<()> { Ok(()) }
        async fn search(&self, _: &str, _: SearchParams) -> Result<Vec<SearchResult>> { Ok(Vec::new()) }

        async fn health_check(&self) -> Result<String> {
            if self.healthy {
                Ok("1.12.0".to_string())
            } else {
                Err(VectorDbError::Health("connection refused".to_string()).into())
            }
        }
    }

    struct StubConnector {
        healthy: bool,
        connects: AtomicUsize,
    }

    impl StoreConnector for StubConnector {
        fn connect(&self, _: &ConnectionParams) -> Result<Box<dyn VectorStore>> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(StubStore { healthy: self.healthy }))
        }
    }

    fn connector(healthy: bool) -> Arc<StubConnector> {
        Arc::new(StubConnector { healthy, connects: AtomicUsize::new(0) })
    }

    #[tokio::test]
    async fn test_unconfigured_is_degraded() {
        let checker = HealthChecker::new(connector(true));
        let health = checker.check_health(None).await;

        assert_eq!(health.status, HealthStatus::Degraded);
    }

    #[tokio::test]
    async fn test_healthy_store() {
        let checker = HealthChecker::new(connector(true));
        let config = AddonConfig::new("id", "name");
        let health = checker.check_health(Some(&config)).await;

        assert_eq!(health.status, HealthStatus::Healthy);
        assert!(health.components[0].message.as_deref().unwrap().contains("1.12.0"));
    }

    #[tokio::test]
    async fn test_unhealthy_store() {
        let checker = HealthChecker::new(connector(false));
        let config = AddonConfig::new("id", "name");
        let health = checker.check_health(Some(&config)).await;

        assert_eq!(health.status, HealthStatus::Unhealthy);
    }

    #[tokio::test]
    async fn test_result_is_cached() {
        let stub = connector(true);
        let checker = HealthChecker::new(stub.clone());
        let config = AddonConfig::new("id", "name");

        checker.check_health(Some(&config)).await;
        checker.check_health(Some(&config)).await;

        assert_eq!(stub.connects.load(Ordering::SeqCst), 1);
    }
}
