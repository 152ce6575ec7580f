//! Connection parameter resolution
//!
//! Turns an [`AddonConfig`] into the parameter set used to build a store
//! client. Resolution is pure: it never touches the network.

use crate::config::{AddonConfig, Address, GrpcPreference};
use crate::error::{Result, VectorDbError};
use secrecy::Secret;
use std::time::Duration;

/// REST endpoint used when no address is configured
pub const REST_DEFAULT_URL: &str = "http://localhost:6333";

/// gRPC endpoint used when no address is configured and gRPC is preferred
pub const GRPC_DEFAULT_URL: &str = "http://localhost:6334";

/// Wire protocol a session speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Rest,
    Grpc,
}

/// Parameters for one client session, owned by a single action invocation
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    pub address: Address,

    /// Present only when gRPC is preferred and a gRPC port is configured
    pub grpc: Option<GrpcPreference>,

    pub api_key: Option<Secret<String>>,

    pub timeout: Duration,
}

impl ConnectionParams {
    /// Assemble connection parameters from an addon configuration
    pub fn resolve(config: &AddonConfig) -> Self {
        Self {
            address: config.address(),
            grpc: config.grpc(),
            api_key: config.api_key().cloned(),
            timeout: config.timeout(),
        }
    }

    /// REST unless gRPC is preferred and a gRPC port is configured
    pub fn transport(&self) -> Transport {
        match self.grpc {
            Some(_) => Transport::Grpc,
            None => Transport::Rest,
        }
    }

    /// URL handed to the client. gRPC preference swaps in the gRPC port.
    pub fn endpoint(&self) -> Result<String> {
        match &self.address {
            Address::Url(url) => match self.grpc {
                Some(grpc) => {
                    let mut parsed = reqwest::Url::parse(url)
                        .map_err(|e| VectorDbError::Connection(format!("Invalid URL '{}': {}", url, e)))?;
                    parsed
                        .set_port(Some(grpc.port))
                        .map_err(|_| VectorDbError::Connection(format!("URL '{}' cannot carry a port", url)))?;
                    Ok(parsed.to_string().trim_end_matches('/').to_string())
                }
                None => Ok(url.clone()),
            },
            Address::HostPort(host, port) => {
                let port = self.grpc.map(|g| g.port).unwrap_or(*port);
                Ok(format!("http://{}:{}", host, port))
            }
            Address::ClientDefault => match self.transport() {
                Transport::Rest => Ok(REST_DEFAULT_URL.to_string()),
                Transport::Grpc => Ok(GRPC_DEFAULT_URL.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_url_excludes_host_port() {
        let config = AddonConfig::new("id", "name")
            .with_host("ignored-host", 1234)
            .with_url("http://qdrant:6333");
        let params = ConnectionParams::resolve(&config);

        assert_eq!(params.address, Address::Url("http://qdrant:6333".to_string()));
        assert_eq!(params.endpoint().unwrap(), "http://qdrant:6333");
    }

    #[test]
    fn test_host_port_endpoint() {
        let config = AddonConfig::new("id", "name").with_host("qdrant", 6333);
        let params = ConnectionParams::resolve(&config);

        assert_eq!(params.endpoint().unwrap(), "http://qdrant:6333");
        assert_eq!(params.transport(), Transport::Rest);
    }

    #[test]
    fn test_grpc_present_only_when_fully_configured() {
        let config = AddonConfig::new("id", "name").with_host("qdrant", 6333);
        assert!(ConnectionParams::resolve(&config).grpc.is_none());

        let config = AddonConfig::new("id", "name").with_host("qdrant", 6333).with_grpc(None);
        assert!(ConnectionParams::resolve(&config).grpc.is_none());

        let config = AddonConfig::new("id", "name").with_host("qdrant", 6333).with_grpc(Some(7334));
        let params = ConnectionParams::resolve(&config);
        assert_eq!(params.grpc, Some(GrpcPreference { port: 7334 }));
        assert_eq!(params.endpoint().unwrap(), "http://qdrant:7334");
        assert_eq!(params.transport(), Transport::Grpc);
    }

    #[test]
    fn test_grpc_port_replaces_url_port() {
        let config = AddonConfig::new("id", "name")
            .with_url("https://cloud.example.io:6333")
            .with_grpc(Some(6334));
        let params = ConnectionParams::resolve(&config);

        assert_eq!(params.endpoint().unwrap(), "https://cloud.example.io:6334");
    }

    #[test]
    fn test_api_key_and_timeout() {
        let mut config = AddonConfig::new("id", "name").with_api_key("secret");
        config.timeout = 15;
        let params = ConnectionParams::resolve(&config);

        assert_eq!(params.api_key.as_ref().map(|k| k.expose_secret().as_str()), Some("secret"));
        assert_eq!(params.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_no_address_uses_client_default() {
        let params = ConnectionParams::resolve(&AddonConfig::new("id", "name"));

        assert_eq!(params.address, Address::ClientDefault);
        assert!(params.api_key.is_none());
        assert_eq!(params.timeout, Duration::from_secs(60));
        assert_eq!(params.transport(), Transport::Rest);
        assert_eq!(params.endpoint().unwrap(), REST_DEFAULT_URL);

        let params = ConnectionParams::resolve(&AddonConfig::new("id", "name").with_grpc(Some(6334)));
        assert_eq!(params.endpoint().unwrap(), GRPC_DEFAULT_URL);
    }

    #[test]
    fn test_api_key_is_redacted_in_debug() {
        let config = AddonConfig::new("id", "name").with_api_key("super-secret");
        let rendered = format!("{:?}", ConnectionParams::resolve(&config));
        assert!(!rendered.contains("super-secret"));
    }
}
