//! Configuration management for the Qdrant addon

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;
use secrecy::{Secret, ExposeSecret};

pub mod loader;
pub mod validation;

/// Secret name under which the host hands over the Qdrant API key
pub const API_KEY_SECRET: &str = "qdrant_api_key";

/// Top-level settings for the standalone server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub addon: AddonConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Addon configuration as handed over by the host framework
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonConfig {
    /// Addon instance identifier
    pub id: String,

    /// Addon category
    #[serde(rename = "type", default = "default_addon_type")]
    pub addon_type: String,

    /// Human-readable addon name
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Secrets declared for this addon
    #[serde(default)]
    pub secrets: Secrets,

    /// Free-form host configuration
    #[serde(default)]
    pub config: HashMap<String, serde_json::Value>,

    /// Qdrant server URL (takes precedence over host/port)
    #[serde(default)]
    pub url: Option<String>,

    /// Qdrant server host
    #[serde(default)]
    pub host: Option<String>,

    /// Qdrant server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Qdrant gRPC port
    #[serde(default = "default_grpc_port")]
    pub grpc_port: Option<u16>,

    /// Prefer gRPC for communication
    #[serde(default)]
    pub prefer_grpc: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Secrets attached to an addon configuration.
///
/// The Qdrant API key is lifted out of the map once, at load time. Every
/// other entry is a secret name the host is expected to provide through
/// credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Secrets {
    #[serde(
        rename = "qdrant_api_key",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_secret",
        deserialize_with = "deserialize_optional_secret"
    )]
    api_key: Option<Secret<String>>,

    #[serde(flatten)]
    declared: BTreeMap<String, String>,
}

impl Secrets {
    /// Build secrets from a raw string map
    pub fn from_map(map: HashMap<String, String>) -> Self {
        let mut declared: BTreeMap<String, String> = map.into_iter().collect();
        let api_key = declared
            .remove(API_KEY_SECRET)
            .filter(|key| !key.is_empty())
            .map(Secret::new);

        Self { api_key, declared }
    }

    /// Typed Qdrant API key, if a non-empty one was supplied
    pub fn api_key(&self) -> Option<&Secret<String>> {
        self.api_key.as_ref()
    }

    /// Replace the API key; an empty key clears it
    pub fn set_api_key(&mut self, key: Secret<String>) {
        self.api_key = if key.expose_secret().is_empty() { None } else { Some(key) };
    }

    /// Names of the secrets the host must supply
    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.declared.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.api_key.is_none() && self.declared.is_empty()
    }
}

/// Where the Qdrant server lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// Full URL, used exclusively
    Url(String),

    /// Host name plus port
    HostPort(String, u16),

    /// Nothing configured; the client library default applies
    ClientDefault,
}

/// gRPC transport preference, present only when fully configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrpcPreference {
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server port
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Server host
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Maximum request body size in MB (0 = unlimited)
    #[serde(default = "default_max_body_size")]
    pub max_body_size_mb: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            host: default_server_host(),
            max_body_size_mb: default_max_body_size(),
        }
    }
}

// Default value functions
fn default_addon_type() -> String { "storage".to_string() }
fn default_enabled() -> bool { true }
fn default_port() -> u16 { 6333 }
fn default_grpc_port() -> Option<u16> { Some(6334) }
fn default_timeout() -> u64 { 60 }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }
fn default_server_port() -> u16 { 8080 }
fn default_server_host() -> String { "0.0.0.0".to_string() }
fn default_max_body_size() -> usize { 10 }

impl AddonConfig {
    /// Create a configuration with default connection settings
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            addon_type: default_addon_type(),
            name: name.into(),
            description: String::new(),
            enabled: default_enabled(),
            secrets: Secrets::default(),
            config: HashMap::new(),
            url: None,
            host: None,
            port: default_port(),
            grpc_port: default_grpc_port(),
            prefer_grpc: false,
            timeout: default_timeout(),
        }
    }

    /// Parse a configuration from the JSON object the host provides
    pub fn from_json(value: serde_json::Value) -> crate::error::Result<Self> {
        let config: AddonConfig = serde_json::from_value(value)
            .map_err(|e| crate::error::AddonError::Config(e.to_string()))?;
        validation::validate_addon_config(&config)?;
        Ok(config)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = Some(host.into());
        self.port = port;
        self
    }

    pub fn with_grpc(mut self, grpc_port: Option<u16>) -> Self {
        self.prefer_grpc = true;
        self.grpc_port = grpc_port;
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.secrets.set_api_key(Secret::new(key.into()));
        self
    }

    /// Resolve the server address; `url` wins over `host`/`port`
    pub fn address(&self) -> Address {
        let non_empty = |s: &Option<String>| s.as_deref().filter(|v| !v.is_empty()).map(str::to_string);

        if let Some(url) = non_empty(&self.url) {
            Address::Url(url)
        } else if let Some(host) = non_empty(&self.host) {
            Address::HostPort(host, self.port)
        } else {
            Address::ClientDefault
        }
    }

    /// gRPC preference, honored only when both the flag and the port are set
    pub fn grpc(&self) -> Option<GrpcPreference> {
        match (self.prefer_grpc, self.grpc_port) {
            (true, Some(port)) => Some(GrpcPreference { port }),
            _ => None,
        }
    }

    pub fn api_key(&self) -> Option<&Secret<String>> {
        self.secrets.api_key()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        loader::load_settings(path)
    }

    /// Load settings with environment variable overrides
    pub fn from_file_with_env<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        loader::load_settings_with_env(path)
    }

    /// Validate these settings
    pub fn validate(&self) -> crate::error::Result<()> {
        validation::validate_settings(self)
    }

    /// Settings pointing at a local Qdrant instance
    pub fn default_config() -> Self {
        Self {
            addon: AddonConfig::new("qdrant-addon", "qdrant").with_url("http://localhost:6333"),
            logging: LoggingConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Custom serializer for Option<Secret<String>>
fn serialize_optional_secret<S>(secret: &Option<Secret<String>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// Custom deserializer for Option<Secret<String>>; empty strings count as absent
fn deserialize_optional_secret<'de, D>(deserializer: D) -> Result<Option<Secret<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.is_empty()).map(Secret::new))
}
