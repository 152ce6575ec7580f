//! Host-facing addon surface
//!
//! The host framework loads configuration and credentials into the addon,
//! optionally registers an observer, and then dispatches actions by name
//! with JSON arguments.

use crate::actions::{ActionExecutor, ActionKind};
use crate::config::{AddonConfig, API_KEY_SECRET};
use crate::error::{AddonError, Result};
use crate::response::ActionResponse;
use chrono::{DateTime, Utc};
use secrecy::Secret;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Addon category reported to the host
pub const ADDON_TYPE: &str = "storage";

/// Notification sent to the observer after each dispatched action
#[derive(Debug, Clone, Serialize)]
pub struct ActionEvent {
    pub addon_id: Option<String>,
    pub action: String,
    pub code: u16,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Observer callback registered by the host
pub type ObserverCallback = Arc<dyn Fn(&ActionEvent) + Send + Sync>;

/// The Qdrant storage addon
pub struct QdrantAddon {
    config: Option<AddonConfig>,
    credentials: HashMap<String, Secret<String>>,
    observer: Option<ObserverCallback>,
    addon_id: Option<String>,
    executor: ActionExecutor,
}

impl QdrantAddon {
    /// Create an unconfigured addon backed by the Qdrant client
    pub fn new() -> Self {
        Self::with_executor(ActionExecutor::qdrant())
    }

    pub fn with_executor(executor: ActionExecutor) -> Self {
        Self {
            config: None,
            credentials: HashMap::new(),
            observer: None,
            addon_id: None,
            executor,
        }
    }

    pub fn addon_type(&self) -> &'static str {
        ADDON_TYPE
    }

    pub fn config(&self) -> Option<&AddonConfig> {
        self.config.as_ref()
    }

    pub fn addon_id(&self) -> Option<&str> {
        self.addon_id.as_deref()
    }

    pub fn executor(&self) -> &ActionExecutor {
        &self.executor
    }

    /// Load configuration from the JSON object the host provides
    pub fn load_addon_config(&mut self, value: serde_json::Value) -> Result<()> {
        let config = AddonConfig::from_json(value).map_err(|e| {
            error!("Failed to load addon config: {}", e);
            e
        })?;
        self.install_config(config);
        Ok(())
    }

    /// Install an already-validated configuration
    pub fn load_config(&mut self, config: AddonConfig) -> Result<()> {
        crate::config::validation::validate_addon_config(&config)?;
        self.install_config(config);
        Ok(())
    }

    fn install_config(&mut self, mut config: AddonConfig) {
        if let Some(key) = self.credentials.get(API_KEY_SECRET) {
            config.secrets.set_api_key(key.clone());
        }
        info!("Addon config loaded for '{}'", config.name);
        self.config = Some(config);
    }

    /// Store credentials, checking that every declared secret is present
    pub fn load_credentials(&mut self, credentials: HashMap<String, String>) -> Result<()> {
        if let Some(config) = &self.config {
            let missing: Vec<&str> = config
                .secrets
                .required_names()
                .filter(|name| !credentials.contains_key(*name))
                .collect();

            if !missing.is_empty() {
                let message = format!("Missing required secrets: {}", missing.join(", "));
                error!("{}", message);
                return Err(AddonError::Credentials(message));
            }
        }

        for (name, value) in credentials {
            self.credentials.insert(name, Secret::new(value));
        }

        if let (Some(config), Some(key)) = (self.config.as_mut(), self.credentials.get(API_KEY_SECRET)) {
            config.secrets.set_api_key(key.clone());
        }

        info!("Loaded {} credentials", self.credentials.len());
        Ok(())
    }

    pub fn credential(&self, name: &str) -> Option<&Secret<String>> {
        self.credentials.get(name)
    }

    pub fn set_observer_callback(&mut self, callback: ObserverCallback, addon_id: impl Into<String>) {
        self.observer = Some(callback);
        self.addon_id = Some(addon_id.into());
    }

    /// Run an action by name.
    ///
    /// `Err` covers only problems before the action starts: unknown name,
    /// a non-object argument body, missing or disabled configuration.
    /// Everything else, including mistyped fields, is encoded in the envelope.
    pub async fn dispatch(&self, action: &str, args: serde_json::Value) -> Result<ActionResponse<serde_json::Value>> {
        let kind: ActionKind = action.parse()?;
        let config = self.config.as_ref().ok_or(AddonError::NotConfigured)?;

        if !config.enabled {
            return Err(AddonError::Disabled(config.name.clone()));
        }

        debug!("Dispatching action: {}", kind);
        let response = self.executor.dispatch(config, kind, args).await?;

        if let Some(observer) = &self.observer {
            observer(&ActionEvent {
                addon_id: self.addon_id.clone(),
                action: kind.to_string(),
                code: response.code,
                message: response.message.clone(),
                timestamp: Utc::now(),
            });
        }

        Ok(response)
    }
}

impl Default for QdrantAddon {
    fn default() -> Self {
        Self::new()
    }
}
