//! Configuration Management
//!
//! Provider settings, resolved as CLI flag > environment > config file > default.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Public Azure cloud management endpoint
pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";

const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Subscription every resource group lives in
    #[serde(default)]
    pub subscription_id: Option<String>,
    /// ARM endpoint (sovereign clouds, test doubles)
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Bearer token; never written back to disk
    #[serde(skip)]
    pub access_token: Option<String>,
    /// Default delay between long-running operation polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            subscription_id: None,
            endpoint: None,
            access_token: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ProviderConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("azurerm-provider").join("config.json"))
    }

    /// Load configuration from the default location, then apply the environment
    pub fn load() -> Self {
        let mut config = Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Load configuration from `path`; a missing or unreadable file yields defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Overlay `ARM_*` environment variables
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("ARM_SUBSCRIPTION_ID") {
            self.subscription_id = Some(v);
        }
        if let Some(v) = non_empty("ARM_ENDPOINT") {
            self.endpoint = Some(v);
        }
        if let Some(v) = non_empty("ARM_ACCESS_TOKEN") {
            self.access_token = Some(v);
        }
    }

    /// Save configuration to disk
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("creating {:?}: {}", parent, e)))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("serializing config: {}", e)))?;
        std::fs::write(path, content)
            .map_err(|e| Error::Config(format!("writing {:?}: {}", path, e)))?;

        Ok(())
    }

    /// Get effective endpoint (configured or public cloud)
    pub fn effective_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    /// Check everything the ARM client needs is present
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.subscription_id.as_deref().map_or(true, |s| s.trim().is_empty()) {
            problems.push("subscription_id is required (set ARM_SUBSCRIPTION_ID)".to_string());
        }
        if self.access_token.as_deref().map_or(true, |s| s.trim().is_empty()) {
            problems.push("an access token is required (set ARM_ACCESS_TOKEN)".to_string());
        }
        match url::Url::parse(&self.effective_endpoint()) {
            Ok(url) if url.scheme() == "https" || url.scheme() == "http" => {},
            Ok(url) => problems.push(format!("endpoint scheme {:?} is not http(s)", url.scheme())),
            Err(e) => problems.push(format!("endpoint is not an absolute URL: {}", e)),
        }
        if self.poll_interval_secs > 3600 {
            problems.push("poll_interval_secs must be at most 3600".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(problems.join("; ")))
        }
    }
}
