//! Engine configuration.
//!
//! Connection parameters and the per-index schema registry. Values are
//! read once at startup and treated as immutable for the process
//! lifetime.

use std::collections::HashMap;
use std::env;

use serde_json::Value;

/// Default search engine URL.
const DEFAULT_URL: &str = "http://localhost:9200";

/// Prefix of per-index schema keys in a configuration document.
const INDEX_KEY_PREFIX: &str = "index_";

/// Connection and behavior configuration for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Search engine URL.
    pub url: String,
    /// Basic-auth username.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
    /// API key in `id:secret` form; takes precedence over basic auth.
    pub api_key: Option<String>,
    /// Path to a PEM CA bundle for TLS trust.
    pub ca_cert_path: Option<String>,
    /// Request timeout in seconds; `None` uses the transport default.
    pub timeout_secs: Option<u64>,
    /// Whether soft-deleted records stay indexed with tombstone metadata.
    pub soft_delete: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            username: None,
            password: None,
            api_key: None,
            ca_cert_path: None,
            timeout_secs: None,
            soft_delete: false,
        }
    }
}

impl EngineConfig {
    /// Read configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_URL`: engine URL (default: http://localhost:9200)
    /// - `SEARCH_USER` / `SEARCH_PASSWORD`: basic-auth credentials
    /// - `SEARCH_API_KEY`: API key in `id:secret` form
    /// - `SEARCH_CA_CERT`: path to a PEM CA bundle
    /// - `SEARCH_TIMEOUT_SECS`: request timeout in seconds
    /// - `SEARCH_SOFT_DELETE`: "true" enables soft-delete mode
    pub fn from_env() -> Self {
        Self {
            url: env::var("SEARCH_URL").unwrap_or_else(|_| DEFAULT_URL.to_string()),
            username: env::var("SEARCH_USER").ok(),
            password: env::var("SEARCH_PASSWORD").ok(),
            api_key: env::var("SEARCH_API_KEY").ok(),
            ca_cert_path: env::var("SEARCH_CA_CERT").ok(),
            timeout_secs: env::var("SEARCH_TIMEOUT_SECS")
                .ok()
                .and_then(|value| value.parse().ok()),
            soft_delete: env::var("SEARCH_SOFT_DELETE")
                .map(|value| value == "true" || value == "1")
                .unwrap_or(false),
        }
    }
}

/// Static per-index schema registry.
///
/// Schema bodies (settings and mappings) are keyed by index name and
/// passed explicitly to the lifecycle manager at construction; there is
/// no ambient lookup at call time. An index without an entry is created
/// with the engine's default schema.
#[derive(Debug, Clone, Default)]
pub struct IndexSettings {
    schemas: HashMap<String, Value>,
}

impl IndexSettings {
    /// Empty registry: every index gets the engine default schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema body for an index.
    pub fn insert(&mut self, index: impl Into<String>, body: Value) {
        self.schemas.insert(index.into(), body);
    }

    /// Schema body for an index, if one was registered.
    pub fn get(&self, index: &str) -> Option<&Value> {
        self.schemas.get(index)
    }

    /// Build a registry from a configuration document whose
    /// `index_<name>` keys carry schema bodies. Other keys are ignored.
    pub fn from_value(config: &Value) -> Self {
        let mut settings = Self::new();

        if let Some(object) = config.as_object() {
            for (key, body) in object {
                if let Some(index) = key.strip_prefix(INDEX_KEY_PREFIX) {
                    settings.insert(index, body.clone());
                }
            }
        }

        settings
    }
}
