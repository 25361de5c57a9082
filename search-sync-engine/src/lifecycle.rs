//! Index lifecycle management.
//!
//! Creates and deletes named indices using the static per-index schema
//! registry. Fire-and-forget against the transport adapter: engine-side
//! "already exists" and "not found" errors surface unchanged.

use std::sync::Arc;

use tracing::info;

use crate::config::IndexSettings;
use crate::errors::EngineError;
use crate::interfaces::SearchClient;

/// Creates and deletes indices with their configured schemas.
pub struct IndexLifecycle {
    client: Arc<dyn SearchClient>,
    settings: IndexSettings,
}

impl IndexLifecycle {
    /// Create a lifecycle manager over the given transport and schema
    /// registry.
    pub fn new(client: Arc<dyn SearchClient>, settings: IndexSettings) -> Self {
        Self { client, settings }
    }

    /// Create an index, applying its registered schema body when one
    /// exists; otherwise the engine default schema applies.
    pub async fn create_index(&self, name: &str) -> Result<(), EngineError> {
        let body = self.settings.get(name).cloned();
        info!(index = %name, has_schema = body.is_some(), "Creating index");
        self.client.create_index(name, body).await
    }

    /// Delete an index unconditionally.
    pub async fn delete_index(&self, name: &str) -> Result<(), EngineError> {
        info!(index = %name, "Deleting index");
        self.client.delete_index(name).await
    }
}
