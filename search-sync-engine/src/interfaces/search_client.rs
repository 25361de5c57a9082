//! Search client trait definition.
//!
//! The only seam through which the engine touches the network. Everything
//! above this trait is transport-agnostic and testable without a running
//! search engine.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::EngineError;
use crate::sync::BulkOperation;

/// Abstract transport to the backing search engine.
///
/// Implementations own connection setup, pooling, and timeouts. They do
/// not retry: transport failures propagate to the caller, which owns
/// retry policy.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async
/// tasks.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Transmit an ordered batch of index/delete operations as a single
    /// bulk request.
    ///
    /// Per-document failures inside the bulk response are not inspected;
    /// the call either transmits or returns a transport error.
    async fn bulk(&self, operations: &[BulkOperation]) -> Result<(), EngineError>;

    /// Execute a search request against the given index and return the
    /// raw engine response.
    async fn search(&self, index: &str, body: Value) -> Result<Value, EngineError>;

    /// Create an index, optionally with a schema body (settings and
    /// mappings). "Already exists" errors surface unchanged.
    async fn create_index(&self, name: &str, body: Option<Value>) -> Result<(), EngineError>;

    /// Delete an index unconditionally. "Not found" errors surface
    /// unchanged.
    async fn delete_index(&self, name: &str) -> Result<(), EngineError>;
}
