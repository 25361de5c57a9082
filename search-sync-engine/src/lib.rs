//! # Search Sync Engine
//!
//! Keeps a document-search index in sync with a mutable record store and
//! translates engine-agnostic query descriptions into engine-native search
//! requests.
//!
//! The write path encodes records into ordered bulk index/delete
//! operations; the read path translates a query, executes it through the
//! transport adapter, and reconciles the returned hits against the
//! authoritative record store. Only the OpenSearch adapter performs
//! network I/O; every other component is a pure transformation.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod lifecycle;
pub mod opensearch;
pub mod query;
pub mod reconcile;
pub mod sync;

pub use client::SearchSyncClient;
pub use config::{EngineConfig, IndexSettings};
pub use errors::EngineError;
pub use interfaces::SearchClient;
pub use lifecycle::IndexLifecycle;
pub use opensearch::OpenSearchAdapter;
pub use sync::BulkOperation;

pub use search_sync_shared::{
    FilterClause, QueryDescription, SearchHits, SearchOptions, Searchable, SortClause, SortOrder,
};
