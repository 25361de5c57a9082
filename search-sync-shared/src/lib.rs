//! # Search Sync Shared
//!
//! Shared types for the search sync engine: the `Searchable` capability
//! trait implemented by record types, the query description and option
//! types callers build search requests from, and the raw hit set returned
//! by the engine.

pub mod hits;
pub mod query;
pub mod searchable;

pub use hits::SearchHits;
pub use query::{FilterClause, QueryDescription, SearchOptions, SortClause, SortOrder};
pub use searchable::{to_document, Searchable};
