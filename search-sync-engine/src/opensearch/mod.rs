//! OpenSearch implementation of the search client.
//!
//! This module provides the concrete implementation of `SearchClient`
//! using the OpenSearch Rust client.

mod client;

pub use client::OpenSearchAdapter;
