//! Raw search hits.
//!
//! The engine returns an ordered list of document identifiers plus a total
//! count; everything else in the raw response is the backend's business.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered hit identifiers and total count from one search execution.
///
/// The identifier order is the engine's relevance (or requested sort)
/// order and is authoritative when mapping hits back to records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHits {
    /// Record keys in engine-returned order.
    pub ids: Vec<String>,
    /// Total number of matching documents, which may exceed `ids.len()`
    /// when the query was paginated.
    pub total: u64,
}

impl SearchHits {
    /// Extract hits from a raw engine response.
    ///
    /// Reads `hits.hits[]._id` and `hits.total.value` (falling back to a
    /// bare numeric `hits.total`). Missing or malformed sections yield an
    /// empty hit set rather than an error.
    pub fn from_response(response: &Value) -> Self {
        let hits = response.get("hits");

        let ids = hits
            .and_then(|h| h.get("hits"))
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|hit| hit.get("_id").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let total = hits
            .and_then(|h| h.get("total"))
            .and_then(|t| t.get("value").and_then(Value::as_u64).or_else(|| t.as_u64()))
            .unwrap_or(0);

        Self { ids, total }
    }

    /// Whether the search matched nothing.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
