//! Record capability trait.
//!
//! A record type implements `Searchable` to opt into indexing. The record
//! store remains the owner and source of truth; the search index is a
//! derived structure kept in sync from these accessors.

use serde::Serialize;
use serde_json::{Map, Value};

/// Capability interface a record type exposes to the sync engine.
///
/// The engine never inspects a record beyond these accessors: identity,
/// the flattened document to index, the target index, optional shard
/// routing, and optional soft-delete support.
pub trait Searchable {
    /// Stable unique key identifying the record within its index.
    fn search_key(&self) -> String;

    /// Flattened field/value projection the engine indexes.
    ///
    /// An empty map means the record has no searchable content and will be
    /// skipped on save (deletes are unaffected). Fails only when the record
    /// itself cannot produce its projection; the error is propagated
    /// unchanged.
    fn searchable_document(&self) -> Result<Map<String, Value>, serde_json::Error>;

    /// Name of the index this record belongs to.
    fn index_name(&self) -> String;

    /// Shard routing value. `None` or an empty string routes by the
    /// search key.
    fn routing(&self) -> Option<String> {
        None
    }

    /// Whether this record type keeps logically deleted rows searchable.
    fn uses_soft_delete(&self) -> bool {
        false
    }

    /// Tombstone fields merged into the projection when soft-delete mode
    /// is enabled for the engine and supported by the type.
    fn soft_delete_metadata(&self) -> Map<String, Value> {
        Map::new()
    }
}

/// Build a projection map from any serializable value.
///
/// Convenience for `searchable_document` implementations that project the
/// whole record: serializes the value and returns its top-level object.
pub fn to_document<T: Serialize>(value: &T) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            Ok(map)
        }
    }
}
