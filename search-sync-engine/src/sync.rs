//! Document codec and bulk operation building.
//!
//! Converts records into the flat documents the engine indexes and builds
//! the ordered bulk operations for one sync call. Pure transformations;
//! no network access.

use serde_json::{Map, Value};

use crate::errors::EngineError;
use search_sync_shared::Searchable;

/// Identity and routing metadata shared by index and delete operations.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRef {
    /// Document id (the record's search key).
    pub id: String,
    /// Index the document lives in.
    pub index: String,
    /// Shard routing value.
    pub routing: String,
}

/// A record encoded for indexing: identity metadata plus the projection.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedDocument {
    pub doc_ref: DocumentRef,
    pub document: Map<String, Value>,
}

/// One indexing or deletion instruction targeted at a specific document.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkOperation {
    /// Upsert the document under its id.
    Index {
        doc_ref: DocumentRef,
        document: Map<String, Value>,
    },
    /// Remove the document by id.
    Delete { doc_ref: DocumentRef },
}

impl BulkOperation {
    /// Identity metadata of the targeted document.
    pub fn doc_ref(&self) -> &DocumentRef {
        match self {
            BulkOperation::Index { doc_ref, .. } => doc_ref,
            BulkOperation::Delete { doc_ref } => doc_ref,
        }
    }

    /// Serialize into bulk body lines: the action line, followed by the
    /// source document for index operations.
    pub fn to_body_lines(&self) -> Vec<Value> {
        match self {
            BulkOperation::Index { doc_ref, document } => vec![
                action_line("index", doc_ref),
                Value::Object(document.clone()),
            ],
            BulkOperation::Delete { doc_ref } => vec![action_line("delete", doc_ref)],
        }
    }
}

fn action_line(action: &str, doc_ref: &DocumentRef) -> Value {
    let mut meta = Map::new();
    meta.insert("_id".to_string(), Value::String(doc_ref.id.clone()));
    meta.insert("_index".to_string(), Value::String(doc_ref.index.clone()));
    meta.insert("routing".to_string(), Value::String(doc_ref.routing.clone()));

    let mut line = Map::new();
    line.insert(action.to_string(), Value::Object(meta));
    Value::Object(line)
}

/// Resolve a record's identity metadata.
///
/// Routing is the record's explicit routing value when non-empty,
/// otherwise the search key.
pub fn document_ref<R: Searchable>(record: &R) -> DocumentRef {
    let id = record.search_key();
    let routing = record
        .routing()
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| id.clone());

    DocumentRef {
        id,
        index: record.index_name(),
        routing,
    }
}

/// Encode a record into its indexable form.
///
/// Fails only when the record cannot produce its projection; the error is
/// propagated unchanged.
pub fn encode<R: Searchable>(record: &R) -> Result<EncodedDocument, EngineError> {
    Ok(EncodedDocument {
        doc_ref: document_ref(record),
        document: record.searchable_document()?,
    })
}

/// Build the ordered bulk operations for one sync call.
///
/// With `deleting == false`, records whose projection is empty are skipped
/// entirely; when `soft_delete` is enabled and the record type supports
/// it, the tombstone metadata is merged into the projection first. With
/// `deleting == true`, every record yields a delete operation and the
/// projection is never consulted.
pub fn build_operations<R: Searchable>(
    records: &[R],
    deleting: bool,
    soft_delete: bool,
) -> Result<Vec<BulkOperation>, EngineError> {
    let mut operations = Vec::with_capacity(records.len());

    for record in records {
        if deleting {
            operations.push(BulkOperation::Delete {
                doc_ref: document_ref(record),
            });
            continue;
        }

        let mut encoded = encode(record)?;
        if encoded.document.is_empty() {
            // Nothing searchable; never indexed.
            continue;
        }

        if soft_delete && record.uses_soft_delete() {
            for (key, value) in record.soft_delete_metadata() {
                encoded.document.insert(key, value);
            }
        }

        operations.push(BulkOperation::Index {
            doc_ref: encoded.doc_ref,
            document: encoded.document,
        });
    }

    Ok(operations)
}
