//! Search sync client.
//!
//! The main entry point: synchronizes record batches into the index and
//! runs translated queries, delegating all network I/O to the injected
//! `SearchClient`.

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::config::{EngineConfig, IndexSettings};
use crate::errors::EngineError;
use crate::interfaces::SearchClient;
use crate::lifecycle::IndexLifecycle;
use crate::{query, reconcile, sync};
use search_sync_shared::{QueryDescription, SearchHits, SearchOptions, Searchable};

/// Drives the write and read paths of the search index.
///
/// Each call is a self-contained unit of work with no shared mutable
/// state; concurrent calls for disjoint record batches are safe, and
/// ordering is only guaranteed within a single batch.
pub struct SearchSyncClient {
    client: Arc<dyn SearchClient>,
    soft_delete: bool,
    lifecycle: IndexLifecycle,
}

impl SearchSyncClient {
    /// Create a client over the given transport, configuration, and
    /// per-index schema registry.
    pub fn new(
        client: Arc<dyn SearchClient>,
        config: &EngineConfig,
        settings: IndexSettings,
    ) -> Self {
        Self {
            soft_delete: config.soft_delete,
            lifecycle: IndexLifecycle::new(Arc::clone(&client), settings),
            client,
        }
    }

    /// Index the given records, skipping any whose projection is empty.
    pub async fn save<R: Searchable>(&self, records: &[R]) -> Result<(), EngineError> {
        self.sync(records, false).await
    }

    /// Remove the given records from the index. Projection content is
    /// never consulted for deletes.
    pub async fn delete<R: Searchable>(&self, records: &[R]) -> Result<(), EngineError> {
        self.sync(records, true).await
    }

    /// Build and transmit one ordered bulk request for a record batch.
    ///
    /// An empty batch is a no-op with zero network calls; the same holds
    /// when every record was skipped for having no searchable content.
    pub async fn sync<R: Searchable>(
        &self,
        records: &[R],
        deleting: bool,
    ) -> Result<(), EngineError> {
        if records.is_empty() {
            return Ok(());
        }

        let operations = sync::build_operations(records, deleting, self.soft_delete)?;
        if operations.is_empty() {
            debug!(records = records.len(), "No indexable content in batch");
            return Ok(());
        }

        self.client.bulk(&operations).await
    }

    /// Translate and execute a query, returning the ordered raw hits.
    pub async fn search(
        &self,
        query: &QueryDescription,
        options: &SearchOptions,
    ) -> Result<SearchHits, EngineError> {
        let body = query::translate(query, options)?;
        let response = self.client.search(&options.index, body).await?;
        Ok(SearchHits::from_response(&response))
    }

    /// Execute a query for one page of results (1-based page numbers).
    pub async fn paginate(
        &self,
        query: &QueryDescription,
        options: &SearchOptions,
        page: u64,
        per_page: u64,
    ) -> Result<SearchHits, EngineError> {
        let options = options
            .clone()
            .with_offset(page.saturating_sub(1) * per_page)
            .with_size(per_page);
        self.search(query, &options).await
    }

    /// Order fetched records by hit position, dropping stale hits.
    ///
    /// Accepts an eager collection or a streaming cursor.
    pub fn map<R, I>(&self, hits: &SearchHits, records: I) -> Vec<R>
    where
        R: Searchable,
        I: IntoIterator<Item = R>,
    {
        reconcile::order_by_hits(hits, records)
    }

    /// Fetch the hit records from the store and return them in hit
    /// order; `fetch` is never invoked for an empty hit set.
    pub async fn reconcile<R, F, Fut>(
        &self,
        hits: &SearchHits,
        fetch: F,
    ) -> Result<Vec<R>, EngineError>
    where
        R: Searchable,
        F: FnOnce(Vec<String>) -> Fut,
        Fut: Future<Output = Result<Vec<R>, EngineError>>,
    {
        reconcile::reconcile(hits, fetch).await
    }

    /// Create an index with its registered schema, if any.
    pub async fn create_index(&self, name: &str) -> Result<(), EngineError> {
        self.lifecycle.create_index(name).await
    }

    /// Delete an index unconditionally.
    pub async fn delete_index(&self, name: &str) -> Result<(), EngineError> {
        self.lifecycle.delete_index(name).await
    }

    /// Drop the whole index a record type lives in.
    pub async fn flush<R: Searchable>(&self, record: &R) -> Result<(), EngineError> {
        self.lifecycle.delete_index(&record.index_name()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Map, Value};
    use std::sync::Mutex;

    use crate::sync::BulkOperation;

    struct TestRecord {
        key: String,
        fields: Map<String, Value>,
    }

    impl TestRecord {
        fn new(key: &str, title: &str) -> Self {
            let mut fields = Map::new();
            fields.insert("title".to_string(), json!(title));
            Self {
                key: key.to_string(),
                fields,
            }
        }

        fn empty(key: &str) -> Self {
            Self {
                key: key.to_string(),
                fields: Map::new(),
            }
        }
    }

    impl Searchable for TestRecord {
        fn search_key(&self) -> String {
            self.key.clone()
        }

        fn searchable_document(&self) -> Result<Map<String, Value>, serde_json::Error> {
            Ok(self.fields.clone())
        }

        fn index_name(&self) -> String {
            "articles".to_string()
        }
    }

    #[derive(Default)]
    struct MockClient {
        bulk_calls: Mutex<Vec<Vec<BulkOperation>>>,
        search_calls: Mutex<Vec<(String, Value)>>,
        deleted_indices: Mutex<Vec<String>>,
        search_response: Mutex<Value>,
    }

    impl MockClient {
        fn with_response(response: Value) -> Self {
            Self {
                search_response: Mutex::new(response),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl SearchClient for MockClient {
        async fn bulk(&self, operations: &[BulkOperation]) -> Result<(), EngineError> {
            self.bulk_calls.lock().unwrap().push(operations.to_vec());
            Ok(())
        }

        async fn search(&self, index: &str, body: Value) -> Result<Value, EngineError> {
            self.search_calls
                .lock()
                .unwrap()
                .push((index.to_string(), body));
            Ok(self.search_response.lock().unwrap().clone())
        }

        async fn create_index(
            &self,
            _name: &str,
            _body: Option<Value>,
        ) -> Result<(), EngineError> {
            Ok(())
        }

        async fn delete_index(&self, name: &str) -> Result<(), EngineError> {
            self.deleted_indices.lock().unwrap().push(name.to_string());
            Ok(())
        }
    }

    fn client_over(mock: Arc<MockClient>) -> SearchSyncClient {
        SearchSyncClient::new(
            mock as Arc<dyn SearchClient>,
            &EngineConfig::default(),
            IndexSettings::new(),
        )
    }

    #[tokio::test]
    async fn test_save_empty_batch_issues_no_network_call() {
        let mock = Arc::new(MockClient::default());
        let client = client_over(Arc::clone(&mock));

        client.save::<TestRecord>(&[]).await.unwrap();

        assert!(mock.bulk_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_all_empty_projections_issues_no_network_call() {
        let mock = Arc::new(MockClient::default());
        let client = client_over(Arc::clone(&mock));

        client
            .save(&[TestRecord::empty("1"), TestRecord::empty("2")])
            .await
            .unwrap();

        assert!(mock.bulk_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_sends_one_bulk_request_in_order() {
        let mock = Arc::new(MockClient::default());
        let client = client_over(Arc::clone(&mock));

        client
            .save(&[
                TestRecord::new("1", "a"),
                TestRecord::empty("2"),
                TestRecord::new("3", "c"),
            ])
            .await
            .unwrap();

        let calls = mock.bulk_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let ids: Vec<&str> = calls[0].iter().map(|op| op.doc_ref().id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_delete_keeps_every_record() {
        let mock = Arc::new(MockClient::default());
        let client = client_over(Arc::clone(&mock));

        client
            .delete(&[TestRecord::empty("1"), TestRecord::new("2", "b")])
            .await
            .unwrap();

        let calls = mock.bulk_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 2);
        assert!(calls[0]
            .iter()
            .all(|op| matches!(op, BulkOperation::Delete { .. })));
    }

    #[tokio::test]
    async fn test_search_targets_index_and_parses_hits() {
        let mock = Arc::new(MockClient::with_response(json!({
            "hits": {
                "total": { "value": 2 },
                "hits": [{ "_id": "b" }, { "_id": "a" }]
            }
        })));
        let client = client_over(Arc::clone(&mock));

        let hits = client
            .search(
                &QueryDescription::free_text("x"),
                &SearchOptions::new("articles"),
            )
            .await
            .unwrap();

        assert_eq!(hits.ids, vec!["b", "a"]);
        assert_eq!(hits.total, 2);

        let calls = mock.search_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "articles");
        assert_eq!(
            calls[0].1["query"]["bool"]["must"][0]["query_string"]["query"],
            "*x*"
        );
    }

    #[tokio::test]
    async fn test_paginate_maps_page_to_offset() {
        let mock = Arc::new(MockClient::with_response(json!({
            "hits": { "total": { "value": 0 }, "hits": [] }
        })));
        let client = client_over(Arc::clone(&mock));

        client
            .paginate(
                &QueryDescription::free_text("x"),
                &SearchOptions::new("articles"),
                2,
                10,
            )
            .await
            .unwrap();

        let calls = mock.search_calls.lock().unwrap();
        assert_eq!(calls[0].1["from"], 10);
        assert_eq!(calls[0].1["size"], 10);
    }

    #[tokio::test]
    async fn test_invalid_query_raised_before_network_call() {
        let mock = Arc::new(MockClient::default());
        let client = client_over(Arc::clone(&mock));

        let result = client
            .search(
                &QueryDescription::FieldMatch(Map::new()),
                &SearchOptions::new("articles"),
            )
            .await;

        assert!(matches!(result, Err(EngineError::InvalidQuery(_))));
        assert!(mock.search_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_flush_drops_record_index() {
        let mock = Arc::new(MockClient::default());
        let client = client_over(Arc::clone(&mock));

        client.flush(&TestRecord::new("1", "a")).await.unwrap();

        assert_eq!(*mock.deleted_indices.lock().unwrap(), vec!["articles"]);
    }

    #[tokio::test]
    async fn test_map_orders_by_hits() {
        let mock = Arc::new(MockClient::default());
        let client = client_over(Arc::clone(&mock));
        let hits = SearchHits {
            ids: vec!["3".to_string(), "1".to_string()],
            total: 2,
        };

        let ordered = client.map(
            &hits,
            vec![TestRecord::new("1", "a"), TestRecord::new("3", "c")],
        );

        let keys: Vec<&str> = ordered.iter().map(|record| record.key.as_str()).collect();
        assert_eq!(keys, vec!["3", "1"]);
    }
}
