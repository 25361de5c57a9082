//! Result reconciliation.
//!
//! Maps raw search hits back onto authoritative records from the record
//! store: stale hits are dropped, and engine relevance order wins over
//! storage iteration order.

use std::collections::HashMap;
use std::future::Future;

use crate::errors::EngineError;
use search_sync_shared::{SearchHits, Searchable};

/// Filter and order fetched records to match the hit order exactly.
///
/// Records whose key is absent from `hits.ids` are dropped: these are
/// either extra rows the store returned or hits whose record was deleted
/// after indexing. Accepts any cursor; stale records are discarded while
/// streaming, so only the surviving set is materialized before ordering.
pub fn order_by_hits<R, I>(hits: &SearchHits, records: I) -> Vec<R>
where
    R: Searchable,
    I: IntoIterator<Item = R>,
{
    if hits.ids.is_empty() {
        return Vec::new();
    }

    let positions: HashMap<&str, usize> = hits
        .ids
        .iter()
        .enumerate()
        .map(|(position, id)| (id.as_str(), position))
        .collect();

    let mut matched: Vec<(usize, R)> = records
        .into_iter()
        .filter_map(|record| {
            let key = record.search_key();
            positions.get(key.as_str()).map(|&position| (position, record))
        })
        .collect();

    matched.sort_by_key(|(position, _)| *position);
    matched.into_iter().map(|(_, record)| record).collect()
}

/// Fetch the hit records from the store and return them in hit order.
///
/// `fetch` receives all hit ids in one call and is responsible for
/// batched retrieval; it is never invoked when the hit set is empty.
pub async fn reconcile<R, F, Fut>(hits: &SearchHits, fetch: F) -> Result<Vec<R>, EngineError>
where
    R: Searchable,
    F: FnOnce(Vec<String>) -> Fut,
    Fut: Future<Output = Result<Vec<R>, EngineError>>,
{
    if hits.ids.is_empty() {
        return Ok(Vec::new());
    }

    let fetched = fetch(hits.ids.clone()).await?;
    Ok(order_by_hits(hits, fetched))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    struct Row(String);

    impl Row {
        fn new(key: &str) -> Self {
            Self(key.to_string())
        }
    }

    impl Searchable for Row {
        fn search_key(&self) -> String {
            self.0.clone()
        }

        fn searchable_document(&self) -> Result<Map<String, Value>, serde_json::Error> {
            let mut doc = Map::new();
            doc.insert("key".to_string(), json!(self.0));
            Ok(doc)
        }

        fn index_name(&self) -> String {
            "rows".to_string()
        }
    }

    fn hits(ids: &[&str]) -> SearchHits {
        SearchHits {
            ids: ids.iter().map(|id| id.to_string()).collect(),
            total: ids.len() as u64,
        }
    }

    #[test]
    fn test_order_matches_hits_and_drops_unrequested() {
        let fetched = vec![Row::new("1"), Row::new("2"), Row::new("3"), Row::new("5")];

        let ordered = order_by_hits(&hits(&["3", "1", "2"]), fetched);

        let keys: Vec<&str> = ordered.iter().map(|row| row.0.as_str()).collect();
        assert_eq!(keys, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_stale_hits_silently_dropped() {
        // "4" was indexed but no longer exists in the store.
        let fetched = vec![Row::new("2"), Row::new("1")];

        let ordered = order_by_hits(&hits(&["1", "4", "2"]), fetched);

        let keys: Vec<&str> = ordered.iter().map(|row| row.0.as_str()).collect();
        assert_eq!(keys, vec!["1", "2"]);
    }

    #[test]
    fn test_empty_hits_yield_empty() {
        let ordered = order_by_hits(&hits(&[]), vec![Row::new("1")]);

        assert!(ordered.is_empty());
    }

    #[test]
    fn test_accepts_streaming_cursor() {
        let cursor = (1..=4).map(|n| Row::new(&n.to_string()));

        let ordered = order_by_hits(&hits(&["2", "4"]), cursor);

        let keys: Vec<&str> = ordered.iter().map(|row| row.0.as_str()).collect();
        assert_eq!(keys, vec!["2", "4"]);
    }

    #[tokio::test]
    async fn test_reconcile_fetches_once_with_all_ids() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_fetch = Arc::clone(&calls);

        let ordered = reconcile(&hits(&["3", "1"]), move |ids| {
            let calls = Arc::clone(&calls_in_fetch);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                assert_eq!(ids, vec!["3".to_string(), "1".to_string()]);
                Ok(vec![Row::new("1"), Row::new("3")])
            }
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let keys: Vec<&str> = ordered.iter().map(|row| row.0.as_str()).collect();
        assert_eq!(keys, vec!["3", "1"]);
    }

    #[tokio::test]
    async fn test_reconcile_skips_fetch_on_empty_hits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_fetch = Arc::clone(&calls);

        let ordered: Vec<Row> = reconcile(&hits(&[]), move |_ids| {
            let calls = Arc::clone(&calls_in_fetch);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Vec::new())
            }
        })
        .await
        .unwrap();

        assert!(ordered.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
