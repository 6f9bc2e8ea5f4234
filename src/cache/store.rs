// Request cache keyed by canonical search parameters.
// Deduplicates in-flight fetches and keeps the last settled result per key.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::github::Repository;
use crate::query::{PAGE_SIZE, RequestKey};

/// A successfully fetched page of search results.
/// Immutable once produced; superseded by a newer page, never mutated.
#[derive(Debug, Clone)]
pub struct ResultPage {
    pub items: Vec<Repository>,
    pub total_count: u64,
    pub fetched_at: DateTime<Utc>,
}

impl ResultPage {
    pub fn new(items: Vec<Repository>, total_count: u64) -> Self {
        Self {
            items,
            total_count,
            fetched_at: Utc::now(),
        }
    }

    /// A full page means more results may follow. A short page signals
    /// end-of-results even when `total_count` implies otherwise.
    pub fn is_full(&self) -> bool {
        self.items.len() == PAGE_SIZE as usize
    }
}

/// One cache slot. Holds either the last settled page or the last error
/// for its key, plus the in-flight marker.
#[derive(Debug, Clone, Default)]
pub struct Entry {
    pub page: Option<ResultPage>,
    pub error: Option<String>,
    pub pending: bool,
}

/// In-memory mapping from request key to cache entry.
///
/// Only `begin` and `complete` mutate entries, and both are called
/// exclusively from the event-loop task; consumers read through controller
/// snapshots.
#[derive(Debug, Default)]
pub struct RequestCache {
    entries: HashMap<RequestKey, Entry>,
}

impl RequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a key as in flight.
    ///
    /// Returns `false` when a fetch for the identical key is already
    /// pending: the caller must not spawn a second network operation and
    /// is served when the in-flight one settles.
    pub fn begin(&mut self, key: &RequestKey) -> bool {
        let entry = self.entries.entry(key.clone()).or_default();
        if entry.pending {
            return false;
        }
        entry.pending = true;
        true
    }

    /// Settle a key with the fetch outcome.
    /// A success replaces any prior error; a failure leaves the slot
    /// holding the error instead of data.
    pub fn complete(&mut self, key: &RequestKey, result: Result<ResultPage, String>) {
        let entry = self.entries.entry(key.clone()).or_default();
        entry.pending = false;
        match result {
            Ok(page) => {
                entry.page = Some(page);
                entry.error = None;
            }
            Err(message) => {
                entry.page = None;
                entry.error = Some(message);
            }
        }
    }

    pub fn get(&self, key: &RequestKey) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// The settled page for a key, if any.
    pub fn page(&self, key: &RequestKey) -> Option<&ResultPage> {
        self.entries.get(key).and_then(|entry| entry.page.as_ref())
    }

    pub fn is_pending(&self, key: &RequestKey) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.pending)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{SortKey, search_request};

    fn page_key(page: u32) -> RequestKey {
        search_request("raft", "go", SortKey::Stars, page)
            .unwrap()
            .key()
    }

    #[test]
    fn test_begin_marks_pending() {
        let mut cache = RequestCache::new();
        let key = page_key(1);

        assert!(!cache.is_pending(&key));
        assert!(cache.begin(&key));
        assert!(cache.is_pending(&key));
    }

    #[test]
    fn test_begin_deduplicates_identical_keys() {
        let mut cache = RequestCache::new();
        let key = page_key(1);

        assert!(cache.begin(&key));
        assert!(!cache.begin(&key));

        // A different key is a different request
        assert!(cache.begin(&page_key(2)));
    }

    #[test]
    fn test_complete_stores_page() {
        let mut cache = RequestCache::new();
        let key = page_key(1);

        cache.begin(&key);
        cache.complete(&key, Ok(ResultPage::new(Vec::new(), 0)));

        assert!(!cache.is_pending(&key));
        assert!(cache.page(&key).is_some());
        assert!(cache.get(&key).unwrap().error.is_none());
    }

    #[test]
    fn test_error_replaces_data_in_slot() {
        let mut cache = RequestCache::new();
        let key = page_key(1);

        cache.begin(&key);
        cache.complete(&key, Ok(ResultPage::new(Vec::new(), 10)));
        cache.begin(&key);
        cache.complete(&key, Err("connection reset".to_string()));

        let entry = cache.get(&key).unwrap();
        assert!(entry.page.is_none());
        assert_eq!(entry.error.as_deref(), Some("connection reset"));
    }

    #[test]
    fn test_error_leaves_other_keys_untouched() {
        let mut cache = RequestCache::new();
        let loaded = page_key(1);
        let failed = page_key(2);

        cache.begin(&loaded);
        cache.complete(&loaded, Ok(ResultPage::new(Vec::new(), 10)));
        cache.begin(&failed);
        cache.complete(&failed, Err("boom".to_string()));

        assert!(cache.page(&loaded).is_some());
        assert!(cache.page(&failed).is_none());
    }

    #[test]
    fn test_dedup_preserves_prior_page_while_pending() {
        let mut cache = RequestCache::new();
        let key = page_key(1);

        cache.begin(&key);
        cache.complete(&key, Ok(ResultPage::new(Vec::new(), 10)));

        // Revalidation of the same key keeps the settled page available
        assert!(cache.begin(&key));
        assert!(!cache.begin(&key));
        assert!(cache.page(&key).is_some());
    }

    #[test]
    fn test_short_page_is_not_full() {
        let page = ResultPage::new(Vec::new(), 1000);
        assert!(!page.is_full());
    }
}
