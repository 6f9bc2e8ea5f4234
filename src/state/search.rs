// Search tab state management.
// Free-text repository search with language and sort filters.

use crate::cache::RequestCache;
use crate::query::{RequestKey, SearchRequest, SortKey, search_request};

use super::ListCursor;
use super::controller::{FetchJob, Phase, QueryState, Snapshot};

/// Complete state for the Search tab.
///
/// Search is submit-gated: typing edits `input`, but only `submit` moves
/// it into the active query. Language and sort changes apply immediately.
#[derive(Debug, Default)]
pub struct SearchTabState {
    /// Text being typed in the query box.
    pub input: String,
    /// Last submitted query; empty means no request is issuable.
    submitted: String,
    language: String,
    sort: SortKey,
    core: QueryState,
    /// Keyboard selection over the visible results.
    pub cursor: ListCursor,
}

impl SearchTabState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> &str {
        &self.submitted
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn phase(&self) -> Phase {
        self.core.phase()
    }

    fn request(&self) -> Option<SearchRequest> {
        search_request(&self.submitted, &self.language, self.sort, self.core.page())
    }

    fn refresh(&mut self, cache: &mut RequestCache) -> Option<FetchJob> {
        let request = self.request();
        self.core.issue(request, cache)
    }

    /// Submit the typed query. An all-whitespace query is ignored so an
    /// active view is never torn down by an unissuable request.
    pub fn submit(&mut self, cache: &mut RequestCache) -> Option<FetchJob> {
        let text = self.input.trim();
        if text.is_empty() {
            return None;
        }
        self.submitted = text.to_string();
        self.core.reset_page();
        self.refresh(cache)
    }

    pub fn set_language(&mut self, language: String, cache: &mut RequestCache) -> Option<FetchJob> {
        if self.language == language {
            return None;
        }
        self.language = language;
        self.core.reset_page();
        self.refresh(cache)
    }

    pub fn set_sort(&mut self, sort: SortKey, cache: &mut RequestCache) -> Option<FetchJob> {
        if self.sort == sort {
            return None;
        }
        self.sort = sort;
        self.core.reset_page();
        self.refresh(cache)
    }

    pub fn next_page(&mut self, cache: &mut RequestCache) -> Option<FetchJob> {
        if !self.core.can_advance() {
            return None;
        }
        self.core.advance_page();
        self.refresh(cache)
    }

    pub fn previous_page(&mut self, cache: &mut RequestCache) -> Option<FetchJob> {
        if !self.core.can_retreat() {
            return None;
        }
        self.core.retreat_page();
        self.refresh(cache)
    }

    /// Re-issue the current key after a failure.
    pub fn retry(&mut self, cache: &mut RequestCache) -> Option<FetchJob> {
        self.core.clear_error();
        self.refresh(cache)
    }

    pub fn on_settled(&mut self, key: &RequestKey, generation: u64, cache: &RequestCache) -> bool {
        self.core.on_settled(key, generation, cache)
    }

    pub fn snapshot<'a>(&'a self, cache: &'a RequestCache) -> Snapshot<'a> {
        self.core.snapshot(cache)
    }

    /// Snapshot plus the selection cursor, split-borrowed for rendering.
    pub fn view<'a>(&'a mut self, cache: &'a RequestCache) -> (Snapshot<'a>, &'a mut ListCursor) {
        (self.core.snapshot(cache), &mut self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ResultPage;
    use crate::query::PAGE_SIZE;

    fn settle_full(state: &mut SearchTabState, cache: &mut RequestCache, job: &FetchJob) {
        let items = std::iter::repeat_with(test_repo)
            .take(PAGE_SIZE as usize)
            .collect();
        cache.complete(&job.key, Ok(ResultPage::new(items, 1000)));
        assert!(state.on_settled(&job.key, job.generation, cache));
    }

    fn test_repo() -> crate::github::Repository {
        serde_json::from_str(
            r#"{
                "id": 1, "name": "r", "full_name": "o/r",
                "owner": {"id": 1, "login": "o", "avatar_url": null},
                "description": null, "language": null,
                "stargazers_count": 0, "forks_count": 0, "open_issues_count": 0,
                "html_url": "https://github.com/o/r",
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_submit_issues_nothing() {
        let mut cache = RequestCache::new();
        let mut state = SearchTabState::new();

        state.input = "   ".to_string();
        assert!(state.submit(&mut cache).is_none());
        assert_eq!(state.phase(), Phase::Idle);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_submit_builds_page_one_request() {
        let mut cache = RequestCache::new();
        let mut state = SearchTabState::new();

        state.input = "raft".to_string();
        let job = state.submit(&mut cache).unwrap();
        assert_eq!(job.request.q, "raft");
        assert_eq!(job.request.page, 1);
    }

    #[test]
    fn test_language_change_resets_page() {
        let mut cache = RequestCache::new();
        let mut state = SearchTabState::new();

        state.input = "raft".to_string();
        let job = state.submit(&mut cache).unwrap();
        settle_full(&mut state, &mut cache, &job);

        let job = state.next_page(&mut cache).unwrap();
        assert_eq!(job.request.page, 2);
        settle_full(&mut state, &mut cache, &job);

        let job = state.set_language("go".to_string(), &mut cache).unwrap();
        assert_eq!(job.request.page, 1);
        assert_eq!(job.request.q, "raft language:go");
    }

    #[test]
    fn test_sort_change_resets_page() {
        let mut cache = RequestCache::new();
        let mut state = SearchTabState::new();

        state.input = "raft".to_string();
        let job = state.submit(&mut cache).unwrap();
        settle_full(&mut state, &mut cache, &job);
        let job = state.next_page(&mut cache).unwrap();
        settle_full(&mut state, &mut cache, &job);

        let job = state.set_sort(SortKey::Forks, &mut cache).unwrap();
        assert_eq!(job.request.page, 1);
        assert_eq!(job.request.sort, SortKey::Forks);
    }

    #[test]
    fn test_resubmit_resets_page() {
        let mut cache = RequestCache::new();
        let mut state = SearchTabState::new();

        state.input = "raft".to_string();
        let job = state.submit(&mut cache).unwrap();
        settle_full(&mut state, &mut cache, &job);
        let job = state.next_page(&mut cache).unwrap();
        settle_full(&mut state, &mut cache, &job);

        state.input = "paxos".to_string();
        let job = state.submit(&mut cache).unwrap();
        assert_eq!(job.request.page, 1);
        assert_eq!(job.request.q, "paxos");
    }

    #[test]
    fn test_unchanged_filter_is_a_no_op() {
        let mut cache = RequestCache::new();
        let mut state = SearchTabState::new();

        state.input = "raft".to_string();
        let job = state.submit(&mut cache).unwrap();
        settle_full(&mut state, &mut cache, &job);
        let job = state.next_page(&mut cache).unwrap();
        settle_full(&mut state, &mut cache, &job);

        assert!(state.set_language(String::new(), &mut cache).is_none());
        assert!(state.set_sort(SortKey::Stars, &mut cache).is_none());
        assert_eq!(state.snapshot(&cache).page, 2);
    }

    #[test]
    fn test_next_page_gated_on_full_page() {
        let mut cache = RequestCache::new();
        let mut state = SearchTabState::new();

        state.input = "raft".to_string();
        let job = state.submit(&mut cache).unwrap();
        cache.complete(&job.key, Ok(ResultPage::new(vec![test_repo()], 1000)));
        state.on_settled(&job.key, job.generation, &cache);

        // Short page: end of results regardless of total_count
        assert!(state.next_page(&mut cache).is_none());
        assert_eq!(state.snapshot(&cache).page, 1);
    }

    #[test]
    fn test_previous_page_clamped_at_one() {
        let mut cache = RequestCache::new();
        let mut state = SearchTabState::new();

        state.input = "raft".to_string();
        let job = state.submit(&mut cache).unwrap();
        settle_full(&mut state, &mut cache, &job);

        assert!(state.previous_page(&mut cache).is_none());
        assert_eq!(state.snapshot(&cache).page, 1);
    }

    #[test]
    fn test_retry_reissues_same_key_without_page_reset() {
        let mut cache = RequestCache::new();
        let mut state = SearchTabState::new();

        state.input = "raft".to_string();
        let job = state.submit(&mut cache).unwrap();
        settle_full(&mut state, &mut cache, &job);
        let job = state.next_page(&mut cache).unwrap();
        let failed_key = job.key.clone();
        cache.complete(&job.key, Err("timeout".to_string()));
        state.on_settled(&job.key, job.generation, &cache);
        assert_eq!(state.phase(), Phase::Errored);

        let retry = state.retry(&mut cache).unwrap();
        assert_eq!(retry.key, failed_key);
        assert_eq!(retry.request.page, 2);

        settle_full(&mut state, &mut cache, &retry);
        assert_eq!(state.phase(), Phase::Loaded);
        assert!(state.snapshot(&cache).error.is_none());
    }
}
