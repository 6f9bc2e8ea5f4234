// Trending tab state management.
// Recently created repositories ranked by stars, filtered by time window.

use chrono::Utc;

use crate::cache::RequestCache;
use crate::query::{RequestKey, SearchRequest, TimeRange, date_since, trending_request};

use super::ListCursor;
use super::controller::{FetchJob, Phase, QueryState, Snapshot};

/// Complete state for the Trending tab.
/// Filters apply immediately; there is no submit step.
#[derive(Debug, Default)]
pub struct TrendingTabState {
    range: TimeRange,
    language: String,
    core: QueryState,
    /// Keyboard selection over the visible results.
    pub cursor: ListCursor,
}

impl TrendingTabState {
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            ..Self::default()
        }
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn phase(&self) -> Phase {
        self.core.phase()
    }

    fn request(&self) -> SearchRequest {
        let since = date_since(self.range, Utc::now().date_naive());
        trending_request(since, &self.language, self.core.page())
    }

    /// Issue the current request. Used for the initial load and after a
    /// failure; parameter changes go through the setters.
    pub fn refresh(&mut self, cache: &mut RequestCache) -> Option<FetchJob> {
        let request = self.request();
        self.core.issue(Some(request), cache)
    }

    pub fn set_range(&mut self, range: TimeRange, cache: &mut RequestCache) -> Option<FetchJob> {
        if self.range == range {
            return None;
        }
        self.range = range;
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
