// Controller core shared by the search and trending tabs.
// Tracks the current page, the in-flight request, and assembles snapshots.

use chrono::{DateTime, Utc};

use crate::cache::{RequestCache, ResultPage};
use crate::github::Repository;
use crate::query::{RequestKey, SearchRequest};

/// Lifecycle phase of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// A network operation the app must spawn.
#[derive(Debug, Clone)]
pub struct FetchJob {
    pub request: SearchRequest,
    pub key: RequestKey,
    pub generation: u64,
}

/// Read-only view of a controller for the presentation surface.
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub items: &'a [Repository],
    pub total_count: u64,
    pub page: u32,
    pub is_loading: bool,
    pub error: Option<&'a str>,
    pub has_next: bool,
    pub has_previous: bool,
    pub fetched_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct InFlight {
    key: RequestKey,
    generation: u64,
}

/// Per-controller engine state.
///
/// Each issued request is stamped with a monotonically increasing
/// generation counter; a completion is applied only when it is still
/// relevant at arrival time, so a stale response for a superseded request
/// can never overwrite newer state.
#[derive(Debug)]
pub struct QueryState {
    page: u32,
    generation: u64,
    in_flight: Option<InFlight>,
    last_page: Option<ResultPage>,
    error: Option<String>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            page: 1,
            generation: 0,
            in_flight: None,
            last_page: None,
            error: None,
        }
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Reset to page 1. Called before issuing whenever any filter other
    /// than the page number changes.
    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    pub fn advance_page(&mut self) {
        self.page += 1;
    }

    /// Decrementing below 1 is clamped.
    pub fn retreat_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Whether the next page may be requested: the most recent page was
    /// full and the controller is not showing an error.
    pub fn can_advance(&self) -> bool {
        self.error.is_none() && self.last_page.as_ref().is_some_and(ResultPage::is_full)
    }

    pub fn can_retreat(&self) -> bool {
        self.page > 1
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight.is_some() {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Errored
        } else if self.last_page.is_some() {
            Phase::Loaded
        } else {
            Phase::Idle
        }
    }

    /// Point the controller at `request`, or at nothing when no request
    /// may be issued.
    ///
    /// Returns the fetch job to spawn, or `None` when the controller is
    /// already fetching this exact key, an identical fetch is pending in
    /// the cache (dedup), or the request is inactive.
    pub fn issue(
        &mut self,
        request: Option<SearchRequest>,
        cache: &mut RequestCache,
    ) -> Option<FetchJob> {
        let Some(request) = request else {
            self.in_flight = None;
            self.error = None;
            return None;
        };

        let key = request.key();
        if self
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.key == key)
        {
            return None;
        }

        self.generation += 1;
        self.in_flight = Some(InFlight {
            key: key.clone(),
            generation: self.generation,
        });

        if cache.begin(&key) {
            Some(FetchJob {
                request,
                key,
                generation: self.generation,
            })
        } else {
            None
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Apply a settled fetch.
    ///
    /// The completion is relevant when its key matches the in-flight key
    /// and either its generation equals the current counter or the cache
    /// slot for the key has settled (a deduplicated completion carries the
    /// counter of whichever request spawned the network call).
    ///
    /// Returns whether the controller state changed.
    pub fn on_settled(&mut self, key: &RequestKey, generation: u64, cache: &RequestCache) -> bool {
        let Some(in_flight) = &self.in_flight else {
            return false;
        };
        if in_flight.key != *key {
            return false;
        }
        if generation != self.generation && cache.is_pending(key) {
            return false;
        }
        let Some(entry) = cache.get(key) else {
            return false;
        };
        if entry.pending {
            return false;
        }

        self.in_flight = None;
        if let Some(page) = &entry.page {
            self.last_page = Some(page.clone());
            self.error = None;
        } else if let Some(message) = &entry.error {
            self.error = Some(message.clone());
        }
        true
    }

    /// Assemble the read-only view for the presentation surface.
    ///
    /// While a fetch is in flight the previously displayed page (or the
    /// cached page for the new key) stays visible instead of flashing an
    /// empty list.
    pub fn snapshot<'a>(&'a self, cache: &'a RequestCache) -> Snapshot<'a> {
        if let Some(in_flight) = &self.in_flight {
            let shown = cache.page(&in_flight.key).or(self.last_page.as_ref());
            return Snapshot {
                items: shown.map(|page| page.items.as_slice()).unwrap_or(&[]),
                total_count: shown.map(|page| page.total_count).unwrap_or(0),
                page: self.page,
                is_loading: true,
                error: None,
                has_next: shown.is_some_and(|page| page.is_full()),
                has_previous: self.page > 1,
                fetched_at: shown.map(|page| page.fetched_at),
            };
        }

        if let Some(message) = &self.error {
            return Snapshot {
                items: &[],
                total_count: 0,
                page: self.page,
                is_loading: false,
                error: Some(message),
                has_next: false,
                has_previous: self.page > 1,
                fetched_at: None,
            };
        }

        match &self.last_page {
            Some(page) => Snapshot {
                items: &page.items,
                total_count: page.total_count,
                page: self.page,
                is_loading: false,
                error: None,
                has_next: page.is_full(),
                has_previous: self.page > 1,
                fetched_at: Some(page.fetched_at),
            },
            None => Snapshot {
                items: &[],
                total_count: 0,
                page: self.page,
                is_loading: false,
                error: None,
                has_next: false,
                has_previous: self.page > 1,
                fetched_at: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{Owner, Repository};
    use crate::query::{PAGE_SIZE, SortKey, search_request};

    fn repo(id: u64) -> Repository {
        Repository {
            id,
            name: format!("repo-{}", id),
            full_name: format!("octocat/repo-{}", id),
            owner: Owner {
                id: 1,
                login: "octocat".to_string(),
                avatar_url: None,
            },
            description: None,
            language: Some("Rust".to_string()),
            stargazers_count: 10,
            forks_count: 2,
            open_issues_count: 0,
            html_url: format!("https://github.com/octocat/repo-{}", id),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn page_of(len: usize, total: u64) -> ResultPage {
        ResultPage::new((0..len as u64).map(repo).collect(), total)
    }

    fn request(text: &str) -> SearchRequest {
        search_request(text, "", SortKey::Stars, 1).unwrap()
    }

    #[test]
    fn test_inactive_request_is_idle() {
        let mut cache = RequestCache::new();
        let mut state = QueryState::new();

        assert!(state.issue(None, &mut cache).is_none());
        assert_eq!(state.phase(), Phase::Idle);

        let snapshot = state.snapshot(&cache);
        assert!(snapshot.items.is_empty());
        assert!(!snapshot.is_loading);
        assert!(snapshot.error.is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_issue_then_settle() {
        let mut cache = RequestCache::new();
        let mut state = QueryState::new();

        let job = state.issue(Some(request("alpha")), &mut cache).unwrap();
        assert_eq!(state.phase(), Phase::Loading);
        assert!(state.snapshot(&cache).is_loading);

        cache.complete(&job.key, Ok(page_of(3, 3)));
        assert!(state.on_settled(&job.key, job.generation, &cache));

        assert_eq!(state.phase(), Phase::Loaded);
        let snapshot = state.snapshot(&cache);
        assert_eq!(snapshot.items.len(), 3);
        assert_eq!(snapshot.total_count, 3);
        assert!(!snapshot.is_loading);
    }

    #[test]
    fn test_stale_response_for_superseded_key_is_discarded() {
        let mut cache = RequestCache::new();
        let mut state = QueryState::new();

        let job_a = state.issue(Some(request("alpha")), &mut cache).unwrap();
        let job_b = state.issue(Some(request("beta")), &mut cache).unwrap();

        // B responds first and wins
        cache.complete(&job_b.key, Ok(page_of(2, 2)));
        assert!(state.on_settled(&job_b.key, job_b.generation, &cache));

        // A's late response must not overwrite B
        cache.complete(&job_a.key, Ok(page_of(5, 5)));
        assert!(!state.on_settled(&job_a.key, job_a.generation, &cache));

        assert_eq!(state.snapshot(&cache).items.len(), 2);
    }

    #[test]
    fn test_old_key_response_while_new_key_loading_is_discarded() {
        let mut cache = RequestCache::new();
        let mut state = QueryState::new();

        let job_a = state.issue(Some(request("alpha")), &mut cache).unwrap();
        let _job_b = state.issue(Some(request("beta")), &mut cache).unwrap();

        cache.complete(&job_a.key, Ok(page_of(5, 5)));
        assert!(!state.on_settled(&job_a.key, job_a.generation, &cache));
        assert_eq!(state.phase(), Phase::Loading);
    }

    #[test]
    fn test_reissuing_in_flight_key_is_deduplicated() {
        let mut cache = RequestCache::new();
        let mut state = QueryState::new();

        assert!(state.issue(Some(request("alpha")), &mut cache).is_some());
        assert!(state.issue(Some(request("alpha")), &mut cache).is_none());
    }

    #[test]
    fn test_deduplicated_completion_applies_by_key() {
        let mut cache = RequestCache::new();
        let mut first = QueryState::new();
        let mut second = QueryState::new();

        // Second controller has a higher counter than the job it dedups onto
        let stale = second.issue(Some(request("beta")), &mut cache).unwrap();
        cache.complete(&stale.key, Ok(page_of(1, 1)));
        second.on_settled(&stale.key, stale.generation, &cache);

        let job = first.issue(Some(request("alpha")), &mut cache).unwrap();
        // Second controller lands on the same key; no new fetch is spawned
        assert!(second.issue(Some(request("alpha")), &mut cache).is_none());

        cache.complete(&job.key, Ok(page_of(4, 4)));
        assert!(first.on_settled(&job.key, job.generation, &cache));
        assert!(second.on_settled(&job.key, job.generation, &cache));
        assert_eq!(second.snapshot(&cache).items.len(), 4);
    }

    #[test]
    fn test_previous_page_shown_while_loading_new_key() {
        let mut cache = RequestCache::new();
        let mut state = QueryState::new();

        let job = state.issue(Some(request("alpha")), &mut cache).unwrap();
        cache.complete(&job.key, Ok(page_of(3, 3)));
        state.on_settled(&job.key, job.generation, &cache);

        // Key change: the old page stays visible while the new fetch runs
        state.issue(Some(request("beta")), &mut cache).unwrap();
        let snapshot = state.snapshot(&cache);
        assert!(snapshot.is_loading);
        assert_eq!(snapshot.items.len(), 3);
    }

    #[test]
    fn test_no_cached_data_loads_empty() {
        let mut cache = RequestCache::new();
        let mut state = QueryState::new();

        state.issue(Some(request("alpha")), &mut cache).unwrap();
        let snapshot = state.snapshot(&cache);
        assert!(snapshot.is_loading);
        assert!(snapshot.items.is_empty());
    }

    #[test]
    fn test_error_then_retry_clears_error() {
        let mut cache = RequestCache::new();
        let mut state = QueryState::new();

        let job = state.issue(Some(request("alpha")), &mut cache).unwrap();
        cache.complete(&job.key, Err("connection reset".to_string()));
        state.on_settled(&job.key, job.generation, &cache);

        assert_eq!(state.phase(), Phase::Errored);
        assert_eq!(
            state.snapshot(&cache).error,
            Some("connection reset")
        );

        // Retry re-issues the same key
        let retry = state.issue(Some(request("alpha")), &mut cache).unwrap();
        cache.complete(&retry.key, Ok(page_of(2, 2)));
        state.on_settled(&retry.key, retry.generation, &cache);

        assert_eq!(state.phase(), Phase::Loaded);
        let snapshot = state.snapshot(&cache);
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.page, 1);
    }

    #[test]
    fn test_full_page_enables_next() {
        let mut cache = RequestCache::new();
        let mut state = QueryState::new();

        let job = state.issue(Some(request("alpha")), &mut cache).unwrap();
        cache.complete(&job.key, Ok(page_of(PAGE_SIZE as usize, 1000)));
        state.on_settled(&job.key, job.generation, &cache);

        assert!(state.can_advance());
        assert!(state.snapshot(&cache).has_next);
    }

    #[test]
    fn test_short_page_disables_next_despite_total_count() {
        let mut cache = RequestCache::new();
        let mut state = QueryState::new();

        let job = state.issue(Some(request("alpha")), &mut cache).unwrap();
        cache.complete(&job.key, Ok(page_of(10, 1000)));
        state.on_settled(&job.key, job.generation, &cache);

        assert!(!state.can_advance());
        assert!(!state.snapshot(&cache).has_next);
    }

    #[test]
    fn test_page_clamps_at_one() {
        let mut state = QueryState::new();
        assert_eq!(state.page(), 1);
        assert!(!state.can_retreat());

        state.retreat_page();
        assert_eq!(state.page(), 1);

        state.advance_page();
        state.advance_page();
        assert_eq!(state.page(), 3);
        assert!(state.can_retreat());

        state.retreat_page();
        assert_eq!(state.page(), 2);
    }
}
