// Search request construction.
// Pure functions turning filter selections into fully-qualified search requests.

use std::fmt;

use chrono::NaiveDate;

/// Fixed page size for all search requests.
pub const PAGE_SIZE: u32 = 25;

/// Results are always returned in descending order.
const ORDER: &str = "desc";

/// Sort key accepted by the repository search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Stars,
    Forks,
    Updated,
    HelpWantedIssues,
}

impl SortKey {
    /// Wire value for the `sort` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Stars => "stars",
            SortKey::Forks => "forks",
            SortKey::Updated => "updated",
            SortKey::HelpWantedIssues => "help-wanted-issues",
        }
    }

    /// Display label for the sort selector.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Stars => "Stars",
            SortKey::Forks => "Forks",
            SortKey::Updated => "Recently Updated",
            SortKey::HelpWantedIssues => "Help Wanted",
        }
    }

    /// Cycle to the next sort key.
    pub fn next(&self) -> Self {
        match self {
            SortKey::Stars => SortKey::Forks,
            SortKey::Forks => SortKey::Updated,
            SortKey::Updated => SortKey::HelpWantedIssues,
            SortKey::HelpWantedIssues => SortKey::Stars,
        }
    }
}

/// Canonical identity of a search request.
/// Two filter sets that serialize identically are the same request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey(String);

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A fully-qualified repository search request.
///
/// `order` and `per_page` are fixed for every request and folded in at
/// serialization time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub q: String,
    pub sort: SortKey,
    pub page: u32,
}

impl SearchRequest {
    /// Canonical serialization used as the cache/dedup identity.
    /// Field order is fixed: q, sort, order, per_page, page.
    pub fn key(&self) -> RequestKey {
        RequestKey(format!(
            "q={}&sort={}&order={}&per_page={}&page={}",
            self.q,
            self.sort.as_str(),
            ORDER,
            PAGE_SIZE,
            self.page
        ))
    }

    /// Query parameters for the HTTP layer.
    pub fn params(&self) -> [(&'static str, String); 5] {
        [
            ("q", self.q.clone()),
            ("sort", self.sort.as_str().to_string()),
            ("order", ORDER.to_string()),
            ("per_page", PAGE_SIZE.to_string()),
            ("page", self.page.to_string()),
        ]
    }
}

/// Build a search-mode request from submitted free text.
///
/// Returns `None` when the trimmed text is empty: the search endpoint
/// rejects an empty `q`, so no request may be issued.
pub fn search_request(
    text: &str,
    language: &str,
    sort: SortKey,
    page: u32,
) -> Option<SearchRequest> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(SearchRequest {
        q: with_language(text, language),
        sort,
        page,
    })
}

/// Build a trending-mode request from a resolved date lower bound.
/// Trending always ranks by stars.
pub fn trending_request(since: NaiveDate, language: &str, page: u32) -> SearchRequest {
    let predicate = format!("created:>{}", since.format("%Y-%m-%d"));
    SearchRequest {
        q: with_language(&predicate, language),
        sort: SortKey::Stars,
        page,
    }
}

/// Append a `language:` qualifier when a language filter is set.
fn with_language(base: &str, language: &str) -> String {
    if language.is_empty() {
        base.to_string()
    } else {
        format!("{} language:{}", base, language)
    }
}
