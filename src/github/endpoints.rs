// GitHub API endpoint functions.
// Provides the typed repository search call.

use crate::error::Result;
use crate::query::SearchRequest;

use super::client::GitHubClient;
use super::types::{RateLimit, SearchResults};

impl GitHubClient {
    /// Search repositories with the given request.
    ///
    /// The body is decoded by hand so a malformed payload surfaces as a
    /// JSON error rather than a transport error.
    pub async fn search_repositories(
        &self,
        request: &SearchRequest,
    ) -> Result<(SearchResults, RateLimit)> {
        let (response, rate) = self
            .get_with_params("/search/repositories", &request.params())
            .await?;
        let body = response.text().await?;
        let results: SearchResults = serde_json::from_str(&body)?;
        Ok((results, rate))
    }
}
