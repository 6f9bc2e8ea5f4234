// GitHub API HTTP client.
// Handles authentication headers, rate limit capture, and response checking.

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{Result, SpyglassError};

use super::types::RateLimit;

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client.
///
/// Cheap to clone; each fetch task gets its own handle while the
/// underlying connection pool is shared.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
}

impl GitHubClient {
    /// Create a new GitHub client. A token raises the search rate limit
    /// but is not required.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| SpyglassError::Other(e.to_string()))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("spyglass-tui"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(SpyglassError::Api)?;

        Ok(Self { client })
    }

    /// Create a client using the GITHUB_TOKEN environment variable if set.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GITHUB_TOKEN").ok();
        Self::new(token.as_deref())
    }

    /// Make a GET request with query parameters.
    /// Returns the checked response along with the rate limit headers.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<(Response, RateLimit)> {
        let url = format!("{}{}", GITHUB_API_BASE, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(SpyglassError::Api)?;

        let rate = RateLimit::from_headers(response.headers());
        let response = check_response(response, &rate).await?;
        Ok((response, rate))
    }
}

/// Check response status and convert errors.
async fn check_response(response: Response, rate: &RateLimit) -> Result<Response> {
    match response.status() {
        StatusCode::OK => Ok(response),
        StatusCode::UNAUTHORIZED => Err(SpyglassError::Unauthorized),
        StatusCode::UNPROCESSABLE_ENTITY => Err(SpyglassError::InvalidQuery(
            response.text().await.unwrap_or_default(),
        )),
        StatusCode::FORBIDDEN => {
            // Search quota exhaustion also arrives as 403
            if rate.remaining == 0 {
                Err(SpyglassError::RateLimited {
                    reset_at: rate.reset_display(),
                })
            } else {
                Err(SpyglassError::Other(format!(
                    "Forbidden: {}",
                    response.text().await.unwrap_or_default()
                )))
            }
        }
        status => Err(SpyglassError::Other(format!(
            "HTTP {}: {}",
            status,
            response.text().await.unwrap_or_default()
        ))),
    }
}
