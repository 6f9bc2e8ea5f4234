// Error types for spyglass application.
// Handles GitHub API errors, payload errors, and general application errors.

#![allow(dead_code)]

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpyglassError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SpyglassError>;
