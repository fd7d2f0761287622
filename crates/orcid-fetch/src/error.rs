//! Error types for orcid-fetch

use thiserror::Error;

/// Result type alias for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors from the ORCID API, doi.org, the record cache and the mapping database
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a status other than 200
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// Server answered 429
    #[error("Rate limited by server")]
    RateLimited,

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid ORCID iD: {0}")]
    InvalidOrcid(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Every retry attempt hit a retryable failure
    #[error("Gave up on {url} after {attempts} attempts")]
    RetriesExhausted { attempts: u32, url: String },
}

impl FetchError {
    /// Whether another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::RateLimited | FetchError::Http(_))
    }
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
