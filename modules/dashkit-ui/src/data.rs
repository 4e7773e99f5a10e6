//! Errors raised by data accessors.
//!
//! Accessors are async functions owned by the application; the engine never
//! handles these errors. Page code decides between an error state with
//! retry, a silent degrade, or a redirect.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataFetchError {
    /// Record does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Backend refused or failed the request
    #[error("data source unavailable: {0}")]
    Unavailable(String),

    /// Request exceeded the accessor's deadline
    #[error("request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
}

impl DataFetchError {
    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, DataFetchError::NotFound { .. })
    }
}

/// Result type alias for data accessors.
pub type FetchResult<T> = std::result::Result<T, DataFetchError>;
