//! Directory feed error types.

/// Errors that can occur when interacting with the discovery feed.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed returned an error status
    #[error("feed error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Cache operation failed
    #[error("cache error: {message}")]
    Cache { message: String },
}
