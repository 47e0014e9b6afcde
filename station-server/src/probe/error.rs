//! Station probe error types.

/// Errors that can occur when contacting a station's own HTTP API.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// HTTP request failed (connection refused, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Station returned an error status
    #[error("station error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the station's response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
