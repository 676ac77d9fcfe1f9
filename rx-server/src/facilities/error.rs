//! Facility lookup error types.

/// Errors that can occur when looking up nearby facilities.
#[derive(Debug, thiserror::Error)]
pub enum FacilityError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Fixture file missing or malformed
    #[error("fixture error: {message}")]
    Fixture { message: String },
}
