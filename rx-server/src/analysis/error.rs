//! Prescription analysis error types.

/// Errors from the generative text service.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The service answered without any text
    #[error("empty response from model")]
    EmptyResponse,

    /// No API key configured
    #[error("not configured: {0}")]
    NotConfigured(&'static str),
}
