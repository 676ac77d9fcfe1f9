//! Prescription analysis: text extraction, structuring and generic-name
//! prediction.
//!
//! Extraction and structuring are delegated to a generative model behind
//! the [`TextExtractor`] and [`TextOrganizer`] traits.

mod error;
mod gemini;
mod generic;
mod upload;

use std::future::Future;

pub use error::AnalysisError;
pub use gemini::{GeminiClient, GeminiConfig};
pub use generic::{GenericNameTable, UNKNOWN_MEDICINE, candidate_names};
pub use upload::{
    ALLOWED_EXTENSIONS, AnalysisReport, NO_TEXT_EXTRACTED, UNABLE_TO_PROCESS, Upload, UploadError,
    analyze, sanitize_filename,
};

/// Reads the text out of an uploaded document.
pub trait TextExtractor {
    fn extract_text(
        &self,
        bytes: &[u8],
        mime_type: &str,
    ) -> impl Future<Output = Result<String, AnalysisError>> + Send;
}

/// Rewrites raw prescription text into labelled sections.
pub trait TextOrganizer {
    fn organize(&self, text: &str) -> impl Future<Output = Result<String, AnalysisError>> + Send;
}
