//! Upload validation and the OCR → structuring → prediction pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::generic::GenericNameTable;
use super::{TextExtractor, TextOrganizer};

/// Extensions accepted by the upload endpoint.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "pdf", "txt"];

/// Extraction produced nothing.
pub const NO_TEXT_EXTRACTED: &str = "No text extracted";

/// Prefix of extraction failures.
pub const OCR_ERROR_PREFIX: &str = "OCR Error";

/// Structuring was skipped because there was nothing usable to structure.
pub const UNABLE_TO_PROCESS: &str = "Unable to process prescription text";

/// Prefix of structuring failures.
pub const AI_ERROR_PREFIX: &str = "AI Processing Error";

/// Why an upload was rejected before analysis.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("No file part")]
    MissingFile,

    #[error("No selected file")]
    EmptyFilename,

    #[error("File type not allowed. Allowed types: {}", ALLOWED_EXTENSIONS.join(", "))]
    DisallowedType,
}

/// An accepted upload.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Sanitised file name, safe to join onto the upload directory.
    pub filename: String,
    pub extension: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Validate the client-supplied name and wrap the payload.
    pub fn new(original_name: &str, bytes: Vec<u8>) -> Result<Self, UploadError> {
        if original_name.trim().is_empty() {
            return Err(UploadError::EmptyFilename);
        }

        let filename = sanitize_filename(original_name);
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .ok_or(UploadError::DisallowedType)?;

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(UploadError::DisallowedType);
        }

        Ok(Self {
            filename,
            extension,
            bytes,
        })
    }

    pub fn mime_type(&self) -> &'static str {
        match self.extension.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "pdf" => "application/pdf",
            "txt" => "text/plain",
            _ => "application/octet-stream",
        }
    }
}

/// Reduce a client file name to `[A-Za-z0-9._-]`, without directories or
/// leading dots.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Result document of one analysis; also written to the output directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub filename: String,
    pub extracted_text: String,
    pub structured_text: String,
    pub generic_predictions: BTreeMap<String, String>,
}

/// Extraction output that should not be sent on for structuring.
fn is_unusable(text: &str) -> bool {
    text.trim().is_empty() || text.starts_with(OCR_ERROR_PREFIX) || text == NO_TEXT_EXTRACTED
}

/// Run extraction, structuring and generic-name prediction on an upload.
///
/// Collaborator failures are folded into the report text rather than
/// returned, so the client always gets a document back.
pub async fn analyze<E, O>(
    extractor: &E,
    organizer: &O,
    names: &GenericNameTable,
    upload: &Upload,
) -> AnalysisReport
where
    E: TextExtractor,
    O: TextOrganizer,
{
    let extracted = if upload.extension == "txt" {
        Ok(String::from_utf8_lossy(&upload.bytes).trim().to_string())
    } else {
        extractor
            .extract_text(&upload.bytes, upload.mime_type())
            .await
            .map(|t| t.trim().to_string())
    };

    let extracted_text = match extracted {
        Ok(text) if text.is_empty() => NO_TEXT_EXTRACTED.to_string(),
        Ok(text) => text,
        Err(e) => {
            warn!(file = %upload.filename, error = %e, "Text extraction failed");
            format!("{OCR_ERROR_PREFIX}: {e}")
        }
    };

    let (structured_text, generic_predictions) = if is_unusable(&extracted_text) {
        (UNABLE_TO_PROCESS.to_string(), BTreeMap::new())
    } else {
        match organizer.organize(&extracted_text).await {
            Ok(structured) => {
                let predictions = names.predict_all(&structured);
                (structured, predictions)
            }
            Err(e) => {
                warn!(file = %upload.filename, error = %e, "Structuring failed");
                (format!("{AI_ERROR_PREFIX}: {e}"), BTreeMap::new())
            }
        }
    };

    info!(
        file = %upload.filename,
        chars = extracted_text.len(),
        predictions = generic_predictions.len(),
        "Prescription analysed"
    );

    AnalysisReport {
        filename: upload.filename.clone(),
        extracted_text,
        structured_text,
        generic_predictions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedExtractor(Result<&'static str, ()>);

    impl TextExtractor for FixedExtractor {
        async fn extract_text(&self, _bytes: &[u8], _mime: &str) -> Result<String, AnalysisError> {
            self.0
                .map(str::to_string)
                .map_err(|_| AnalysisError::EmptyResponse)
        }
    }

    /// Echoes its input and counts calls.
    #[derive(Default)]
    struct EchoOrganizer {
        calls: AtomicUsize,
    }

    impl TextOrganizer for EchoOrganizer {
        async fn organize(&self, text: &str) -> Result<String, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("Medications\n{text}\n- take with food"))
        }
    }

    struct FailingOrganizer;

    impl TextOrganizer for FailingOrganizer {
        async fn organize(&self, _text: &str) -> Result<String, AnalysisError> {
            Err(AnalysisError::NotConfigured("GEMINI_API_KEY is not set"))
        }
    }

    fn names() -> GenericNameTable {
        let mut m = HashMap::new();
        m.insert("Crocin".to_string(), "Paracetamol".to_string());
        GenericNameTable::new(m)
    }

    fn image() -> Upload {
        Upload::new("scan.png", vec![1, 2, 3]).unwrap()
    }

    #[test]
    fn validates_extension() {
        assert!(Upload::new("rx.JPG", vec![]).is_ok());
        assert!(Upload::new("notes.txt", vec![]).is_ok());
        assert_eq!(
            Upload::new("evil.exe", vec![]).unwrap_err(),
            UploadError::DisallowedType
        );
        assert_eq!(
            Upload::new("README", vec![]).unwrap_err(),
            UploadError::DisallowedType
        );
        assert_eq!(Upload::new("  ", vec![]).unwrap_err(), UploadError::EmptyFilename);
    }

    #[test]
    fn mime_types() {
        assert_eq!(Upload::new("a.jpeg", vec![]).unwrap().mime_type(), "image/jpeg");
        assert_eq!(Upload::new("a.pdf", vec![]).unwrap().mime_type(), "application/pdf");
    }

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_filename("../../etc/passwd.png"), "passwd.png");
        assert_eq!(sanitize_filename("C:\\scans\\my rx.jpg"), "my_rx.jpg");
        assert_eq!(sanitize_filename("...hidden.png"), "hidden.png");
        assert_eq!(sanitize_filename("résumé.pdf"), "rsum.pdf");
        assert_eq!(sanitize_filename("///"), "upload");
    }

    #[tokio::test]
    async fn full_pipeline() {
        let organizer = EchoOrganizer::default();
        let report = analyze(&FixedExtractor(Ok("Crocin")), &organizer, &names(), &image()).await;

        assert_eq!(report.filename, "scan.png");
        assert_eq!(report.extracted_text, "Crocin");
        assert!(report.structured_text.starts_with("Medications"));
        assert_eq!(report.generic_predictions["Crocin"], "Paracetamol");
        assert_eq!(report.generic_predictions["Medications"], "Unknown Medicine");
        assert!(!report.generic_predictions.contains_key("- take with food"));
    }

    #[tokio::test]
    async fn text_files_skip_the_extractor() {
        let organizer = EchoOrganizer::default();
        let upload = Upload::new("rx.txt", b"  Crocin 500mg \n".to_vec()).unwrap();
        let report = analyze(&FixedExtractor(Err(())), &organizer, &names(), &upload).await;
        assert_eq!(report.extracted_text, "Crocin 500mg");
        assert_eq!(organizer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn extraction_failure_skips_structuring() {
        let organizer = EchoOrganizer::default();
        let report = analyze(&FixedExtractor(Err(())), &organizer, &names(), &image()).await;

        assert_eq!(report.extracted_text, "OCR Error: empty response from model");
        assert_eq!(report.structured_text, UNABLE_TO_PROCESS);
        assert!(report.generic_predictions.is_empty());
        assert_eq!(organizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blank_extraction_is_reported() {
        let organizer = EchoOrganizer::default();
        let report = analyze(&FixedExtractor(Ok("   ")), &organizer, &names(), &image()).await;
        assert_eq!(report.extracted_text, NO_TEXT_EXTRACTED);
        assert_eq!(report.structured_text, UNABLE_TO_PROCESS);
        assert_eq!(organizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn structuring_failure_is_reported() {
        let report =
            analyze(&FixedExtractor(Ok("Crocin")), &FailingOrganizer, &names(), &image()).await;
        assert_eq!(
            report.structured_text,
            "AI Processing Error: not configured: GEMINI_API_KEY is not set"
        );
        assert!(report.generic_predictions.is_empty());
    }
}
