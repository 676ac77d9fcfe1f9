//! Gemini `generateContent` client used for OCR and text structuring.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::AnalysisError;
use super::{TextExtractor, TextOrganizer};

/// Default base URL for the Generative Language API.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model.
const DEFAULT_MODEL: &str = "gemini-1.5-pro";

const EXTRACT_PROMPT: &str = "Transcribe all text in this prescription exactly as written. \
     Output only the transcribed text.";

const ORGANIZE_PROMPT: &str = "Organize the following prescription text into a structured format with clearly labeled sections:

- **Patient Information** (Name, Age, Gender if available)
- **Doctor Information** (Name, Hospital/Clinic, License Number if available)
- **Medications** (Medicine Name, Dosage, Frequency)
- **Special Instructions** (Dietary advice, warnings, or extra instructions)
- **Medication Details** (For each medication, provide Description, Caution, and Side Effects)

Prescription Text: ";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    Inline { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Model name, e.g. `gemini-1.5-pro`
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Client for Gemini content generation.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    async fn generate(&self, parts: Vec<Part<'_>>) -> Result<String, AnalysisError> {
        if self.config.api_key.is_empty() {
            return Err(AnalysisError::NotConfigured("GEMINI_API_KEY is not set"));
        }

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let request = GenerateRequest {
            contents: vec![Content { parts }],
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let text = first_text(&body)?;
        debug!(model = %self.config.model, chars = text.len(), "Gemini response");
        Ok(text)
    }
}

/// Text of the first part of the first candidate.
fn first_text(body: &str) -> Result<String, AnalysisError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| AnalysisError::Json {
            message: e.to_string(),
        })?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(AnalysisError::EmptyResponse)
}

impl TextExtractor for GeminiClient {
    async fn extract_text(&self, bytes: &[u8], mime_type: &str) -> Result<String, AnalysisError> {
        let parts = vec![
            Part::Text {
                text: EXTRACT_PROMPT,
            },
            Part::Inline {
                inline_data: InlineData {
                    mime_type,
                    data: BASE64.encode(bytes),
                },
            },
        ];
        self.generate(parts).await
    }
}

impl TextOrganizer for GeminiClient {
    async fn organize(&self, text: &str) -> Result<String, AnalysisError> {
        let prompt = format!("{ORGANIZE_PROMPT}{text}");
        self.generate(vec![Part::Text { text: &prompt }]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = GeminiConfig::new("k");
        assert_eq!(config.api_key, "k");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_builder() {
        let config = GeminiConfig::new("k")
            .with_base_url("http://localhost:8080")
            .with_model("gemini-pro");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.model, "gemini-pro");
    }

    #[test]
    fn request_body_shape() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: "hi" },
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type: "image/png",
                            data: BASE64.encode(b"abc"),
                        },
                    },
                ],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(
            json["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/png"
        );
        assert_eq!(json["contents"][0]["parts"][1]["inline_data"]["data"], "YWJj");
    }

    #[test]
    fn extracts_first_candidate_text() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "  Amoxicillin 500mg \n"}]}}]}"#;
        assert_eq!(first_text(body).unwrap(), "Amoxicillin 500mg");
    }

    #[test]
    fn no_candidates_is_empty_response() {
        assert!(matches!(
            first_text(r#"{"candidates": []}"#),
            Err(AnalysisError::EmptyResponse)
        ));
        assert!(matches!(
            first_text(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#),
            Err(AnalysisError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let client = GeminiClient::new(GeminiConfig::new("")).unwrap();
        let err = client.organize("text").await.unwrap_err();
        assert!(matches!(err, AnalysisError::NotConfigured(_)));
    }
}
