//! RxNav (RxNorm) REST client.

use serde::Deserialize;
use tracing::debug;

use super::error::AlternativesError;

/// Default base URL for the public RxNav service.
const DEFAULT_BASE_URL: &str = "https://rxnav.nlm.nih.gov/REST";

/// Default cap on alternatives returned per drug.
const DEFAULT_MAX_RESULTS: usize = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DrugsResponse {
    drug_group: DrugGroup,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DrugGroup {
    #[serde(default)]
    concept_group: Vec<ConceptGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConceptGroup {
    #[serde(default)]
    concept_properties: Vec<ConceptProperties>,
}

#[derive(Debug, Deserialize)]
struct ConceptProperties {
    name: String,
}

/// Configuration for the RxNav client.
#[derive(Debug, Clone)]
pub struct RxNavConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum alternatives returned per drug
    pub max_results: usize,
}

impl RxNavConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Default for RxNavConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for RxNav drug lookups.
#[derive(Debug, Clone)]
pub struct RxNavClient {
    http: reqwest::Client,
    base_url: String,
    max_results: usize,
}

impl RxNavClient {
    pub fn new(config: RxNavConfig) -> Result<Self, AlternativesError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            max_results: config.max_results,
        })
    }

    /// Products related to `name`, excluding `name` itself.
    pub async fn alternatives(&self, name: &str) -> Result<Vec<String>, AlternativesError> {
        let url = format!("{}/drugs.json", self.base_url);

        let response = self.http.get(&url).query(&[("name", name)]).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AlternativesError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let names = parse_alternatives(&body, name, self.max_results)?;
        debug!(drug = name, found = names.len(), "RxNav lookup complete");
        Ok(names)
    }
}

/// Distinct concept names in response order, minus the queried drug.
fn parse_alternatives(
    body: &str,
    query: &str,
    max_results: usize,
) -> Result<Vec<String>, AlternativesError> {
    let response: DrugsResponse =
        serde_json::from_str(body).map_err(|e| AlternativesError::Json {
            message: e.to_string(),
        })?;

    let query = query.trim().to_lowercase();
    let mut names: Vec<String> = Vec::new();

    let concepts = response
        .drug_group
        .concept_group
        .into_iter()
        .flat_map(|g| g.concept_properties);

    for concept in concepts {
        let lower = concept.name.to_lowercase();
        if lower == query || names.iter().any(|n| n.to_lowercase() == lower) {
            continue;
        }
        names.push(concept.name);
        if names.len() == max_results {
            break;
        }
    }

    Ok(names)
}
