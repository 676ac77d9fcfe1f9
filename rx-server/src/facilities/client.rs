//! OpenStreetMap Overpass client for nearby hospitals.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::{Coordinate, Facility};

use super::error::FacilityError;

/// Default public Overpass endpoint.
const DEFAULT_BASE_URL: &str = "https://overpass-api.de/api/interpreter";

/// Default cap on facilities returned per lookup.
const DEFAULT_MAX_RESULTS: usize = 20;

/// Name used when OSM has no `name` tag.
pub const UNNAMED_FACILITY: &str = "Unnamed Hospital";

/// Address used when OSM has no `addr:*` tags.
pub const ADDRESS_UNAVAILABLE: &str = "Address unavailable";

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

/// Configuration for the Overpass client.
#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Interpreter URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum facilities returned, nearest first
    pub max_results: usize,
}

impl OverpassConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Set a custom base URL (for testing or a private mirror).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_max_results(mut self, n: usize) -> Self {
        self.max_results = n;
        self
    }
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the Overpass API.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    http: reqwest::Client,
    base_url: String,
    max_results: usize,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self, FacilityError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("rx-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            max_results: config.max_results,
        })
    }

    /// Hospitals within `radius_m` of `center`, nearest first.
    pub async fn hospitals_near(
        &self,
        center: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<Facility>, FacilityError> {
        let query = hospital_query(center, radius_m);
        debug!("Overpass query:\n{}", query);

        let response = self
            .http
            .post(&self.base_url)
            .header("Content-Type", "text/plain")
            .body(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FacilityError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let facilities = parse_response(&body, center, self.max_results)?;

        info!(
            center = %center,
            radius_m,
            found = facilities.len(),
            "Overpass lookup complete"
        );
        Ok(facilities)
    }
}

/// Overpass QL for hospital nodes and ways around a point.
fn hospital_query(center: Coordinate, radius_m: u32) -> String {
    let (lat, lon) = (center.lat(), center.lon());
    format!(
        r#"[out:json][timeout:25];
(
  node["amenity"="hospital"](around:{radius_m},{lat},{lon});
  way["amenity"="hospital"](around:{radius_m},{lat},{lon});
);
out center tags;"#
    )
}

/// Decode an Overpass response into facilities sorted by distance.
fn parse_response(
    body: &str,
    center: Coordinate,
    max_results: usize,
) -> Result<Vec<Facility>, FacilityError> {
    let response: OverpassResponse =
        serde_json::from_str(body).map_err(|e| FacilityError::Json {
            message: e.to_string(),
        })?;

    let mut facilities: Vec<Facility> = response
        .elements
        .into_iter()
        .filter_map(to_facility)
        .collect();

    facilities.sort_by(|a, b| {
        let da = a.distance_from(center.lat(), center.lon());
        let db = b.distance_from(center.lat(), center.lon());
        da.total_cmp(&db)
    });
    facilities.truncate(max_results);

    Ok(facilities)
}

fn to_facility(element: OverpassElement) -> Option<Facility> {
    // Ways only have a position through `out center`.
    let (lat, lon) = match (element.lat, element.lon, &element.center) {
        (Some(lat), Some(lon), _) => (lat, lon),
        (_, _, Some(c)) => (c.lat, c.lon),
        _ => return None,
    };

    let name = element
        .tags
        .get("name")
        .filter(|n| !n.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| UNNAMED_FACILITY.to_string());

    Some(Facility {
        id: format!("{}/{}", element.kind, element.id),
        name,
        address: format_address(&element.tags),
        lat,
        lon,
    })
}

/// "12 High St, Springfield" from `addr:*` tags.
fn format_address(tags: &HashMap<String, String>) -> String {
    let tag = |k: &str| tags.get(k).map(|s| s.trim()).filter(|s| !s.is_empty());

    if let Some(full) = tag("addr:full") {
        return full.to_string();
    }

    let street = match (tag("addr:housenumber"), tag("addr:street")) {
        (Some(n), Some(s)) => Some(format!("{n} {s}")),
        (None, Some(s)) => Some(s.to_string()),
        _ => None,
    };

    let parts: Vec<String> = [street, tag("addr:city").map(str::to_string)]
        .into_iter()
        .flatten()
        .collect();

    if parts.is_empty() {
        ADDRESS_UNAVAILABLE.to_string()
    } else {
        parts.join(", ")
    }
}
