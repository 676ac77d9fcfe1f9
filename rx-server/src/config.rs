//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var} is not a valid boolean: {value}")]
    InvalidBool { var: &'static str, value: String },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub upload_dir: PathBuf,
    /// Empty when unset; analysis then reports the service as unconfigured.
    pub gemini_api_key: String,
    pub overpass_url: Option<String>,
    pub rxnorm_url: Option<String>,
    /// Serve facilities from this JSON file instead of Overpass.
    pub facility_fixture: Option<PathBuf>,
    pub collapse_symmetric_links: bool,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("RX_BIND_ADDR") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidAddr {
                var: "RX_BIND_ADDR",
                value,
            })?,
            None => SocketAddr::from(([127, 0, 0, 1], 5000)),
        };

        let collapse_symmetric_links = match get("RX_COLLAPSE_SYMMETRIC_LINKS") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidBool {
                var: "RX_COLLAPSE_SYMMETRIC_LINKS",
                value,
            })?,
            None => false,
        };

        Ok(Self {
            bind_addr,
            data_dir: get("RX_DATA_DIR").unwrap_or_else(|| "data".into()).into(),
            upload_dir: get("RX_UPLOAD_DIR")
                .unwrap_or_else(|| "uploads".into())
                .into(),
            gemini_api_key: get("GEMINI_API_KEY").unwrap_or_default(),
            overpass_url: get("OVERPASS_URL"),
            rxnorm_url: get("RXNORM_URL"),
            facility_fixture: get("RX_FACILITY_FIXTURE").map(PathBuf::from),
            collapse_symmetric_links,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
