//! Healthcare facilities returned by the places lookup.

use serde::{Deserialize, Serialize};

use super::coordinate::distance_km;

/// A candidate facility near the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    /// Stable identifier from the lookup source (e.g. `node/123`).
    pub id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
}

impl Facility {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            lat,
            lon,
        }
    }

    /// Straight-line distance from a point, in kilometres.
    pub fn distance_from(&self, lat: f64, lon: f64) -> f64 {
        distance_km(lat, lon, self.lat, self.lon)
    }
}
