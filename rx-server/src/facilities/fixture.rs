//! Facility lookup backed by a local JSON file.
//!
//! Useful for development without hitting the public Overpass servers.

use std::path::Path;
use std::sync::Arc;

use crate::domain::{Coordinate, Facility};

use super::error::FacilityError;

/// Facilities loaded once from a JSON array on disk.
#[derive(Debug, Clone)]
pub struct StaticFacilities {
    facilities: Arc<Vec<Facility>>,
}

impl StaticFacilities {
    /// Load facilities from a JSON file holding an array of
    /// `{id, name, address, lat, lon}` objects.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FacilityError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| FacilityError::Fixture {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        let facilities: Vec<Facility> =
            serde_json::from_str(&json).map_err(|e| FacilityError::Fixture {
                message: format!("failed to parse {}: {}", path.display(), e),
            })?;
        Ok(Self::from_facilities(facilities))
    }

    pub fn from_facilities(facilities: Vec<Facility>) -> Self {
        Self {
            facilities: Arc::new(facilities),
        }
    }

    /// Facilities within `radius_m` of `center`, in file order.
    pub fn within(&self, center: Coordinate, radius_m: u32) -> Vec<Facility> {
        let radius_km = f64::from(radius_m) / 1000.0;
        self.facilities
            .iter()
            .filter(|f| f.distance_from(center.lat(), center.lon()) <= radius_km)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}
