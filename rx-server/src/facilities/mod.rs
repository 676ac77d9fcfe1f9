//! Nearby-facility lookup.
//!
//! The routing core only needs `{id, name, address, lat, lon}` records.
//! They come either from the Overpass API or from a local fixture file.

mod client;
mod error;
mod fixture;

use std::future::Future;

use crate::domain::{Coordinate, Facility};

pub use client::{ADDRESS_UNAVAILABLE, OverpassClient, OverpassConfig, UNNAMED_FACILITY};
pub use error::FacilityError;
pub use fixture::StaticFacilities;

/// Source of facilities around a point.
pub trait FacilityProvider {
    /// Facilities within `radius_m` metres of `center`.
    fn nearby(
        &self,
        center: Coordinate,
        radius_m: u32,
    ) -> impl Future<Output = Result<Vec<Facility>, FacilityError>> + Send;
}

/// The facility source selected at startup.
#[derive(Debug, Clone)]
pub enum FacilitySource {
    Overpass(OverpassClient),
    Static(StaticFacilities),
}

impl FacilityProvider for FacilitySource {
    async fn nearby(
        &self,
        center: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<Facility>, FacilityError> {
        match self {
            FacilitySource::Overpass(client) => client.hospitals_near(center, radius_m).await,
            FacilitySource::Static(fixture) => Ok(fixture.within(center, radius_m)),
        }
    }
}
