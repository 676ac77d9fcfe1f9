//! Domain types for the prescription backend.
//!
//! Types that cross the HTTP boundary are validated at construction, so
//! the routing core can trust the values it receives.

mod coordinate;
mod facility;

pub use coordinate::{Coordinate, EARTH_RADIUS_KM, InvalidCoordinate, distance_km};
pub use facility::Facility;
