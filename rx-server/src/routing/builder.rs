//! Builds the routing graph from the user's position and nearby facilities.

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{Coordinate, Facility};
use crate::graph::{EdgeAttributes, Metric, MultiGraph, VertexData};

use super::config::RoutingConfig;

/// Vertex id reserved for the user's position.
pub const USER_VERTEX_ID: &str = "user";

/// Display name of the user vertex.
pub const USER_VERTEX_NAME: &str = "Your Location";

/// Travel modes modelled between the user and each facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    Driving,
    Walking,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
        }
    }
}

/// Per-facility summary returned alongside the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HospitalSummary {
    pub id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    /// Straight-line distance in km, one decimal place. Serialised like the
    /// link distances, so `2.0` is written as `2`.
    pub distance: Metric,
    pub time_driving: u32,
    pub time_walking: u32,
}

/// Output of [`RouteBuilder::build`].
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub graph: MultiGraph,
    /// Facilities that made it into the graph, in input order.
    pub hospitals: Vec<HospitalSummary>,
}

/// Round to one decimal place.
pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Whole minutes for `km` at `mins_per_km`.
fn minutes(km: f64, mins_per_km: f64) -> u32 {
    (km * mins_per_km).round().max(0.0) as u32
}

/// Turns a facility list into a populated [`MultiGraph`].
///
/// Every facility gets a driving edge followed by a walking edge to the
/// user vertex. Walking distance is the straight-line distance inflated by
/// [`RoutingConfig::walking_distance_factor`], not a real footpath.
#[derive(Debug, Clone)]
pub struct RouteBuilder<'a> {
    config: &'a RoutingConfig,
}

impl<'a> RouteBuilder<'a> {
    pub fn new(config: &'a RoutingConfig) -> Self {
        Self { config }
    }

    /// Build the graph for `user` and `facilities`.
    ///
    /// Facilities whose id is already taken (including `"user"`) are
    /// skipped, so the graph always has one vertex per summary plus the user.
    pub fn build(&self, user: Coordinate, facilities: &[Facility]) -> RoutePlan {
        let mut graph = MultiGraph::new();
        graph.add_vertex(
            USER_VERTEX_ID,
            VertexData::new(USER_VERTEX_NAME, user.lat(), user.lon()),
        );

        let mut hospitals = Vec::with_capacity(facilities.len());

        for facility in facilities {
            let data = VertexData::new(&facility.name, facility.lat, facility.lon)
                .with_address(&facility.address);

            if !graph.add_vertex(&facility.id, data).is_inserted() {
                warn!(id = %facility.id, "Duplicate facility id, skipping");
                continue;
            }

            let distance = facility.distance_from(user.lat(), user.lon());
            let time_driving = minutes(distance, self.config.driving_mins_per_km);
            let time_walking = minutes(distance, self.config.walking_mins_per_km);

            graph.add_edge(
                USER_VERTEX_ID,
                &facility.id,
                EdgeAttributes::new()
                    .distance(round1(distance))
                    .time(f64::from(time_driving))
                    .mode(TravelMode::Driving.as_str()),
            );
            graph.add_edge(
                USER_VERTEX_ID,
                &facility.id,
                EdgeAttributes::new()
                    .distance(round1(distance * self.config.walking_distance_factor))
                    .time(f64::from(time_walking))
                    .mode(TravelMode::Walking.as_str()),
            );

            hospitals.push(HospitalSummary {
                id: facility.id.clone(),
                name: facility.name.clone(),
                address: facility.address.clone(),
                lat: facility.lat,
                lon: facility.lon,
                distance: Metric::Value(round1(distance)),
                time_driving,
                time_walking,
            });
        }

        debug!(
            vertices = graph.vertex_count(),
            records = graph.adjacency_count(),
            "Route graph built"
        );

        RoutePlan { graph, hospitals }
    }
}
