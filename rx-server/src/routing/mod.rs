//! Hospital routing: graph construction and best-choice selection.
//!
//! Given the user's position and nearby facilities, builds a multigraph
//! with one driving and one walking edge per facility, then picks the
//! facility whose route minimises the requested criterion.

mod builder;
mod config;
mod plan;

pub use builder::{
    HospitalSummary, RouteBuilder, RoutePlan, TravelMode, USER_VERTEX_ID, USER_VERTEX_NAME,
};
pub use config::RoutingConfig;
pub use plan::{BestHospital, HospitalRoutes, best_hospital, plan_routes};
