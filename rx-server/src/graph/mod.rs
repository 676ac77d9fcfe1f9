//! Routing multigraph and best-route selection.
//!
//! The graph is built per request: one vertex for the user, one per
//! candidate facility, and one edge per travel mode between them.

mod metric;
mod multigraph;
mod select;

pub use metric::{Metric, NOT_AVAILABLE};
pub use multigraph::{
    Edge, EdgeAttributes, EdgeInsert, MultiGraph, UNKNOWN_MODE, Vertex, VertexData, VertexInsert,
};
pub use select::{Criterion, UnknownCriterion, first_minimum};
