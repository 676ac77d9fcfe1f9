//! Best-edge selection over a vertex's adjacency list.

use std::fmt;
use std::str::FromStr;

use super::metric::Metric;
use super::multigraph::{Edge, MultiGraph};

/// Error returned when parsing an unknown criterion name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown criterion '{0}' (expected 'distance' or 'time')")]
pub struct UnknownCriterion(String);

/// Numeric edge attribute used to rank candidate routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Criterion {
    #[default]
    Distance,
    Time,
}

impl Criterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Distance => "distance",
            Criterion::Time => "time",
        }
    }

    /// The attribute of `edge` this criterion ranks by.
    pub fn metric(&self, edge: &Edge) -> Metric {
        match self {
            Criterion::Distance => edge.distance,
            Criterion::Time => edge.time,
        }
    }
}

/// Only `distance` and `time` parse. Any other name is rejected instead of
/// ranking every edge as missing and falling back to the first one.
impl FromStr for Criterion {
    type Err = UnknownCriterion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" => Ok(Criterion::Distance),
            "time" => Ok(Criterion::Time),
            _ => Err(UnknownCriterion(s.to_string())),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First edge with the smallest key; missing values rank as +infinity.
///
/// Ties go to the earliest edge, so when every edge lacks a value the first
/// one is returned.
pub fn first_minimum<'a, I>(edges: I, criterion: Criterion) -> Option<&'a Edge>
where
    I: IntoIterator<Item = &'a Edge>,
{
    let mut best: Option<(&Edge, f64)> = None;
    for edge in edges {
        let key = criterion.metric(edge).rank_key();
        match best {
            Some((_, best_key)) if key >= best_key => {}
            _ => best = Some((edge, key)),
        }
    }
    best.map(|(edge, _)| edge)
}

impl MultiGraph {
    /// The outgoing edge of `from` that minimises `criterion`.
    ///
    /// Returns `None` when the vertex is unknown or has no edges.
    pub fn find_best_hospital(&self, from: &str, criterion: Criterion) -> Option<&Edge> {
        first_minimum(self.get_edges(from), criterion)
    }
}
