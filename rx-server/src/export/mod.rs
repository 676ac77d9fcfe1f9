//! Flattens a [`MultiGraph`] into a node/link view for graph renderers.
//!
//! Links are emitted by walking every vertex's adjacency list in insertion
//! order and skipping any `(source, target, mode)` triple already seen.
//! Because edges are stored in both directions, each undirected edge shows
//! up twice (once per direction) unless [`ExportConfig::collapse_symmetric`]
//! is set.

use std::collections::HashSet;

use serde::Serialize;

use crate::graph::{Metric, MultiGraph};
use crate::routing::{TravelMode, USER_VERTEX_ID};

pub const USER_NODE_COLOR: &str = "#ff4d4f";
pub const FACILITY_NODE_COLOR: &str = "#1890ff";
pub const USER_NODE_SIZE: u32 = 600;
pub const FACILITY_NODE_SIZE: u32 = 400;

pub const DRIVING_LINK_COLOR: &str = "#52c41a";
pub const WALKING_LINK_COLOR: &str = "#faad14";
pub const OTHER_LINK_COLOR: &str = "#8c8c8c";

/// A renderable vertex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: String,
    pub name: String,
    pub color: &'static str,
    pub size: u32,
}

/// A renderable directed link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkView {
    pub source: String,
    pub target: String,
    pub color: &'static str,
    /// Travel mode of the underlying edge.
    pub label: String,
    pub distance: Metric,
    pub time: Metric,
}

/// `{nodes, links}` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<NodeView>,
    pub links: Vec<LinkView>,
}

/// Export options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportConfig {
    /// Drop the reverse copy of each undirected edge.
    pub collapse_symmetric: bool,
}

/// Link colour for a travel mode name.
pub fn link_color(mode: &str) -> &'static str {
    if mode == TravelMode::Driving.as_str() {
        DRIVING_LINK_COLOR
    } else if mode == TravelMode::Walking.as_str() {
        WALKING_LINK_COLOR
    } else {
        OTHER_LINK_COLOR
    }
}

/// Builds a [`GraphView`] from a graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphExporter {
    config: ExportConfig,
}

impl GraphExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn export(&self, graph: &MultiGraph) -> GraphView {
        let nodes = graph
            .vertices()
            .map(|v| {
                let is_user = v.id == USER_VERTEX_ID;
                NodeView {
                    id: v.id.clone(),
                    name: v.data.name.clone(),
                    color: if is_user {
                        USER_NODE_COLOR
                    } else {
                        FACILITY_NODE_COLOR
                    },
                    size: if is_user {
                        USER_NODE_SIZE
                    } else {
                        FACILITY_NODE_SIZE
                    },
                }
            })
            .collect();

        let mut seen: HashSet<(&str, &str, &str)> = HashSet::new();
        let mut links = Vec::new();

        for vertex in graph.vertices() {
            for edge in graph.get_edges(&vertex.id) {
                let (a, b) = (vertex.id.as_str(), edge.to.as_str());
                let key = if self.config.collapse_symmetric && b < a {
                    (b, a, edge.mode.as_str())
                } else {
                    (a, b, edge.mode.as_str())
                };
                if !seen.insert(key) {
                    continue;
                }

                links.push(LinkView {
                    source: vertex.id.clone(),
                    target: edge.to.clone(),
                    color: link_color(&edge.mode),
                    label: edge.mode.clone(),
                    distance: edge.distance,
                    time: edge.time,
                });
            }
        }

        GraphView { nodes, links }
    }
}
