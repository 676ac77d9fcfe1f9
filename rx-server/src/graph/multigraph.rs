//! Undirected, mode-labelled multigraph over named locations.
//!
//! Each undirected edge is stored as a pair of directed adjacency records,
//! one under each endpoint, carrying identical attributes. Several edges may
//! join the same pair of vertices as long as callers want them to; in
//! practice they are distinguished by travel mode.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::metric::Metric;

/// Mode recorded on an edge when the caller does not supply one.
pub const UNKNOWN_MODE: &str = "unknown";

/// Payload carried by a vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexData {
    /// Display name.
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Postal address, when the vertex is a facility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl VertexData {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// A vertex in the graph. Immutable once inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: String,
    pub data: VertexData,
}

/// One directed adjacency record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Target vertex id.
    pub to: String,
    pub distance: Metric,
    pub time: Metric,
    pub mode: String,
}

/// Attributes supplied when adding an edge.
///
/// Any field left as `None` takes the default (`N/A` for measurements,
/// `"unknown"` for the mode) when the edge is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeAttributes {
    pub distance: Option<Metric>,
    pub time: Option<Metric>,
    pub mode: Option<String>,
}

impl EdgeAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distance(mut self, distance: impl Into<Metric>) -> Self {
        self.distance = Some(distance.into());
        self
    }

    pub fn time(mut self, time: impl Into<Metric>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Fill in defaults and point the record at `to`.
    fn into_edge(self, to: &str) -> Edge {
        Edge {
            to: to.to_string(),
            distance: self.distance.unwrap_or_default(),
            time: self.time.unwrap_or_default(),
            mode: self.mode.unwrap_or_else(|| UNKNOWN_MODE.to_string()),
        }
    }
}

/// Outcome of [`MultiGraph::add_vertex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexInsert {
    Inserted,
    /// A vertex with this id already existed; the new payload was dropped.
    AlreadyPresent,
}

impl VertexInsert {
    pub fn is_inserted(&self) -> bool {
        matches!(self, VertexInsert::Inserted)
    }
}

/// Outcome of [`MultiGraph::add_edge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeInsert {
    Inserted,
    /// The named endpoint does not exist; nothing was stored.
    MissingEndpoint(String),
}

impl EdgeInsert {
    pub fn is_inserted(&self) -> bool {
        matches!(self, EdgeInsert::Inserted)
    }
}

/// Request-scoped routing graph.
///
/// Vertices keep their insertion order, and so does every adjacency list.
/// None of the operations fail: duplicate vertices and edges to unknown
/// vertices are reported through the returned outcome instead.
#[derive(Debug, Clone, Default)]
pub struct MultiGraph {
    vertices: Vec<Vertex>,
    index: HashMap<String, usize>,
    edges: HashMap<String, Vec<Edge>>,
}

impl MultiGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a vertex unless one with the same id exists (first wins).
    pub fn add_vertex(&mut self, id: impl Into<String>, data: VertexData) -> VertexInsert {
        let id = id.into();
        if self.index.contains_key(&id) {
            return VertexInsert::AlreadyPresent;
        }

        self.index.insert(id.clone(), self.vertices.len());
        self.edges.insert(id.clone(), Vec::new());
        self.vertices.push(Vertex { id, data });
        VertexInsert::Inserted
    }

    /// Add an undirected edge between two existing vertices.
    ///
    /// Appends one record to each endpoint's adjacency list. If either
    /// endpoint is missing, neither list is touched.
    pub fn add_edge(&mut self, from: &str, to: &str, attributes: EdgeAttributes) -> EdgeInsert {
        for id in [from, to] {
            if !self.index.contains_key(id) {
                return EdgeInsert::MissingEndpoint(id.to_string());
            }
        }

        let forward = attributes.clone().into_edge(to);
        let reverse = attributes.into_edge(from);

        if let Some(list) = self.edges.get_mut(from) {
            list.push(forward);
        }
        if let Some(list) = self.edges.get_mut(to) {
            list.push(reverse);
        }
        EdgeInsert::Inserted
    }

    /// Outgoing edges of `vertex` in insertion order; empty if unknown.
    pub fn get_edges(&self, vertex: &str) -> &[Edge] {
        self.edges.get(vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All edges from `from` whose target is `to`, in insertion order.
    pub fn get_paths_to_hospital(&self, from: &str, to: &str) -> Vec<&Edge> {
        self.get_edges(from).iter().filter(|e| e.to == to).collect()
    }

    pub fn vertex(&self, id: &str) -> Option<&Vertex> {
        self.index.get(id).map(|&i| &self.vertices[i])
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Total number of directed adjacency records (twice the edge count).
    pub fn adjacency_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
