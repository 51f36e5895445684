//! Source backed by an in-memory petgraph graph
//!
//! The wrapped graph must not change once the source is built: vertex
//! lookups by name are indexed up front.

use std::collections::HashMap;

use async_trait::async_trait;
use petgraph::graph::{NodeIndex, UnGraph};
use rand::Rng;

use super::{NeighborSource, NodeSeed, SourceError};
use crate::graph::Node;

/// Vertex payload of a wrapped graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vertex {
    pub name: Option<String>,
    pub external_id: Option<String>,
}

impl Vertex {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            external_id: None,
        }
    }

    #[must_use]
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }
}

/// Neighbor source that reads from a static undirected graph
///
/// A vertex is addressed by its name or, failing that, by its decimal
/// index. Unnamed vertices are known to the cached graph by their index.
pub struct StaticGraphSource {
    graph: UnGraph<Vertex, ()>,
    by_name: HashMap<String, NodeIndex>,
}

impl StaticGraphSource {
    /// Wrap an existing graph
    #[must_use]
    pub fn new(graph: UnGraph<Vertex, ()>) -> Self {
        let by_name = graph
            .node_indices()
            .filter_map(|idx| {
                let name = graph[idx].name.as_deref()?.trim();
                (!name.is_empty()).then(|| (name.to_string(), idx))
            })
            .collect();
        Self { graph, by_name }
    }

    /// Build a graph from vertices and index pairs
    ///
    /// Pairs referring to missing vertices are skipped.
    #[must_use]
    pub fn from_edges(vertices: Vec<Vertex>, edges: &[(usize, usize)]) -> Self {
        let mut graph = UnGraph::with_capacity(vertices.len(), edges.len());
        for vertex in vertices {
            graph.add_node(vertex);
        }
        let count = graph.node_count();
        for &(a, b) in edges {
            if a < count && b < count {
                graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
            }
        }
        Self::new(graph)
    }

    /// Random G(n, p) graph
    ///
    /// Named graphs call vertex `i` `Node-{i}` with external ID `Node-Ext-{i}`.
    #[must_use]
    pub fn erdos_renyi<R: Rng + ?Sized>(n: usize, p: f64, named: bool, rng: &mut R) -> Self {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        let vertices = (0..n)
            .map(|i| {
                if named {
                    Vertex::named(format!("Node-{i}")).with_external_id(format!("Node-Ext-{i}"))
                } else {
                    Vertex::default()
                }
            })
            .collect();

        let mut edges = Vec::new();
        for a in 0..n {
            for b in (a + 1)..n {
                if rng.gen_bool(p) {
                    edges.push((a, b));
                }
            }
        }
        Self::from_edges(vertices, &edges)
    }

    /// The wrapped graph
    #[must_use]
    pub fn wrapped_graph(&self) -> &UnGraph<Vertex, ()> {
        &self.graph
    }

    /// Find a vertex by name, falling back to parsing `key` as an index
    #[must_use]
    pub fn locate(&self, key: &str) -> Option<NodeIndex> {
        let key = key.trim();
        if let Some(&idx) = self.by_name.get(key) {
            return Some(idx);
        }
        let index: usize = key.parse().ok()?;
        (index < self.graph.node_count()).then(|| NodeIndex::new(index))
    }

    /// The name a vertex is known by in the cached graph
    ///
    /// Names are trimmed; blank names count as missing.
    #[must_use]
    pub fn label(&self, idx: NodeIndex) -> String {
        match self.graph[idx].name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => idx.index().to_string(),
        }
    }

    /// Adjacent vertices, without duplicates or loops
    #[must_use]
    pub fn adjacent(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut adjacent: Vec<NodeIndex> = Vec::new();
        for neighbor in self.graph.neighbors(idx) {
            if neighbor != idx && !adjacent.contains(&neighbor) {
                adjacent.push(neighbor);
            }
        }
        adjacent.sort_unstable();
        adjacent
    }
}

#[async_trait]
impl NeighborSource for StaticGraphSource {
    async fn authentic_name(&self, name: &str) -> Result<Option<String>, SourceError> {
        Ok(self.locate(name).map(|idx| self.label(idx)))
    }

    fn resolves_names(&self) -> bool {
        true
    }

    async fn neighbors(&self, node: &Node) -> Result<Vec<NodeSeed>, SourceError> {
        let idx = self
            .locate(node.name())
            .ok_or_else(|| SourceError::UnknownNode(node.name().to_string()))?;

        Ok(self
            .adjacent(idx)
            .into_iter()
            .map(|neighbor| {
                NodeSeed::new(
                    self.label(neighbor),
                    self.graph[neighbor].external_id.clone(),
                )
            })
            .collect())
    }
}
