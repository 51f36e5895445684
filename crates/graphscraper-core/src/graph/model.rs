//! In-memory node and edge types

use std::fmt;

use serde::{Deserialize, Serialize};

use super::GraphError;

/// Weight of edges loaded from a source
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Position of a node in its graph, assigned in insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIndex(usize);

impl NodeIndex {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies an edge by its endpoints in the order it was added
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    pub source: NodeIndex,
    pub target: NodeIndex,
}

impl EdgeKey {
    #[must_use]
    pub fn new(source: NodeIndex, target: NodeIndex) -> Self {
        Self { source, target }
    }

    #[must_use]
    pub fn reversed(self) -> Self {
        Self::new(self.target, self.source)
    }

    #[must_use]
    pub fn touches(self, index: NodeIndex) -> bool {
        self.source == index || self.target == index
    }

    /// The endpoint opposite to `index`
    #[must_use]
    pub fn other(self, index: NodeIndex) -> NodeIndex {
        if self.source == index {
            self.target
        } else {
            self.source
        }
    }
}

/// An undirected, weighted edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    source: NodeIndex,
    target: NodeIndex,
    weight: f64,
}

impl Edge {
    pub(crate) fn new(source: NodeIndex, target: NodeIndex, weight: f64) -> Result<Self, GraphError> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(GraphError::InvalidWeight(weight));
        }
        Ok(Self {
            source,
            target,
            weight,
        })
    }

    #[must_use]
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.source, self.target)
    }

    #[must_use]
    pub fn source(&self) -> NodeIndex {
        self.source
    }

    #[must_use]
    pub fn target(&self) -> NodeIndex {
        self.target
    }

    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// A node of a [`super::Graph`]
#[derive(Debug, Clone)]
pub struct Node {
    index: NodeIndex,
    name: String,
    external_id: Option<String>,
    pub(crate) are_neighbors_cached: bool,
    pub(crate) are_neighbors_loaded: bool,
    edges: Vec<EdgeKey>,
}

impl Node {
    pub(crate) fn new(index: NodeIndex, name: String, external_id: Option<String>) -> Self {
        Self {
            index,
            name,
            external_id: external_id.map(|id| id.trim().to_string()),
            are_neighbors_cached: false,
            are_neighbors_loaded: false,
            edges: Vec::new(),
        }
    }

    #[must_use]
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    /// Whether the neighbors of the node have been written to the store
    #[must_use]
    pub fn are_neighbors_cached(&self) -> bool {
        self.are_neighbors_cached
    }

    /// Keys of the edges attached so far, in attachment order
    ///
    /// Unlike [`super::Graph::neighbors`] this does not trigger loading.
    #[must_use]
    pub fn edge_keys(&self) -> &[EdgeKey] {
        &self.edges
    }

    /// Attach an edge; returns false if it is foreign or already attached
    pub(crate) fn attach(&mut self, key: EdgeKey) -> bool {
        if !key.touches(self.index) {
            return false;
        }
        if self.edges.contains(&key) || self.edges.contains(&key.reversed()) {
            return false;
        }
        self.edges.push(key);
        true
    }
}
