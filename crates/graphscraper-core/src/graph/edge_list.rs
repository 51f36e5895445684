//! Container of the edges of a graph

use std::collections::HashMap;

use super::model::{Edge, EdgeKey, NodeIndex};

/// Undirected edges keyed by their endpoints
#[derive(Debug, Default)]
pub struct EdgeList {
    edges: HashMap<EdgeKey, Edge>,
}

impl EdgeList {
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The edge connecting `a` and `b` in either orientation
    #[must_use]
    pub fn get(&self, a: NodeIndex, b: NodeIndex) -> Option<&Edge> {
        let key = EdgeKey::new(a, b);
        self.edges
            .get(&key)
            .or_else(|| self.edges.get(&key.reversed()))
    }

    /// Edges ordered by key
    #[must_use]
    pub fn sorted(&self) -> Vec<&Edge> {
        let mut edges: Vec<&Edge> = self.edges.values().collect();
        edges.sort_by_key(|edge| edge.key());
        edges
    }

    /// Insert the edge unless its endpoints are already connected
    pub(crate) fn insert(&mut self, edge: Edge) -> bool {
        if self.get(edge.source(), edge.target()).is_some() {
            return false;
        }
        self.edges.insert(edge.key(), edge);
        true
    }
}
