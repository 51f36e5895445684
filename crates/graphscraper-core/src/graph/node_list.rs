//! Container of the nodes of a graph

use std::collections::HashMap;

use super::model::{Node, NodeIndex};

/// Nodes addressable by index or by name
#[derive(Debug, Default)]
pub struct NodeList {
    nodes: Vec<Node>,
    by_name: HashMap<String, NodeIndex>,
}

impl NodeList {
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.index())
    }

    pub(crate) fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        self.nodes.get_mut(index.index())
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Node> {
        self.index_of(name).and_then(|index| self.get(index))
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Append a node without checking whether the name is taken
    pub(crate) fn push(
        &mut self,
        name: String,
        external_id: Option<String>,
        are_neighbors_cached: bool,
    ) -> NodeIndex {
        let index = NodeIndex::new(self.nodes.len());
        let mut node = Node::new(index, name.clone(), external_id);
        node.are_neighbors_cached = are_neighbors_cached;
        self.nodes.push(node);
        self.by_name.insert(name, index);
        index
    }
}
