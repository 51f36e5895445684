//! Graph module: Lazily loaded undirected graph
//!
//! Nodes and edges live in memory in a [`NodeList`] and an [`EdgeList`]
//! bound together by [`Graph`], which writes everything it learns through
//! to a store and asks a source for anything it has not seen yet.

mod edge_list;
mod events;
#[allow(clippy::module_inception)]
mod graph;
mod model;
mod node_list;

use thiserror::Error;

use crate::source::SourceError;
use crate::store::StoreError;

pub use edge_list::EdgeList;
pub use events::GraphEvent;
pub use graph::Graph;
pub use model::{Edge, EdgeKey, Node, NodeIndex, DEFAULT_WEIGHT};
pub use node_list::NodeList;

/// Errors that can occur during graph operations
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Invalid edge weight: {0}")]
    InvalidWeight(f64),

    #[error("Node {0:?} has no external ID")]
    MissingExternalId(String),

    #[error("Unknown node index: {0}")]
    UnknownNode(NodeIndex),
}
