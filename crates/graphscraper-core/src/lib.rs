//! graphscraper-core: graphs that load their data on demand
//!
//! A [`graph::Graph`] pulls the neighbors of a node from a
//! [`source::NeighborSource`] the first time they are requested and caches
//! everything it learns in a [`store::GraphStore`]. Later requests, even from
//! a fresh process, are answered from the store.

pub mod graph;
pub mod source;
pub mod store;

pub use graph::{Graph, GraphError, GraphEvent, NodeIndex};
pub use source::{NeighborSource, NodeSeed, SourceError};
pub use store::{GraphStore, StoreError};
