//! Source module: Remote data the graph loads lazily
//!
//! A [`NeighborSource`] provides the hooks a [`crate::graph::Graph`] calls
//! when it meets a node or a node's neighbors for the first time. Whatever a
//! source returns is written to the store, so each node is fetched at most
//! once.

mod spotify;
mod static_graph;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::Node;

pub use spotify::{SpotifyArtistSource, SpotifyClient, SpotifyConfig};
pub use static_graph::{StaticGraphSource, Vertex};

/// Errors that can occur while talking to a remote source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid item: {0}")]
    InvalidItem(String),

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Source error: {0}")]
    Backend(String),
}

/// A node as described by a remote source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSeed {
    pub name: String,
    pub external_id: Option<String>,
}

impl NodeSeed {
    #[must_use]
    pub fn new(name: impl Into<String>, external_id: Option<String>) -> Self {
        Self {
            name: name.into(),
            external_id,
        }
    }
}

/// Hooks a graph uses to load data it has not cached yet
#[async_trait]
pub trait NeighborSource: Send + Sync {
    /// The exact name of the remote node matching a possibly inexact name
    ///
    /// Only consulted when [`NeighborSource::resolves_names`] is true.
    ///
    /// # Errors
    /// Returns an error if the remote lookup fails.
    async fn authentic_name(&self, _name: &str) -> Result<Option<String>, SourceError> {
        Ok(None)
    }

    /// Whether [`NeighborSource::authentic_name`] is implemented
    ///
    /// When false, the graph treats a name as authentic if the node is
    /// already known locally or in the store.
    fn resolves_names(&self) -> bool {
        false
    }

    /// The remote neighbors of `node`
    ///
    /// # Errors
    /// Returns an error if the remote lookup fails.
    async fn neighbors(&self, node: &Node) -> Result<Vec<NodeSeed>, SourceError>;

    /// The external ID of a node created without one
    ///
    /// # Errors
    /// Returns an error if the remote lookup fails.
    async fn resolve_external_id(&self, _name: &str) -> Result<Option<String>, SourceError> {
        Ok(None)
    }

    /// Whether every node must carry an external ID
    fn requires_external_id(&self) -> bool {
        false
    }
}

/// Source for graphs whose data is already in the store
#[derive(Debug, Clone, Copy, Default)]
pub struct DatabaseOnly;

#[async_trait]
impl NeighborSource for DatabaseOnly {
    async fn neighbors(&self, _node: &Node) -> Result<Vec<NodeSeed>, SourceError> {
        Ok(Vec::new())
    }
}
