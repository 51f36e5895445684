//! Store module: Persistent cache for nodes and edges
//!
//! Defines the [`GraphStore`] interface the graph writes through to and
//! provides SQLite and Neo4j implementations of it.

mod model;
mod neo4j;
mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

pub use model::{normalize_name, EdgeWrite, StoredEdge, StoredNeighbor, StoredNode};
pub use neo4j::{Neo4jConfig, Neo4jStore};
pub use sqlite::{SqliteConfig, SqliteStore};

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid node name: {0:?}")]
    InvalidNodeName(String),

    #[error("Invalid edge endpoints: {source_name:?} - {target_name:?}")]
    InvalidEdge {
        source_name: String,
        target_name: String,
    },

    #[error("Invalid edge weight: {0}")]
    InvalidWeight(f64),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    #[error("Neo4j error: {0}")]
    Neo4j(#[from] neo4rs::Error),
}

/// Persistent storage the graph caches its nodes and edges in
///
/// Edges are undirected: implementations must treat `(a, b)` and `(b, a)`
/// as the same edge.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Find the node with exactly the given name
    ///
    /// # Errors
    /// Returns an error if the query fails.
    async fn find_node(&self, name: &str) -> Result<Option<StoredNode>, StoreError>;

    /// Find the node carrying the given external ID
    ///
    /// Returns `None` unless exactly one node carries the ID.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    async fn find_node_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<StoredNode>, StoreError>;

    /// Insert a node whose neighbors are not cached yet
    ///
    /// Returns the existing row unchanged if a node with the same name is
    /// already stored.
    ///
    /// # Errors
    /// Returns an error if the name is empty or the query fails.
    async fn insert_node(
        &self,
        name: &str,
        external_id: Option<&str>,
    ) -> Result<StoredNode, StoreError>;

    /// Record that the neighbors of the node have been cached
    ///
    /// # Errors
    /// Returns [`StoreError::NodeNotFound`] if the node is not stored.
    async fn mark_neighbors_cached(&self, name: &str) -> Result<(), StoreError>;

    /// Find the edge connecting the given nodes in either orientation
    ///
    /// # Errors
    /// Returns an error if the query fails.
    async fn find_edge(
        &self,
        source_name: &str,
        target_name: &str,
    ) -> Result<Option<StoredEdge>, StoreError>;

    /// Insert the edge or update its weight
    ///
    /// # Errors
    /// Returns an error if the edge is invalid or the query fails.
    async fn upsert_edge(
        &self,
        source_name: &str,
        target_name: &str,
        weight: f64,
    ) -> Result<EdgeWrite, StoreError>;

    /// Neighbors of the node together with the weight of the connecting edge
    ///
    /// Neighbors come back in the order their edges were inserted.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    async fn neighbors(&self, name: &str) -> Result<Vec<StoredNeighbor>, StoreError>;

    /// Names of the neighbors of the node
    ///
    /// # Errors
    /// Returns an error if the query fails.
    async fn neighbor_names(&self, name: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .neighbors(name)
            .await?
            .into_iter()
            .map(|n| n.node.name)
            .collect())
    }

    /// Every edge the node is an endpoint of
    ///
    /// # Errors
    /// Returns an error if the query fails.
    async fn edges_of(&self, name: &str) -> Result<Vec<StoredEdge>, StoreError>;

    /// Delete every node and edge
    ///
    /// # Errors
    /// Returns an error if the query fails.
    async fn reset(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests;
