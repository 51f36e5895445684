//! Stored record types

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::StoreError;

/// Trim a node name, rejecting names without non-whitespace characters
///
/// # Errors
/// Returns [`StoreError::InvalidNodeName`] if the trimmed name is empty.
pub fn normalize_name(name: &str) -> Result<&str, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidNodeName(name.to_string()));
    }
    Ok(trimmed)
}

pub(crate) fn normalize_external_id(external_id: Option<&str>) -> Option<String> {
    external_id.map(|id| id.trim().to_string())
}

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// A node row in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredNode {
    /// Unique node name
    pub name: String,
    /// Identifier of the node in the remote source
    pub external_id: Option<String>,
    /// Whether the neighbors of the node have been written to the store
    pub are_neighbors_cached: bool,
    /// Day the node was first stored
    pub creation_date: NaiveDate,
}

impl StoredNode {
    /// Create a fresh node record dated today
    ///
    /// # Errors
    /// Returns an error if the name is empty.
    pub fn new(name: &str, external_id: Option<&str>) -> Result<Self, StoreError> {
        Ok(Self {
            name: normalize_name(name)?.to_string(),
            external_id: normalize_external_id(external_id),
            are_neighbors_cached: false,
            creation_date: today(),
        })
    }
}

/// An undirected edge row in the store
///
/// `source_name` is always the lexically smaller endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEdge {
    pub source_name: String,
    pub target_name: String,
    pub weight: f64,
    pub creation_date: NaiveDate,
}

impl StoredEdge {
    /// Create an edge record with its endpoints in canonical order
    ///
    /// # Errors
    /// Returns an error if the endpoints are equal or the weight is not a
    /// finite positive number.
    pub fn new(source_name: &str, target_name: &str, weight: f64) -> Result<Self, StoreError> {
        let (source_name, target_name) = ordered_pair(source_name, target_name)?;
        if !weight.is_finite() || weight <= 0.0 {
            return Err(StoreError::InvalidWeight(weight));
        }
        Ok(Self {
            source_name: source_name.to_string(),
            target_name: target_name.to_string(),
            weight,
            creation_date: today(),
        })
    }

    /// The endpoint opposite to `name`
    #[must_use]
    pub fn other(&self, name: &str) -> &str {
        if self.source_name == name {
            &self.target_name
        } else {
            &self.source_name
        }
    }
}

/// Order two endpoint names the way edges are keyed in the store
///
/// # Errors
/// Returns [`StoreError::InvalidEdge`] if the names are empty or equal.
pub(crate) fn ordered_pair<'a>(a: &'a str, b: &'a str) -> Result<(&'a str, &'a str), StoreError> {
    if a.is_empty() || b.is_empty() || a == b {
        return Err(StoreError::InvalidEdge {
            source_name: a.to_string(),
            target_name: b.to_string(),
        });
    }
    Ok(if a < b { (a, b) } else { (b, a) })
}

/// A neighbor of a stored node
#[derive(Debug, Clone, PartialEq)]
pub struct StoredNeighbor {
    pub node: StoredNode,
    /// Weight of the edge connecting the neighbor
    pub weight: f64,
}

/// Outcome of [`super::GraphStore::upsert_edge`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeWrite {
    Inserted,
    Updated,
    Unchanged,
}
