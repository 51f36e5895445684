//! Neo4j-backed graph store

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use neo4rs::{ConfigBuilder, Graph, Query, Row};

use super::model::{normalize_external_id, normalize_name, ordered_pair, today};
use super::{EdgeWrite, GraphStore, StoreError, StoredEdge, StoredNeighbor, StoredNode};

/// Configuration for Neo4j connection
#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: Option<String>,
}

impl Neo4jConfig {
    /// Create a new Neo4j configuration
    #[must_use]
    pub fn new(
        uri: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            user: user.into(),
            password: password.into(),
            database: None,
        }
    }

    /// Set the database name
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}

/// Graph store on top of a Neo4j database
///
/// Nodes are `(:Node)` vertices keyed by name. Edges are `[:CONNECTED]`
/// relationships pointing from the lexically smaller name to the larger one.
/// Each edge carries a `seq` drawn from a single `(:EdgeSequence)` counter
/// so neighbors can be listed in insertion order.
#[derive(Clone)]
pub struct Neo4jStore {
    graph: Arc<Graph>,
}

const NODE_FIELDS: &str = "n.name AS name, n.external_id AS external_id, \
     n.are_neighbors_cached AS are_neighbors_cached, n.creation_date AS creation_date";

impl Neo4jStore {
    /// Connect to Neo4j and ensure constraints exist
    ///
    /// # Errors
    /// Returns an error if the connection fails.
    pub async fn connect(config: &Neo4jConfig) -> Result<Self, StoreError> {
        let mut builder = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password);

        if let Some(db) = &config.database {
            builder = builder.db(db.as_str());
        }

        let neo_config = builder
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let graph = Graph::connect(neo_config).await?;

        let store = Self {
            graph: Arc::new(graph),
        };

        store.ensure_schema().await?;

        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let statements = [
            "CREATE CONSTRAINT node_name IF NOT EXISTS FOR (n:Node) REQUIRE n.name IS UNIQUE",
            "CREATE INDEX node_external_id IF NOT EXISTS FOR (n:Node) ON (n.external_id)",
        ];

        for statement in statements {
            self.graph.run(Query::new(statement.to_string())).await?;
        }

        Ok(())
    }

    /// Get access to the underlying driver
    #[cfg(test)]
    pub(crate) fn graph(&self) -> &Graph {
        &self.graph
    }

    async fn fetch_nodes(&self, query: Query) -> Result<Vec<StoredNode>, StoreError> {
        let mut result = self.graph.execute(query).await?;
        let mut nodes = Vec::new();
        while let Some(row) = result.next().await? {
            nodes.push(node_from_row(&row)?);
        }
        Ok(nodes)
    }
}

fn get<T: serde::de::DeserializeOwned>(row: &Row, key: &str) -> Result<T, StoreError> {
    row.get(key)
        .map_err(|e| StoreError::Decode(format!("{key}: {e}")))
}

fn parse_date(raw: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| StoreError::Decode(format!("creation_date {raw:?}: {e}")))
}

fn node_from_row(row: &Row) -> Result<StoredNode, StoreError> {
    let creation_date: String = get(row, "creation_date")?;
    stored_node(
        get(row, "name")?,
        get(row, "external_id")?,
        get(row, "are_neighbors_cached")?,
        &creation_date,
    )
}

// Missing external IDs are stored as empty strings. Null properties decode
// as `None`; properties of the wrong type are decode errors.
pub(crate) fn stored_node(
    name: String,
    external_id: Option<String>,
    are_neighbors_cached: Option<bool>,
    creation_date: &str,
) -> Result<StoredNode, StoreError> {
    Ok(StoredNode {
        name,
        external_id: external_id.filter(|id| !id.is_empty()),
        are_neighbors_cached: are_neighbors_cached.unwrap_or(false),
        creation_date: parse_date(creation_date)?,
    })
}

fn edge_from_row(row: &Row) -> Result<StoredEdge, StoreError> {
    let creation_date: String = get(row, "creation_date")?;
    Ok(StoredEdge {
        source_name: get(row, "source_name")?,
        target_name: get(row, "target_name")?,
        weight: get(row, "weight")?,
        creation_date: parse_date(&creation_date)?,
    })
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn find_node(&self, name: &str) -> Result<Option<StoredNode>, StoreError> {
        let query = Query::new(format!(
            "MATCH (n:Node {{name: $name}}) RETURN {NODE_FIELDS} LIMIT 1"
        ))
        .param("name", name);

        Ok(self.fetch_nodes(query).await?.into_iter().next())
    }

    async fn find_node_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<StoredNode>, StoreError> {
        let query = Query::new(format!(
            "MATCH (n:Node {{external_id: $external_id}}) RETURN {NODE_FIELDS} LIMIT 2"
        ))
        .param("external_id", external_id);

        let mut nodes = self.fetch_nodes(query).await?;
        if nodes.len() == 1 {
            return Ok(nodes.pop());
        }
        Ok(None)
    }

    async fn insert_node(
        &self,
        name: &str,
        external_id: Option<&str>,
    ) -> Result<StoredNode, StoreError> {
        let name = normalize_name(name)?;
        let external_id = normalize_external_id(external_id).unwrap_or_default();

        let query = Query::new(format!(
            r#"
            MERGE (n:Node {{name: $name}})
            ON CREATE SET
                n.external_id = $external_id,
                n.are_neighbors_cached = false,
                n.creation_date = $creation_date
            RETURN {NODE_FIELDS}
            "#
        ))
        .param("name", name)
        .param("external_id", external_id)
        .param("creation_date", today().format("%Y-%m-%d").to_string());

        self.fetch_nodes(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NodeNotFound(name.to_string()))
    }

    async fn mark_neighbors_cached(&self, name: &str) -> Result<(), StoreError> {
        let query = Query::new(
            r#"
            MATCH (n:Node {name: $name})
            SET n.are_neighbors_cached = true
            RETURN n.name AS name
            "#
            .to_string(),
        )
        .param("name", name);

        let mut result = self.graph.execute(query).await?;
        if result.next().await?.is_none() {
            return Err(StoreError::NodeNotFound(name.to_string()));
        }
        Ok(())
    }

    async fn find_edge(
        &self,
        source_name: &str,
        target_name: &str,
    ) -> Result<Option<StoredEdge>, StoreError> {
        let Ok((source_name, target_name)) = ordered_pair(source_name, target_name) else {
            return Ok(None);
        };

        let query = Query::new(
            r#"
            MATCH (a:Node {name: $source_name})-[e:CONNECTED]->(b:Node {name: $target_name})
            RETURN a.name AS source_name, b.name AS target_name,
                   e.weight AS weight, e.creation_date AS creation_date
            LIMIT 1
            "#
            .to_string(),
        )
        .param("source_name", source_name)
        .param("target_name", target_name);

        let mut result = self.graph.execute(query).await?;
        match result.next().await? {
            Some(row) => Ok(Some(edge_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn upsert_edge(
        &self,
        source_name: &str,
        target_name: &str,
        weight: f64,
    ) -> Result<EdgeWrite, StoreError> {
        let edge = StoredEdge::new(source_name, target_name, weight)?;

        let write = match self.find_edge(&edge.source_name, &edge.target_name).await? {
            None => EdgeWrite::Inserted,
            Some(existing) if existing.weight != edge.weight => EdgeWrite::Updated,
            Some(_) => return Ok(EdgeWrite::Unchanged),
        };

        let statement = match write {
            EdgeWrite::Inserted => {
                r#"
                MATCH (a:Node {name: $source_name})
                MATCH (b:Node {name: $target_name})
                MERGE (s:EdgeSequence {id: 'edges'})
                ON CREATE SET s.next = 0
                SET s.next = s.next + 1
                CREATE (a)-[e:CONNECTED {
                    weight: $weight, creation_date: $creation_date, seq: s.next
                }]->(b)
                RETURN e.weight AS weight
                "#
            }
            _ => {
                r#"
                MATCH (a:Node {name: $source_name})-[e:CONNECTED]->(b:Node {name: $target_name})
                SET e.weight = $weight
                RETURN e.weight AS weight
                "#
            }
        };

        let query = Query::new(statement.to_string())
            .param("source_name", edge.source_name.clone())
            .param("target_name", edge.target_name.clone())
            .param("weight", edge.weight)
            .param("creation_date", edge.creation_date.format("%Y-%m-%d").to_string());

        let mut result = self.graph.execute(query).await?;
        if result.next().await?.is_none() {
            // MATCH found no endpoints, so nothing was written.
            return Err(StoreError::InvalidEdge {
                source_name: edge.source_name,
                target_name: edge.target_name,
            });
        }
        Ok(write)
    }

    async fn neighbors(&self, name: &str) -> Result<Vec<StoredNeighbor>, StoreError> {
        let query = Query::new(format!(
            r#"
            MATCH (:Node {{name: $name}})-[e:CONNECTED]-(n:Node)
            RETURN {NODE_FIELDS}, e.weight AS weight
            ORDER BY e.seq
            "#
        ))
        .param("name", name);

        let mut result = self.graph.execute(query).await?;
        let mut neighbors = Vec::new();
        while let Some(row) = result.next().await? {
            neighbors.push(StoredNeighbor {
                node: node_from_row(&row)?,
                weight: get(&row, "weight")?,
            });
        }
        Ok(neighbors)
    }

    async fn edges_of(&self, name: &str) -> Result<Vec<StoredEdge>, StoreError> {
        let query = Query::new(
            r#"
            MATCH (a:Node)-[e:CONNECTED]->(b:Node)
            WHERE a.name = $name OR b.name = $name
            RETURN a.name AS source_name, b.name AS target_name,
                   e.weight AS weight, e.creation_date AS creation_date
            ORDER BY source_name, target_name
            "#
            .to_string(),
        )
        .param("name", name);

        let mut result = self.graph.execute(query).await?;
        let mut edges = Vec::new();
        while let Some(row) = result.next().await? {
            edges.push(edge_from_row(&row)?);
        }
        Ok(edges)
    }

    async fn reset(&self) -> Result<(), StoreError> {
        self.graph
            .run(Query::new("MATCH (n:Node) DETACH DELETE n".to_string()))
            .await?;
        Ok(())
    }
}
