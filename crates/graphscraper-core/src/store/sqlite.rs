//! SQLite-backed graph store

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::model::{normalize_external_id, normalize_name, ordered_pair, today};
use super::{EdgeWrite, GraphStore, StoreError, StoredEdge, StoredNeighbor, StoredNode};

const DATE_FORMAT: &str = "%Y-%m-%d";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS nodes (
  name TEXT PRIMARY KEY NOT NULL,
  external_id TEXT NULL,
  are_neighbors_cached INTEGER NOT NULL DEFAULT 0,
  creation_date TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS nodes_external_id_idx ON nodes(external_id);

CREATE TABLE IF NOT EXISTS edges (
  source_name TEXT NOT NULL REFERENCES nodes(name) ON DELETE CASCADE,
  target_name TEXT NOT NULL REFERENCES nodes(name) ON DELETE CASCADE,
  weight REAL NOT NULL DEFAULT 1 CHECK (weight > 0),
  creation_date TEXT NOT NULL,
  PRIMARY KEY (source_name, target_name),
  CHECK (source_name < target_name)
);
CREATE INDEX IF NOT EXISTS edges_target_idx ON edges(target_name);
"#;

const DROP_SCHEMA: &str = r#"
DROP TABLE IF EXISTS edges;
DROP TABLE IF EXISTS nodes;
"#;

/// Configuration for a SQLite store
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database file; `None` keeps the database in memory
    pub path: Option<PathBuf>,
    /// Drop and recreate the tables when opening
    pub reset: bool,
    /// Create the database file and its directory when absent
    pub create_if_missing: bool,
    pub max_connections: u32,
}

impl SqliteConfig {
    /// Configuration for a database file, created if missing
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            reset: false,
            create_if_missing: true,
            max_connections: 5,
        }
    }

    /// Configuration for a private in-memory database
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            reset: false,
            create_if_missing: true,
            max_connections: 1,
        }
    }

    /// Drop existing tables when opening
    #[must_use]
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Fail instead of creating a missing database file
    #[must_use]
    pub fn with_create_if_missing(mut self, create_if_missing: bool) -> Self {
        self.create_if_missing = create_if_missing;
        self
    }

    /// Set the connection pool size (ignored for in-memory databases)
    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }
}

/// Graph store on top of a SQLite database
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open the database and ensure the schema exists
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or initialized.
    pub async fn open(config: &SqliteConfig) -> Result<Self, StoreError> {
        let pool = match &config.path {
            Some(path) => Self::connect_file(path, config).await?,
            None => Self::connect_memory().await?,
        };

        let store = Self { pool };
        if config.reset {
            debug!("Dropping existing graph tables");
            sqlx::raw_sql(DROP_SCHEMA).execute(&store.pool).await?;
        }
        sqlx::raw_sql(SCHEMA).execute(&store.pool).await?;

        Ok(store)
    }

    /// Open a fresh in-memory database
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::open(&SqliteConfig::in_memory()).await
    }

    async fn connect_file(path: &Path, config: &SqliteConfig) -> Result<SqlitePool, StoreError> {
        let parent = path
            .parent()
            .filter(|p| config.create_if_missing && !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Connection(e.to_string()))?;
        }

        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(config.create_if_missing)
            .foreign_keys(true);

        Ok(SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(opts)
            .await?)
    }

    // Every connection to `:memory:` opens its own database, so the pool
    // holds exactly one connection and never recycles it.
    async fn connect_memory() -> Result<SqlitePool, StoreError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        Ok(SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(opts)
            .await?)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| StoreError::Decode(format!("creation_date {raw:?}: {e}")))
}

fn node_from_row(row: &SqliteRow) -> Result<StoredNode, StoreError> {
    let creation_date: String = row.try_get("creation_date")?;
    Ok(StoredNode {
        name: row.try_get("name")?,
        external_id: row.try_get("external_id")?,
        are_neighbors_cached: row.try_get("are_neighbors_cached")?,
        creation_date: parse_date(&creation_date)?,
    })
}

fn edge_from_row(row: &SqliteRow) -> Result<StoredEdge, StoreError> {
    let creation_date: String = row.try_get("creation_date")?;
    Ok(StoredEdge {
        source_name: row.try_get("source_name")?,
        target_name: row.try_get("target_name")?,
        weight: row.try_get("weight")?,
        creation_date: parse_date(&creation_date)?,
    })
}

#[async_trait]
impl GraphStore for SqliteStore {
    async fn find_node(&self, name: &str) -> Result<Option<StoredNode>, StoreError> {
        let row = sqlx::query(
            r#"
SELECT name, external_id, are_neighbors_cached, creation_date
FROM nodes
WHERE name = ?1
"#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(node_from_row).transpose()
    }

    async fn find_node_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<StoredNode>, StoreError> {
        let rows = sqlx::query(
            r#"
SELECT name, external_id, are_neighbors_cached, creation_date
FROM nodes
WHERE external_id = ?1
LIMIT 2
"#,
        )
        .bind(external_id)
        .fetch_all(&self.pool)
        .await?;

        match rows.as_slice() {
            [row] => Ok(Some(node_from_row(row)?)),
            _ => Ok(None),
        }
    }

    async fn insert_node(
        &self,
        name: &str,
        external_id: Option<&str>,
    ) -> Result<StoredNode, StoreError> {
        let name = normalize_name(name)?;
        let external_id = normalize_external_id(external_id);

        sqlx::query(
            r#"
INSERT INTO nodes (name, external_id, are_neighbors_cached, creation_date)
VALUES (?1, ?2, 0, ?3)
ON CONFLICT(name) DO NOTHING
"#,
        )
        .bind(name)
        .bind(&external_id)
        .bind(today().format(DATE_FORMAT).to_string())
        .execute(&self.pool)
        .await?;

        self.find_node(name)
            .await?
            .ok_or_else(|| StoreError::NodeNotFound(name.to_string()))
    }

    async fn mark_neighbors_cached(&self, name: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE nodes SET are_neighbors_cached = 1 WHERE name = ?1")
            .bind(name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
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

        let row = sqlx::query(
            r#"
SELECT source_name, target_name, weight, creation_date
FROM edges
WHERE source_name = ?1 AND target_name = ?2
"#,
        )
        .bind(source_name)
        .bind(target_name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(edge_from_row).transpose()
    }

    async fn upsert_edge(
        &self,
        source_name: &str,
        target_name: &str,
        weight: f64,
    ) -> Result<EdgeWrite, StoreError> {
        let edge = StoredEdge::new(source_name, target_name, weight)?;

        match self.find_edge(&edge.source_name, &edge.target_name).await? {
            None => {
                sqlx::query(
                    r#"
INSERT INTO edges (source_name, target_name, weight, creation_date)
VALUES (?1, ?2, ?3, ?4)
"#,
                )
                .bind(&edge.source_name)
                .bind(&edge.target_name)
                .bind(edge.weight)
                .bind(edge.creation_date.format(DATE_FORMAT).to_string())
                .execute(&self.pool)
                .await?;
                Ok(EdgeWrite::Inserted)
            }
            Some(existing) if existing.weight != edge.weight => {
                sqlx::query(
                    "UPDATE edges SET weight = ?3 WHERE source_name = ?1 AND target_name = ?2",
                )
                .bind(&edge.source_name)
                .bind(&edge.target_name)
                .bind(edge.weight)
                .execute(&self.pool)
                .await?;
                Ok(EdgeWrite::Updated)
            }
            Some(_) => Ok(EdgeWrite::Unchanged),
        }
    }

    async fn neighbors(&self, name: &str) -> Result<Vec<StoredNeighbor>, StoreError> {
        let rows = sqlx::query(
            r#"
SELECT n.name AS name, n.external_id AS external_id,
       n.are_neighbors_cached AS are_neighbors_cached, n.creation_date AS creation_date,
       e.weight AS weight, e.rowid AS edge_order
FROM edges e JOIN nodes n ON n.name = e.source_name
WHERE e.target_name = ?1
UNION ALL
SELECT n.name AS name, n.external_id AS external_id,
       n.are_neighbors_cached AS are_neighbors_cached, n.creation_date AS creation_date,
       e.weight AS weight, e.rowid AS edge_order
FROM edges e JOIN nodes n ON n.name = e.target_name
WHERE e.source_name = ?1
ORDER BY edge_order
"#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(StoredNeighbor {
                    node: node_from_row(row)?,
                    weight: row.try_get("weight")?,
                })
            })
            .collect()
    }

    async fn edges_of(&self, name: &str) -> Result<Vec<StoredEdge>, StoreError> {
        let rows = sqlx::query(
            r#"
SELECT source_name, target_name, weight, creation_date
FROM edges
WHERE source_name = ?1 OR target_name = ?1
ORDER BY source_name, target_name
"#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(edge_from_row).collect()
    }

    async fn reset(&self) -> Result<(), StoreError> {
        sqlx::raw_sql("DELETE FROM edges; DELETE FROM nodes;")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
