//! Opening the cache selected on the command line

use std::sync::Arc;

use anyhow::{Context, Result};
use graphscraper_core::store::{GraphStore, Neo4jConfig, Neo4jStore, SqliteConfig, SqliteStore};
use tracing::info;

use crate::StoreArgs;

/// Connect to the store described by `args`
///
/// With `reset` every cached node and edge is removed first.
///
/// # Errors
/// Returns an error if the store cannot be opened.
pub async fn open(args: &StoreArgs, reset: bool) -> Result<Arc<dyn GraphStore>> {
    connect(args, reset, true).await
}

/// Connect to a store that must already exist
///
/// A missing SQLite file is an error and is not created.
///
/// # Errors
/// Returns an error if the store cannot be opened.
pub async fn open_existing(args: &StoreArgs) -> Result<Arc<dyn GraphStore>> {
    connect(args, false, false).await
}

async fn connect(
    args: &StoreArgs,
    reset: bool,
    create_if_missing: bool,
) -> Result<Arc<dyn GraphStore>> {
    if let Some(uri) = &args.neo4j_uri {
        let password = args
            .neo4j_password
            .as_deref()
            .context("--neo4j-password is required with --neo4j-uri")?;
        info!("Connecting to Neo4j at {}", uri);
        let config = Neo4jConfig::new(uri, &args.neo4j_user, password);
        let store = Neo4jStore::connect(&config)
            .await
            .with_context(|| format!("connecting to {uri}"))?;
        if reset {
            store.reset().await?;
        }
        return Ok(Arc::new(store));
    }

    info!("Using SQLite cache {}", args.database.display());
    let config = SqliteConfig::new(&args.database)
        .with_reset(reset)
        .with_create_if_missing(create_if_missing);
    let store = SqliteStore::open(&config)
        .await
        .with_context(|| format!("opening {}", args.database.display()))?;
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests;
