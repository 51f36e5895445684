//! Neighbors command: Print what the cache knows about a node

use anyhow::Result;
use graphscraper_core::store::{GraphStore, StoredNeighbor, StoredNode};
use tracing::info;

use crate::StoreArgs;

/// Run the neighbors command
///
/// # Errors
/// Returns an error if the store cannot be read.
pub async fn run(name: &str, args: &StoreArgs) -> Result<()> {
    let store = super::store::open_existing(args).await?;

    let Some((node, neighbors)) = lookup(store.as_ref(), name).await? else {
        println!("No cached node named '{}'", name.trim());
        return Ok(());
    };

    println!(
        "{} (external ID: {}, neighbors cached: {})",
        node.name,
        node.external_id.as_deref().unwrap_or("-"),
        node.are_neighbors_cached
    );
    println!("\n{:<40} {:<30} WEIGHT", "NAME", "EXTERNAL ID");
    println!("{}", "-".repeat(80));
    for neighbor in &neighbors {
        println!(
            "{:<40} {:<30} {}",
            neighbor.node.name,
            neighbor.node.external_id.as_deref().unwrap_or("-"),
            neighbor.weight
        );
    }
    println!("\n{} neighbors", neighbors.len());
    Ok(())
}

/// A stored node and its stored neighbors ordered by name
///
/// # Errors
/// Returns an error if the store cannot be read.
pub async fn lookup(
    store: &dyn GraphStore,
    name: &str,
) -> Result<Option<(StoredNode, Vec<StoredNeighbor>)>> {
    let name = name.trim();
    let Some(node) = store.find_node(name).await? else {
        return Ok(None);
    };

    let mut neighbors = store.neighbors(&node.name).await?;
    neighbors.sort_by(|a, b| a.node.name.cmp(&b.node.name));
    info!("{} has {} cached neighbors", node.name, neighbors.len());
    Ok(Some((node, neighbors)))
}
