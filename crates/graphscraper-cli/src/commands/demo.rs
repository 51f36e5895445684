//! Demo command: Compare a random graph with its lazily loaded view

use std::sync::Arc;

use anyhow::Result;
use graphscraper_core::graph::Graph;
use graphscraper_core::source::{NeighborSource, StaticGraphSource};
use petgraph::graph::NodeIndex as VertexIndex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

/// Names looked up through the source before loading anything
const LOOKUP_KEYS: [&str; 3] = ["Joe", "1", "Node-22"];

#[derive(Debug, Clone)]
pub struct DemoOptions {
    pub nodes: usize,
    pub probability: f64,
    pub named: bool,
    pub seed: Option<u64>,
    pub vertex: usize,
}

/// What the demo observed
#[derive(Debug, Clone, PartialEq)]
pub struct DemoReport {
    /// Each lookup key and the authentic name the source resolved it to
    pub lookups: Vec<(String, Option<String>)>,
    /// Name of the compared vertex, if it exists
    pub vertex_name: Option<String>,
    /// Neighbor labels read directly from the random graph
    pub raw_neighbors: Vec<String>,
    /// Neighbor names seen through the cached graph
    pub cached_neighbors: Vec<String>,
}

/// Run the demo command
///
/// # Errors
/// Returns an error if the cached graph fails.
pub async fn run(options: &DemoOptions) -> Result<()> {
    let report = build_report(options).await?;

    for (key, name) in &report.lookups {
        println!("Name of {}: {}", key, name.as_deref().unwrap_or("<none>"));
    }

    let Some(vertex_name) = &report.vertex_name else {
        println!("The graph has no vertex {}", options.vertex);
        return Ok(());
    };
    println!("Node name for {}: {}", options.vertex, vertex_name);

    println!("Random graph neighbors:");
    for (i, name) in report.raw_neighbors.iter().enumerate() {
        println!("  - Neighbor {i}: {name}");
    }
    println!("Cached graph neighbors:");
    for (i, name) in report.cached_neighbors.iter().enumerate() {
        println!("  - Neighbor {i}: {name}");
    }
    Ok(())
}

/// Build the random graph, wrap it and collect what the demo prints
///
/// # Errors
/// Returns an error if the cached graph fails.
pub async fn build_report(options: &DemoOptions) -> Result<DemoReport> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let source = Arc::new(StaticGraphSource::erdos_renyi(
        options.nodes,
        options.probability,
        options.named,
        &mut rng,
    ));
    info!(
        "Random graph with {} vertices and {} edges",
        source.wrapped_graph().node_count(),
        source.wrapped_graph().edge_count()
    );

    let mut lookups = Vec::with_capacity(LOOKUP_KEYS.len());
    for key in LOOKUP_KEYS {
        lookups.push((key.to_string(), source.authentic_name(key).await?));
    }

    let mut report = DemoReport {
        lookups,
        vertex_name: None,
        raw_neighbors: Vec::new(),
        cached_neighbors: Vec::new(),
    };
    if options.vertex >= source.wrapped_graph().node_count() {
        return Ok(report);
    }

    let vertex = VertexIndex::new(options.vertex);
    report.raw_neighbors = source
        .adjacent(vertex)
        .into_iter()
        .map(|neighbor| source.label(neighbor))
        .collect();

    let mut graph = Graph::in_memory(source.clone()).await?;
    let vertex_name = source.label(vertex);
    if let Some(index) = graph.find_or_load_node(&vertex_name, None).await? {
        for neighbor in graph.neighbors(index).await? {
            if let Some(node) = graph.node(neighbor) {
                report.cached_neighbors.push(node.name().to_string());
            }
        }
    }
    report.vertex_name = Some(vertex_name);
    Ok(report)
}

#[cfg(test)]
mod tests;
