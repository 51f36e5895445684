//! Spotify command: Resolve artists and print their related artists

use std::sync::Arc;

use anyhow::Result;
use graphscraper_core::graph::{Graph, GraphError, NodeIndex};
use graphscraper_core::source::{SpotifyArtistSource, SpotifyClient, SpotifyConfig};
use tracing::{info, warn};

use crate::StoreArgs;

/// An artist as cached in the graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub name: String,
    pub spotify_id: Option<String>,
}

/// Outcome of one queried name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistReport {
    pub query: String,
    /// The matching artist and its related artists, if one was found
    pub found: Option<(Artist, Vec<Artist>)>,
}

/// Client configuration for the public Spotify endpoints
#[must_use]
pub fn config(client_id: &str, client_secret: &str) -> SpotifyConfig {
    SpotifyConfig::new(client_id, client_secret)
}

/// Run the spotify command
///
/// # Errors
/// Returns an error if the store cannot be opened or Spotify fails.
pub async fn run(
    artists: &[String],
    config: SpotifyConfig,
    neighbors: usize,
    store: &StoreArgs,
    reset: bool,
) -> Result<()> {
    let store = super::store::open(store, reset).await?;
    let source = SpotifyArtistSource::new(SpotifyClient::new(config)?, neighbors);
    let mut graph = Graph::new(store, Arc::new(source));

    for report in query_artists(&mut graph, artists).await? {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ArtistReport) {
    let Some((artist, related)) = &report.found else {
        println!("Artist not found for queried name: {}", report.query);
        return;
    };

    println!(
        "Queried name: {} | Artist name: {} | Spotify ID: {}",
        report.query,
        artist.name,
        artist.spotify_id.as_deref().unwrap_or("-")
    );
    println!("Neighbors:");
    for neighbor in related {
        println!(
            "  - {}, {}",
            neighbor.name,
            neighbor.spotify_id.as_deref().unwrap_or("-")
        );
    }
}

fn artist(graph: &Graph, index: NodeIndex) -> Option<Artist> {
    graph.node(index).map(|node| Artist {
        name: node.name().to_string(),
        spotify_id: node.external_id().map(str::to_string),
    })
}

/// Resolve every name in `queries` and load its related artists
///
/// Names without an exact Spotify match are reported as not found.
///
/// # Errors
/// Returns an error if the store or Spotify fails.
pub async fn query_artists(graph: &mut Graph, queries: &[String]) -> Result<Vec<ArtistReport>> {
    let mut reports = Vec::with_capacity(queries.len());

    for query in queries {
        info!("Querying {}", query);
        let index = match graph.find_or_load_node(query, None).await {
            Ok(index) => index,
            Err(GraphError::MissingExternalId(name)) => {
                warn!("No Spotify ID found for {}", name);
                None
            }
            Err(e) => return Err(e.into()),
        };

        let found = match index {
            Some(index) => {
                let neighbors = graph.neighbors(index).await?;
                let graph: &Graph = graph;
                let related = neighbors
                    .into_iter()
                    .filter_map(|neighbor| artist(graph, neighbor))
                    .collect();
                artist(graph, index).map(|artist| (artist, related))
            }
            None => None,
        };

        reports.push(ArtistReport {
            query: query.clone(),
            found,
        });
    }

    Ok(reports)
}
