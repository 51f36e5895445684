//! Neighbor source over the Spotify related-artists API

use async_trait::async_trait;
use tracing::debug;

use super::client::SpotifyClient;
use crate::graph::Node;
use crate::source::{NeighborSource, NodeSeed, SourceError};

/// Number of related artists loaded per node when none is configured
const DEFAULT_NEIGHBOR_COUNT: usize = 6;

/// Loads artists and their related artists from Spotify
///
/// Every node is identified by its Spotify artist ID, so nodes whose ID
/// cannot be resolved are rejected.
pub struct SpotifyArtistSource {
    client: SpotifyClient,
    neighbor_count: usize,
}

impl SpotifyArtistSource {
    /// `neighbor_count == 0` selects the default of six
    #[must_use]
    pub fn new(client: SpotifyClient, neighbor_count: usize) -> Self {
        Self {
            client,
            neighbor_count,
        }
    }

    #[must_use]
    pub fn client(&self) -> &SpotifyClient {
        &self.client
    }

    /// The number of neighbors loaded for any given node
    #[must_use]
    pub fn neighbor_count(&self) -> usize {
        if self.neighbor_count > 0 {
            self.neighbor_count
        } else {
            DEFAULT_NEIGHBOR_COUNT
        }
    }
}

#[async_trait]
impl NeighborSource for SpotifyArtistSource {
    async fn authentic_name(&self, name: &str) -> Result<Option<String>, SourceError> {
        let items = self.client.search_artists(name).await?;
        Ok(items.into_iter().next().map(|item| item.name))
    }

    fn resolves_names(&self) -> bool {
        true
    }

    async fn neighbors(&self, node: &Node) -> Result<Vec<NodeSeed>, SourceError> {
        let artist_id = node.external_id().ok_or_else(|| {
            SourceError::Backend(format!("artist {:?} has no Spotify ID", node.name()))
        })?;

        let mut items = self.client.related_artists(artist_id).await?;
        items.truncate(self.neighbor_count());
        debug!("Loaded {} related artists for {}", items.len(), node.name());
        Ok(items)
    }

    async fn resolve_external_id(&self, name: &str) -> Result<Option<String>, SourceError> {
        let items = self.client.search_artists(name).await?;
        Ok(items
            .into_iter()
            .find(|item| item.name == name)
            .and_then(|item| item.external_id))
    }

    fn requires_external_id(&self) -> bool {
        true
    }
}
