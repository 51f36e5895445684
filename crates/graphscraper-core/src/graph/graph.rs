//! Graph that loads nodes and edges on demand

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info};

use super::edge_list::EdgeList;
use super::events::{GraphEvent, EVENT_CAPACITY};
use super::model::{Edge, EdgeKey, Node, NodeIndex, DEFAULT_WEIGHT};
use super::node_list::NodeList;
use super::GraphError;
use crate::source::NeighborSource;
use crate::store::{normalize_name, GraphStore, SqliteStore, StoredNeighbor};

/// Undirected graph backed by a store and a remote source
///
/// The neighbors of a node are fetched from the source the first time they
/// are requested, written to the store, and from then on read from the
/// store only.
pub struct Graph {
    store: Arc<dyn GraphStore>,
    source: Arc<dyn NeighborSource>,
    nodes: NodeList,
    edges: EdgeList,
    events: broadcast::Sender<GraphEvent>,
}

impl Graph {
    /// Create an empty graph over `store` and `source`
    #[must_use]
    pub fn new(store: Arc<dyn GraphStore>, source: Arc<dyn NeighborSource>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            source,
            nodes: NodeList::default(),
            edges: EdgeList::default(),
            events,
        }
    }

    /// Create a graph caching into a private in-memory SQLite database
    ///
    /// # Errors
    /// Returns an error if the database cannot be created.
    pub async fn in_memory(source: Arc<dyn NeighborSource>) -> Result<Self, GraphError> {
        let store = SqliteStore::in_memory().await?;
        Ok(Self::new(Arc::new(store), source))
    }

    #[must_use]
    pub fn store(&self) -> &dyn GraphStore {
        self.store.as_ref()
    }

    #[must_use]
    pub fn source(&self) -> &dyn NeighborSource {
        self.source.as_ref()
    }

    #[must_use]
    pub fn nodes(&self) -> &NodeList {
        &self.nodes
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Local lookup; never touches the store
    #[must_use]
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.by_name(name)
    }

    /// The edge connecting `a` and `b` in either orientation
    #[must_use]
    pub fn edge(&self, a: NodeIndex, b: NodeIndex) -> Option<&Edge> {
        self.edges.get(a, b)
    }

    /// Every edge currently in memory, ordered by key
    #[must_use]
    pub fn edges(&self) -> Vec<&Edge> {
        self.edges.sorted()
    }

    /// Receive the events the graph dispatches from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GraphEvent> {
        self.events.subscribe()
    }

    /// Add a node unless it already exists locally or in the store
    ///
    /// Blank names are ignored. Returns the index of the new or existing node.
    ///
    /// # Errors
    /// Returns an error if the store or the source fails.
    pub async fn add_node(
        &mut self,
        name: &str,
        external_id: Option<&str>,
    ) -> Result<Option<NodeIndex>, GraphError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        if let Some(index) = self.find_node(name).await? {
            return Ok(Some(index));
        }

        let index = self
            .internal_add_node(name.to_string(), external_id.map(str::to_string), false, true)
            .await?;
        Ok(Some(index))
    }

    /// Find a node in memory or, failing that, in the store
    ///
    /// A node found in the store is added to the graph.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub async fn find_node(&mut self, name: &str) -> Result<Option<NodeIndex>, GraphError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        if let Some(index) = self.nodes.index_of(name) {
            return Ok(Some(index));
        }

        match self.store.find_node(name).await? {
            Some(stored) => {
                let index = self
                    .internal_add_node(
                        stored.name,
                        stored.external_id,
                        stored.are_neighbors_cached,
                        false,
                    )
                    .await?;
                Ok(Some(index))
            }
            None => Ok(None),
        }
    }

    /// Like [`Graph::find_node`], but validates unknown names with the
    /// source and creates the node if it exists remotely
    ///
    /// `external_id` is only used when a new node is created. Neighbors are
    /// never loaded here.
    ///
    /// # Errors
    /// Returns an error if the store or the source fails, or if the source
    /// requires an external ID that cannot be resolved.
    pub async fn find_or_load_node(
        &mut self,
        name: &str,
        external_id: Option<&str>,
    ) -> Result<Option<NodeIndex>, GraphError> {
        if let Some(index) = self.find_node(name).await? {
            return Ok(Some(index));
        }

        let Some(authentic) = self.authentic_node_name(name).await? else {
            debug!("No node matches {:?}", name);
            return Ok(None);
        };

        // The authentic name may differ from `name` and be known already.
        if let Some(index) = self.find_node(&authentic).await? {
            return Ok(Some(index));
        }

        let index = self
            .internal_add_node(authentic, external_id.map(str::to_string), false, true)
            .await?;
        Ok(Some(index))
    }

    /// The exact name of the node matching `name`, if such a node exists
    ///
    /// Sources that do not resolve names fall back to [`Graph::find_node`].
    ///
    /// # Errors
    /// Returns an error if the store or the source fails.
    pub async fn authentic_node_name(&mut self, name: &str) -> Result<Option<String>, GraphError> {
        if self.source.resolves_names() {
            return Ok(self.source.authentic_name(name).await?);
        }

        let index = self.find_node(name).await?;
        Ok(index.and_then(|index| self.nodes.get(index).map(|node| node.name().to_string())))
    }

    /// Whether a node matching `name` exists, locally or remotely
    ///
    /// # Errors
    /// Returns an error if the store or the source fails.
    pub async fn node_exists(&mut self, name: &str) -> Result<bool, GraphError> {
        Ok(self.authentic_node_name(name).await?.is_some())
    }

    /// Connect two nodes and write the edge to the store
    ///
    /// Unknown indices, loops and already connected pairs are ignored.
    ///
    /// # Errors
    /// Returns an error if the weight is not a finite positive number or
    /// the store fails.
    pub async fn add_edge(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        weight: f64,
    ) -> Result<(), GraphError> {
        self.insert_edge(source, target, weight, true).await
    }

    /// The edge connecting the named nodes, looking the names up like
    /// [`Graph::find_node`]
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub async fn edge_by_name(
        &mut self,
        source_name: &str,
        target_name: &str,
    ) -> Result<Option<Edge>, GraphError> {
        let Some(source) = self.find_node(source_name).await? else {
            return Ok(None);
        };
        let Some(target) = self.find_node(target_name).await? else {
            return Ok(None);
        };
        Ok(self.edges.get(source, target).copied())
    }

    /// The neighbors of a node, loading them if necessary
    ///
    /// # Errors
    /// Returns an error if the index is unknown or loading fails.
    pub async fn neighbors(&mut self, index: NodeIndex) -> Result<Vec<NodeIndex>, GraphError> {
        self.load_neighbors(index).await?;
        let node = self.node_or_err(index)?;
        Ok(node.edge_keys().iter().map(|key| key.other(index)).collect())
    }

    /// The degree of a node, loading its neighbors if necessary
    ///
    /// # Errors
    /// Returns an error if the index is unknown or loading fails.
    pub async fn degree(&mut self, index: NodeIndex) -> Result<usize, GraphError> {
        self.load_neighbors(index).await?;
        Ok(self.node_or_err(index)?.edge_keys().len())
    }

    fn node_or_err(&self, index: NodeIndex) -> Result<&Node, GraphError> {
        self.nodes.get(index).ok_or(GraphError::UnknownNode(index))
    }

    fn node_mut_or_err(&mut self, index: NodeIndex) -> Result<&mut Node, GraphError> {
        self.nodes
            .get_mut(index)
            .ok_or(GraphError::UnknownNode(index))
    }

    /// Add a node unless its normalized name is already in memory
    ///
    /// The store is not consulted.
    async fn internal_add_node(
        &mut self,
        name: String,
        external_id: Option<String>,
        are_neighbors_cached: bool,
        add_to_cache: bool,
    ) -> Result<NodeIndex, GraphError> {
        // Sources may hand back padded names; memory and store share one form.
        let name = normalize_name(&name)?.to_string();
        if let Some(index) = self.nodes.index_of(&name) {
            return Ok(index);
        }

        let external_id = match external_id {
            Some(id) => Some(id),
            None => self.source.resolve_external_id(&name).await?,
        };
        if external_id.is_none() && self.source.requires_external_id() {
            return Err(GraphError::MissingExternalId(name));
        }

        if add_to_cache {
            self.store
                .insert_node(&name, external_id.as_deref())
                .await?;
        }

        let index = self.nodes.push(name, external_id, are_neighbors_cached);
        debug!("Added node {} as {}", self.node_or_err(index)?.name(), index);
        Ok(index)
    }

    async fn insert_edge(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        weight: f64,
        save_to_cache: bool,
    ) -> Result<(), GraphError> {
        if source == target {
            return Ok(());
        }
        let (Some(source_node), Some(target_node)) = (self.nodes.get(source), self.nodes.get(target))
        else {
            debug!("Ignoring edge {} - {}: unknown endpoint", source, target);
            return Ok(());
        };
        if self.edges.get(source, target).is_some() {
            return Ok(());
        }

        let edge = Edge::new(source, target, weight)?;

        if save_to_cache {
            self.store
                .upsert_edge(source_node.name(), target_node.name(), weight)
                .await?;
        }

        self.edges.insert(edge);
        let key = EdgeKey::new(source, target);
        for (node, neighbor) in [(source, target), (target, source)] {
            if self.node_mut_or_err(node)?.attach(key) {
                // Sending fails only when nobody is subscribed.
                let _ = self.events.send(GraphEvent::NeighborAdded { node, neighbor });
            }
        }
        Ok(())
    }

    async fn load_neighbors(&mut self, index: NodeIndex) -> Result<(), GraphError> {
        if !self.node_or_err(index)?.are_neighbors_cached {
            self.load_neighbors_from_source(index).await?;

            let name = self.node_or_err(index)?.name().to_string();
            self.store.mark_neighbors_cached(&name).await?;
            self.node_mut_or_err(index)?.are_neighbors_cached = true;
        }

        if !self.node_or_err(index)?.are_neighbors_loaded {
            self.load_neighbors_from_store(index).await?;
        }
        Ok(())
    }

    async fn load_neighbors_from_source(&mut self, index: NodeIndex) -> Result<(), GraphError> {
        let seeds = {
            let node = self.node_or_err(index)?;
            self.source.neighbors(node).await?
        };
        info!(
            "Fetched {} neighbors of {} from source",
            seeds.len(),
            self.node_or_err(index)?.name()
        );

        for seed in seeds {
            let neighbor = self
                .find_or_load_node(&seed.name, seed.external_id.as_deref())
                .await?;
            if let Some(neighbor) = neighbor {
                self.add_edge(index, neighbor, DEFAULT_WEIGHT).await?;
            }
        }
        Ok(())
    }

    async fn load_neighbors_from_store(&mut self, index: NodeIndex) -> Result<(), GraphError> {
        let name = self.node_or_err(index)?.name().to_string();
        let stored = self.store.neighbors(&name).await?;

        for StoredNeighbor { node, weight } in stored {
            let neighbor = match self.nodes.index_of(&node.name) {
                Some(neighbor) => neighbor,
                None => {
                    self.internal_add_node(
                        node.name,
                        node.external_id,
                        node.are_neighbors_cached,
                        false,
                    )
                    .await?
                }
            };
            self.insert_edge(index, neighbor, weight, false).await?;
        }

        self.node_mut_or_err(index)?.are_neighbors_loaded = true;
        Ok(())
    }
}
