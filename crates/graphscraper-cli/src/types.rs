//! Command line definitions shared between main and library

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "graphscraper")]
#[command(author, version, about = "Graphs loaded on demand and cached in a database", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Wrap a random graph and compare it with its cached view
    Demo {
        /// Number of vertices
        #[arg(long, default_value_t = 50)]
        nodes: usize,

        /// Probability of an edge between any two vertices
        #[arg(long, default_value_t = 0.2)]
        probability: f64,

        /// Name the vertices `Node-{i}`
        #[arg(long)]
        named: bool,

        /// Seed for the random graph
        #[arg(long)]
        seed: Option<u64>,

        /// Index of the vertex whose neighbors are compared
        #[arg(long, default_value_t = 5)]
        vertex: usize,
    },

    /// Look up artists and their related artists on Spotify
    Spotify {
        /// Artist names to query
        #[arg(required = true)]
        artists: Vec<String>,

        /// Spotify application client ID
        #[arg(long, env = "SPOTIFY_CLIENT_ID")]
        client_id: String,

        /// Spotify application client secret
        #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
        client_secret: String,

        /// Related artists loaded per artist (0 selects the default)
        #[arg(long, default_value_t = 0)]
        neighbors: usize,

        /// Clear the cache before querying
        #[arg(long)]
        reset: bool,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Print the cached neighbors of a node
    Neighbors {
        /// Node name
        name: String,

        #[command(flatten)]
        store: StoreArgs,
    },
}

/// Where the graph is cached
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// SQLite database file
    #[arg(long, default_value = "graphscraper.db", conflicts_with = "neo4j_uri")]
    pub database: PathBuf,

    /// Neo4j connection URI; selects Neo4j instead of SQLite
    #[arg(long, requires = "neo4j_password")]
    pub neo4j_uri: Option<String>,

    /// Neo4j username
    #[arg(long, default_value = "neo4j")]
    pub neo4j_user: String,

    /// Neo4j password
    #[arg(long, env = "NEO4J_PASSWORD", hide_env_values = true)]
    pub neo4j_password: Option<String>,
}
