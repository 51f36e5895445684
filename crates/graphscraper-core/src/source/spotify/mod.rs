//! Spotify artist graph: artists are nodes, related artists are neighbors

mod client;
mod source;

pub use client::{SpotifyClient, SpotifyConfig};
pub use source::SpotifyArtistSource;

#[cfg(test)]
mod tests;
