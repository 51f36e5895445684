//! Spotify Web API client using the Client Credentials flow

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::source::{NodeSeed, SourceError};

const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const GRANT_TYPE: &str = "client_credentials";

/// Tokens expiring sooner than this are refreshed before use
const REFRESH_THRESHOLD: Duration = Duration::from_secs(60);

const DEFAULT_SEARCH_LIMIT: u32 = 5;

/// Configuration for the Spotify client
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_base: String,
    pub token_url: String,
}

impl SpotifyConfig {
    /// Configuration for the public Spotify endpoints
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }

    /// Override the Web API base URL
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the token endpoint
    #[must_use]
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now()
            .checked_add(REFRESH_THRESHOLD)
            .is_some_and(|threshold| self.expires_at > threshold)
    }
}

#[derive(Debug, Deserialize)]
struct ArtistItem {
    name: Option<String>,
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArtistPage {
    items: Vec<ArtistItem>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    artists: ArtistPage,
}

#[derive(Debug, Deserialize)]
struct RelatedArtistsResponse {
    artists: Vec<ArtistItem>,
}

fn into_seeds(items: Vec<ArtistItem>) -> Result<Vec<NodeSeed>, SourceError> {
    items
        .into_iter()
        .map(|item| match (item.name, item.id) {
            (Some(name), Some(id)) => Ok(NodeSeed::new(name, Some(id))),
            _ => Err(SourceError::InvalidItem("Name or ID is missing".to_string())),
        })
        .collect()
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<Option<T>, SourceError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(body)
        .map(Some)
        .map_err(|e| SourceError::Backend(format!("spotify parse: {e}")))
}

/// Spotify Web API client
pub struct SpotifyClient {
    http: Client,
    config: SpotifyConfig,
    token: Mutex<Option<AccessToken>>,
}

impl SpotifyClient {
    /// Create a client; no request is made until the first query
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: SpotifyConfig) -> Result<Self, SourceError> {
        let http = Client::builder().timeout(Duration::from_secs(20)).build()?;
        Ok(Self {
            http,
            config,
            token: Mutex::new(None),
        })
    }

    /// A valid access token, requesting a new one if needed
    ///
    /// # Errors
    /// Returns an error if the token request fails.
    pub async fn access_token(&self) -> Result<String, SourceError> {
        let mut token = self.token.lock().await;
        if let Some(current) = token.as_ref().filter(|t| t.is_fresh()) {
            return Ok(current.value.clone());
        }

        let fresh = self.request_token().await?;
        let value = fresh.value.clone();
        *token = Some(fresh);
        Ok(value)
    }

    async fn request_token(&self) -> Result<AccessToken, SourceError> {
        debug!("Requesting Spotify access token");
        let response: TokenResponse = self
            .http
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", GRANT_TYPE)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let expires_at = Instant::now()
            .checked_add(Duration::from_secs(response.expires_in))
            .ok_or_else(|| {
                SourceError::InvalidItem(format!(
                    "token lifetime out of range: {}s",
                    response.expires_in
                ))
            })?;

        Ok(AccessToken {
            value: response.access_token,
            expires_at,
        })
    }

    /// Artists matching `artist_name`, best match first
    ///
    /// # Errors
    /// Returns an error if the request fails or an item lacks a name or ID.
    pub async fn search_artists(&self, artist_name: &str) -> Result<Vec<NodeSeed>, SourceError> {
        self.search_artists_with_limit(artist_name, DEFAULT_SEARCH_LIMIT)
            .await
    }

    /// Artists matching `artist_name`, at most `limit` of them
    ///
    /// # Errors
    /// Returns an error if the request fails or an item lacks a name or ID.
    #[instrument(level = "debug", skip(self))]
    pub async fn search_artists_with_limit(
        &self,
        artist_name: &str,
        limit: u32,
    ) -> Result<Vec<NodeSeed>, SourceError> {
        let token = self.access_token().await?;
        let limit = limit.to_string();
        let body = self
            .http
            .get(format!("{}/search", self.config.api_base))
            .bearer_auth(token)
            .query(&[("q", artist_name), ("type", "artist"), ("limit", limit.as_str())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        match parse_body::<SearchResponse>(&body)? {
            Some(response) => into_seeds(response.artists.items),
            None => Ok(Vec::new()),
        }
    }

    /// Artists Spotify considers similar to the one with `artist_id`
    ///
    /// # Errors
    /// Returns an error if the request fails or an item lacks a name or ID.
    #[instrument(level = "debug", skip(self))]
    pub async fn related_artists(&self, artist_id: &str) -> Result<Vec<NodeSeed>, SourceError> {
        let token = self.access_token().await?;
        let body = self
            .http
            .get(format!(
                "{}/artists/{}/related-artists",
                self.config.api_base, artist_id
            ))
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        match parse_body::<RelatedArtistsResponse>(&body)? {
            Some(response) => into_seeds(response.artists),
            None => Ok(Vec::new()),
        }
    }
}
