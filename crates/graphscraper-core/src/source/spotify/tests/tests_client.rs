//! Tests for SpotifyClient against a mock server

#![allow(clippy::unwrap_used)]

use mockito::{Matcher, Server};

use super::{client_for, mock_token};
use crate::source::spotify::SpotifyConfig;
use crate::source::{NodeSeed, SourceError};

const SEARCH_BODY: &str = r#"{
  "artists": {
    "items": [
      {"name": "Nina Simone", "id": "nina", "popularity": 70},
      {"name": "Nina Hagen", "id": "hagen"}
    ]
  }
}"#;

#[test]
fn test_config_defaults_and_overrides() {
    let config = SpotifyConfig::new("id", "secret");
    assert_eq!(config.api_base, "https://api.spotify.com/v1");
    assert_eq!(config.token_url, "https://accounts.spotify.com/api/token");

    let config = config.with_api_base("http://localhost:9000/v1///");
    assert_eq!(config.api_base, "http://localhost:9000/v1");
}

#[tokio::test]
async fn test_token_is_requested_once() {
    let mut server = Server::new_async().await;
    let token = mock_token(&mut server, 1).await;
    let client = client_for(&server);

    assert_eq!(client.access_token().await.unwrap(), "tok");
    assert_eq!(client.access_token().await.unwrap(), "tok");

    token.assert_async().await;
}

#[tokio::test]
async fn test_short_lived_token_is_refreshed() {
    let mut server = Server::new_async().await;
    let token = server
        .mock("POST", "/api/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"short","expires_in":30}"#)
        .expect(2)
        .create_async()
        .await;
    let client = client_for(&server);

    client.access_token().await.unwrap();
    client.access_token().await.unwrap();

    token.assert_async().await;
}

#[tokio::test]
async fn test_token_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/token")
        .with_status(401)
        .create_async()
        .await;
    let client = client_for(&server);

    let result = client.access_token().await;
    assert!(matches!(result, Err(SourceError::Http(_))));
}

#[tokio::test]
async fn test_search_artists() {
    let mut server = Server::new_async().await;
    mock_token(&mut server, 1).await;
    let search = server
        .mock("GET", "/v1/search")
        .match_header("authorization", "Bearer tok")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "nina".into()),
            Matcher::UrlEncoded("type".into(), "artist".into()),
            Matcher::UrlEncoded("limit".into(), "5".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SEARCH_BODY)
        .create_async()
        .await;
    let client = client_for(&server);

    let artists = client.search_artists("nina").await.unwrap();

    assert_eq!(
        artists,
        vec![
            NodeSeed::new("Nina Simone", Some("nina".to_string())),
            NodeSeed::new("Nina Hagen", Some("hagen".to_string())),
        ]
    );
    search.assert_async().await;
}

#[tokio::test]
async fn test_search_with_custom_limit() {
    let mut server = Server::new_async().await;
    mock_token(&mut server, 1).await;
    let search = server
        .mock("GET", "/v1/search")
        .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
        .with_status(200)
        .with_body(r#"{"artists":{"items":[]}}"#)
        .create_async()
        .await;
    let client = client_for(&server);

    let artists = client.search_artists_with_limit("x", 1).await.unwrap();

    assert!(artists.is_empty());
    search.assert_async().await;
}

#[tokio::test]
async fn test_empty_body_means_no_artists() {
    let mut server = Server::new_async().await;
    mock_token(&mut server, 1).await;
    server
        .mock("GET", "/v1/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("")
        .create_async()
        .await;
    let client = client_for(&server);

    assert!(client.search_artists("anyone").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_item_without_id_is_rejected() {
    let mut server = Server::new_async().await;
    mock_token(&mut server, 1).await;
    server
        .mock("GET", "/v1/artists/nina/related-artists")
        .with_status(200)
        .with_body(r#"{"artists":[{"name":"Odetta","id":"odetta"},{"name":"Anon"}]}"#)
        .create_async()
        .await;
    let client = client_for(&server);

    let result = client.related_artists("nina").await;

    assert!(matches!(
        result,
        Err(SourceError::InvalidItem(message)) if message == "Name or ID is missing"
    ));
}

#[tokio::test]
async fn test_malformed_body() {
    let mut server = Server::new_async().await;
    mock_token(&mut server, 1).await;
    server
        .mock("GET", "/v1/artists/nina/related-artists")
        .with_status(200)
        .with_body("{not json")
        .create_async()
        .await;
    let client = client_for(&server);

    let result = client.related_artists("nina").await;
    assert!(matches!(result, Err(SourceError::Backend(_))));
}

#[tokio::test]
async fn test_error_status() {
    let mut server = Server::new_async().await;
    mock_token(&mut server, 1).await;
    server
        .mock("GET", "/v1/artists/gone/related-artists")
        .with_status(404)
        .create_async()
        .await;
    let client = client_for(&server);

    let result = client.related_artists("gone").await;
    assert!(matches!(result, Err(SourceError::Http(_))));
}

#[tokio::test]
async fn test_token_lifetime_out_of_range() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"tok","expires_in":18446744073709551615}"#)
        .create_async()
        .await;
    let client = client_for(&server);

    let result = client.access_token().await;

    assert!(matches!(result, Err(SourceError::InvalidItem(message)) if message.contains("out of range")));
}
