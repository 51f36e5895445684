mod tests_client;

use mockito::{Mock, ServerGuard};

use super::{SpotifyClient, SpotifyConfig};

pub(super) const TOKEN_BODY: &str = r#"{"access_token":"tok","token_type":"Bearer","expires_in":3600}"#;

/// Token endpoint mock that must be hit `hits` times
pub(super) async fn mock_token(server: &mut ServerGuard, hits: usize) -> Mock {
    server
        .mock("POST", "/api/token")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(mockito::Matcher::UrlEncoded(
            "grant_type".into(),
            "client_credentials".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TOKEN_BODY)
        .expect(hits)
        .create_async()
        .await
}

pub(super) fn client_for(server: &ServerGuard) -> SpotifyClient {
    let config = SpotifyConfig::new("client", "secret")
        .with_api_base(format!("{}/v1/", server.url()))
        .with_token_url(format!("{}/api/token", server.url()));
    SpotifyClient::new(config).unwrap()
}
