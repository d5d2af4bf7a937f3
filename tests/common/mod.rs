//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::path::Path;

use serde_json::{Value, json};
use spotinsights::{
    config::SpotifyConfig,
    management::TokenManager,
    spotify::SpotifyClient,
    types::AuthResponse,
};
use wiremock::MockServer;

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";

/// Configuration pointing both the accounts service and the Web API at the
/// mock server. The API lives below `/v1`.
pub fn spotify_config(server: &MockServer) -> SpotifyConfig {
    SpotifyConfig {
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
        scopes: vec!["user-top-read".to_string()],
        accounts_url: server.uri(),
        api_url: format!("{}/v1", server.uri()),
    }
}

pub fn auth_response(access: &str, refresh: Option<&str>, expires_in: u64) -> AuthResponse {
    AuthResponse {
        access_token: access.to_string(),
        token_type: "Bearer".to_string(),
        expires_in,
        refresh_token: refresh.map(str::to_string),
        scope: "user-top-read".to_string(),
    }
}

/// Token store at `dir/token.json`, pre-filled when `token` is given.
///
/// An `expires_in` of 0 yields a token that is already considered expired.
pub async fn token_store(dir: &Path, token: Option<AuthResponse>) -> TokenManager {
    let mut tokens = TokenManager::new(dir.join("token.json"));
    if let Some(token) = token {
        tokens.save_tokens(token).await.unwrap();
    }
    tokens
}

pub async fn client(server: &MockServer, dir: &Path, token: Option<AuthResponse>) -> SpotifyClient {
    let tokens = token_store(dir, token).await;
    SpotifyClient::new(&spotify_config(server), tokens).unwrap()
}

/// Token endpoint response body.
pub fn token_json(access: &str, refresh: Option<&str>) -> Value {
    let mut body = json!({
        "access_token": access,
        "token_type": "Bearer",
        "expires_in": 3600,
        "scope": "user-top-read"
    });
    if let Some(refresh) = refresh {
        body["refresh_token"] = json!(refresh);
    }
    body
}

pub fn track_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "duration_ms": 180000,
        "popularity": 70,
        "preview_url": null,
        "explicit": false,
        "external_urls": {"spotify": format!("https://open.spotify.com/track/{}", id)},
        "album": {
            "id": format!("album-{}", id),
            "name": "Album",
            "release_date": "2024-01-01",
            "images": [{"url": "https://i.scdn.co/image/1", "height": 640, "width": 640}],
            "external_urls": {}
        },
        "artists": [{"id": "artist-1", "name": "Artist", "external_urls": {}}]
    })
}

pub fn artist_json(id: &str, name: &str, genres: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "genres": genres,
        "images": [],
        "popularity": 60,
        "followers": {"href": null, "total": 1000},
        "external_urls": {"spotify": format!("https://open.spotify.com/artist/{}", id)}
    })
}

pub fn page(items: Vec<Value>) -> Value {
    json!({
        "total": items.len(),
        "limit": 50,
        "offset": 0,
        "next": null,
        "items": items
    })
}
