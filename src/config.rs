//! Configuration management for spotinsights.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage the Spotify and Last.fm credentials, the local callback server and
//! the data directory.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, io::ErrorKind, path::PathBuf};

use crate::error::{Error, Res};

/// Directory name used below the platform data directory.
pub const APP_NAME: &str = "spotinsights";

/// Scopes requested during authorization when `SPOTIFY_API_SCOPE` is unset.
pub const DEFAULT_SCOPES: [&str; 5] = [
    "user-read-private",
    "user-read-email",
    "user-top-read",
    "user-read-recently-played",
    "user-library-read",
];

pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_LASTFM_API_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the data directory if it doesn't exist and loads environment
/// variables from `<data>/spotinsights/.env`. A missing file is not an error;
/// the process environment is then the only source of configuration.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotinsights/.env`
/// - macOS: `~/Library/Application Support/spotinsights/.env`
/// - Windows: `%LOCALAPPDATA%/spotinsights/.env`
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory cannot be created and
/// [`Error::Config`] if the `.env` file exists but cannot be parsed.
pub async fn load_env() -> Res<()> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir).await?;

    match dotenv::from_path(dir.join(".env")) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Config(format!("Cannot parse .env file: {}", e))),
    }
}

/// Returns the application data directory.
///
/// `SPOTINSIGHTS_DATA_DIR` overrides the platform-specific location, which
/// keeps test runs and multiple accounts apart.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = env::var("SPOTINSIGHTS_DATA_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_NAME);
    path
}

/// Returns the directory holding the token store and cached statistics.
pub fn cache_dir() -> PathBuf {
    data_dir().join("cache")
}

/// Returns the server address for the local OAuth callback server.
///
/// Reads `SERVER_ADDRESS`, falling back to `127.0.0.1:8888`.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string())
}

/// Credentials and endpoints for the Spotify Web API.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    /// Base URL of the accounts service (`/authorize`, `/api/token`)
    pub accounts_url: String,
    /// Base URL of the Web API (`/me/top/tracks`, ...)
    pub api_url: String,
}

impl SpotifyConfig {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `SPOTIFY_CLIENT_ID` or
    /// `SPOTIFY_CLIENT_SECRET` is missing.
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id = get("SPOTIFY_CLIENT_ID")
            .ok_or_else(|| Error::Config("SPOTIFY_CLIENT_ID must be set".to_string()))?;
        let client_secret = get("SPOTIFY_CLIENT_SECRET")
            .ok_or_else(|| Error::Config("SPOTIFY_CLIENT_SECRET must be set".to_string()))?;

        let scopes = match get("SPOTIFY_API_SCOPE") {
            Some(scope) => scope.split_whitespace().map(str::to_string).collect(),
            None => DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri: get("SPOTIFY_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            scopes,
            accounts_url: get("SPOTIFY_ACCOUNTS_URL")
                .unwrap_or_else(|| DEFAULT_ACCOUNTS_URL.to_string()),
            api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }

    /// Returns the token endpoint URL.
    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_url.trim_end_matches('/'))
    }

    /// Returns the authorization endpoint URL.
    pub fn authorize_url(&self) -> String {
        format!("{}/authorize", self.accounts_url.trim_end_matches('/'))
    }
}

/// Credentials and endpoint for the Last.fm API.
#[derive(Debug, Clone)]
pub struct LastFmConfig {
    pub api_key: String,
    pub api_url: String,
    /// Used by `stats plays` when no `--user` is given
    pub default_user: Option<String>,
}

impl LastFmConfig {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `LASTFM_API_KEY` is missing.
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            api_key: get("LASTFM_API_KEY")
                .ok_or_else(|| Error::Config("LASTFM_API_KEY must be set".to_string()))?,
            api_url: get("LASTFM_API_URL").unwrap_or_else(|| DEFAULT_LASTFM_API_URL.to_string()),
            default_user: get("LASTFM_USER"),
        })
    }
}
