//! Last.fm API client implementation

use std::{fmt, time::Duration};

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::{
    config::LastFmConfig,
    error::{Error, Res},
    lastfm::models::{
        ArtistInfoResponse, ErrorResponse, RecentTracksResponse, TopTagsResponse,
    },
    types::{LastFmArtist, LastFmTag},
};

/// Page size used for `user.getrecenttracks`
pub const RECENT_TRACKS_LIMIT: u32 = 200;

/// Last.fm error code for an unknown artist
const ARTIST_NOT_FOUND: i32 = 6;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client for the Last.fm REST API (`format=json`).
#[derive(Clone)]
pub struct LastFmClient {
    http: Client,
    api_key: String,
    api_url: String,
}

impl fmt::Debug for LastFmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LastFmClient")
            .field("api_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl LastFmClient {
    pub fn new(config: &LastFmConfig) -> Res<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Config("LASTFM_API_KEY must be set".to_string()));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
        })
    }

    /// Looks up an artist by name.
    ///
    /// Returns `Ok(None)` when Last.fm does not know the artist.
    ///
    /// # Errors
    /// - `Error::Validation` - If the name is blank
    /// - `Error::LastFm` - If Last.fm returns any other error document
    #[instrument(skip(self))]
    pub async fn artist_info(&self, artist: &str) -> Res<Option<LastFmArtist>> {
        let artist = non_blank(artist, "artist name")?;

        match self
            .request::<ArtistInfoResponse>(&[("method", "artist.getinfo"), ("artist", artist)])
            .await
        {
            Ok(response) => Ok(response.artist.map(Into::into)),
            Err(Error::LastFm { code, .. }) if code == ARTIST_NOT_FOUND => {
                debug!(artist, "Artist not found on Last.fm");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Global top tags, most used first.
    #[instrument(skip(self))]
    pub async fn top_tags(&self) -> Res<Vec<LastFmTag>> {
        let response: TopTagsResponse = self.request(&[("method", "tag.getTopTags")]).await?;

        let tags: Vec<LastFmTag> = response
            .toptags
            .map(|t| t.tag.into_iter().map(Into::into).collect())
            .unwrap_or_default();

        debug!(tag_count = tags.len(), "Found top tags");
        Ok(tags)
    }

    /// Unix timestamps (seconds) of the user's most recent scrobbles.
    ///
    /// The currently playing track carries no timestamp and is skipped.
    #[instrument(skip(self))]
    pub async fn recent_scrobble_times(&self, user: &str) -> Res<Vec<i64>> {
        let user = non_blank(user, "user name")?;
        let limit = RECENT_TRACKS_LIMIT.to_string();

        let response: RecentTracksResponse = self
            .request(&[
                ("method", "user.getrecenttracks"),
                ("user", user),
                ("limit", &limit),
            ])
            .await?;

        let times: Vec<i64> = response
            .recenttracks
            .map(|r| r.track)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|t| t.date.and_then(|d| d.uts))
            .filter_map(|uts| i64::try_from(uts).ok())
            .collect();

        debug!(user, scrobbles = times.len(), "Fetched recent scrobbles");
        Ok(times)
    }

    async fn request<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Res<T> {
        let response = self
            .http
            .get(&self.api_url)
            .query(params)
            .query(&[("api_key", self.api_key.as_str()), ("format", "json")])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if let Ok(error) = serde_json::from_str::<ErrorResponse>(&text) {
            return Err(Error::LastFm {
                code: error.error,
                message: error.message,
            });
        }

        if !status.is_success() {
            return Err(Error::LastFm {
                code: i32::from(status.as_u16()),
                message: status.canonical_reason().unwrap_or("Unknown error").to_string(),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

fn non_blank<'a>(value: &'a str, what: &str) -> Res<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(format!("{} cannot be empty", what)));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key: &str) -> LastFmConfig {
        LastFmConfig {
            api_key: key.to_string(),
            api_url: "http://localhost".to_string(),
            default_user: None,
        }
    }

    #[test]
    fn test_client_requires_api_key() {
        assert!(matches!(LastFmClient::new(&config(" ")), Err(Error::Config(_))));
    }

    #[test]
    fn test_client_debug_redacts_api_key() {
        let client = LastFmClient::new(&config("secret_key")).unwrap();
        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("secret_key"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_non_blank() {
        assert!(matches!(non_blank("  ", "user name"), Err(Error::Validation(_))));
        assert_eq!(non_blank("  rj ", "user name").unwrap(), "rj");
    }
}
