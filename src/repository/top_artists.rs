use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    error::Res,
    management::{CacheEntry, CacheStore},
    spotify::SpotifyClient,
    types::{DetailedArtist, TimeRange},
    utils,
};

/// Top artists stay cached for an hour.
pub const TOP_ARTISTS_CACHE_MS: i64 = 60 * 60 * 1000;

pub const TOP_ARTISTS_FETCH_LIMIT: u32 = 50;

pub fn cache_key(time_range: TimeRange) -> String {
    format!("top-artists-{}", time_range.to_api_value())
}

/// Cached top artists per time range.
///
/// Reading never hits the network; an empty result tells the caller that a
/// refresh is due.
#[derive(Debug)]
pub struct TopArtistsRepository {
    client: SpotifyClient,
    cache: CacheStore,
    refresh_lock: Mutex<()>,
}

impl TopArtistsRepository {
    pub fn new(client: SpotifyClient, cache: CacheStore) -> Self {
        Self {
            client,
            cache,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Cached artists for `time_range`, or an empty list when the entry is
    /// missing or older than an hour.
    pub async fn get_top_artists(&self, time_range: TimeRange) -> Res<Vec<DetailedArtist>> {
        let entry = self
            .cache
            .load::<DetailedArtist>(&cache_key(time_range))
            .await?;

        match entry {
            Some(entry) if entry.is_fresh(utils::now_ms(), TOP_ARTISTS_CACHE_MS) => Ok(entry.items),
            Some(_) => {
                debug!(%time_range, "Top artists cache is stale");
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }

    /// Fetches the top artists and replaces the entry for `time_range`.
    ///
    /// Concurrent refreshes are serialized.
    pub async fn refresh_top_artists(&self, time_range: TimeRange) -> Res<()> {
        let _guard = self.refresh_lock.lock().await;

        let artists = self
            .client
            .top_artists(time_range, TOP_ARTISTS_FETCH_LIMIT, 0)
            .await
            .inspect_err(|e| warn!(%time_range, error = %e, "Refreshing top artists failed"))?;

        let key = cache_key(time_range);
        self.cache.remove(&key).await?;

        if artists.is_empty() {
            debug!(%time_range, "Spotify returned no top artists");
            return Ok(());
        }

        self.cache
            .store(&key, &CacheEntry::new(artists, utils::now_ms()))
            .await
            .inspect_err(|e| warn!(%time_range, error = %e, "Storing top artists failed"))
    }
}
