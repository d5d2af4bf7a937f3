use tracing::{debug, info, warn};

use crate::{
    error::Res,
    management::{CacheEntry, CacheStore},
    spotify::SpotifyClient,
    types::{TimeRange, Track},
    utils,
};

/// Top tracks stay cached for a day.
pub const TOP_TRACKS_CACHE_MS: i64 = 24 * 60 * 60 * 1000;

/// Number of tracks requested per refresh.
pub const TOP_TRACKS_FETCH_LIMIT: u32 = 50;

pub fn cache_key(time_range: TimeRange) -> String {
    format!("top-tracks-{}", time_range.to_api_value())
}

/// Cache-or-refresh access to the user's top tracks, one cache entry per
/// time range.
#[derive(Debug, Clone)]
pub struct TopTracksRepository {
    client: SpotifyClient,
    cache: CacheStore,
}

impl TopTracksRepository {
    pub fn new(client: SpotifyClient, cache: CacheStore) -> Self {
        Self { client, cache }
    }

    /// Returns the cached tracks while they are fresh, otherwise refreshes
    /// first and returns whatever fresh entry the refresh left behind.
    pub async fn get_top_tracks(&self, time_range: TimeRange) -> Res<Vec<Track>> {
        let key = cache_key(time_range);

        if let Some(entry) = self.cache.load::<Track>(&key).await? {
            if !entry.items.is_empty() && entry.is_fresh(utils::now_ms(), TOP_TRACKS_CACHE_MS) {
                debug!(%time_range, items = entry.items.len(), "Serving top tracks from cache");
                return Ok(entry.items);
            }
        }

        self.refresh_top_tracks(time_range).await?;
        self.cached_top_tracks(time_range).await
    }

    /// Fresh cached tracks for `time_range` without touching the network.
    pub async fn cached_top_tracks(&self, time_range: TimeRange) -> Res<Vec<Track>> {
        let now = utils::now_ms();
        Ok(self
            .cache
            .load::<Track>(&cache_key(time_range))
            .await?
            .filter(|entry| entry.is_fresh(now, TOP_TRACKS_CACHE_MS))
            .map(|entry| entry.items)
            .unwrap_or_default())
    }

    /// Fetches the top tracks and replaces the cache entry for `time_range`.
    ///
    /// An empty response leaves the cache untouched. After storing, entries
    /// of every time range older than the cache window are pruned.
    pub async fn refresh_top_tracks(&self, time_range: TimeRange) -> Res<()> {
        let tracks = self
            .client
            .top_tracks(time_range, TOP_TRACKS_FETCH_LIMIT, 0)
            .await
            .inspect_err(|e| warn!(%time_range, error = %e, "Refreshing top tracks failed"))?;

        if tracks.is_empty() {
            debug!(%time_range, "Spotify returned no top tracks, keeping cache");
            return Ok(());
        }

        let now = utils::now_ms();
        self.cache
            .store(&cache_key(time_range), &CacheEntry::new(tracks, now))
            .await
            .inspect_err(|e| warn!(%time_range, error = %e, "Storing top tracks failed"))?;

        let keys: Vec<String> = TimeRange::ALL.iter().map(|r| cache_key(*r)).collect();
        let pruned = self
            .cache
            .prune_older_than(&keys, now - TOP_TRACKS_CACHE_MS)
            .await?;
        if pruned > 0 {
            info!(pruned, "Pruned stale top track entries");
        }

        Ok(())
    }
}
