use chrono::Local;
use tracing::warn;

use crate::{
    error::Res,
    lastfm::LastFmClient,
    types::{LastFmArtist, LastFmTag, PlayCountPerDay},
    utils,
};

/// Number of tags kept from `tag.getTopTags`.
pub const TOP_TAGS_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct LastFmRepository {
    client: LastFmClient,
}

impl LastFmRepository {
    pub fn new(client: LastFmClient) -> Self {
        Self { client }
    }

    /// `None` when Last.fm does not know the artist.
    pub async fn get_artist_info(&self, name: &str) -> Res<Option<LastFmArtist>> {
        self.client
            .artist_info(name)
            .await
            .inspect_err(|e| warn!(name, error = %e, "Fetching Last.fm artist info failed"))
    }

    pub async fn get_top_tags(&self) -> Res<Vec<LastFmTag>> {
        let mut tags = self
            .client
            .top_tags()
            .await
            .inspect_err(|e| warn!(error = %e, "Fetching Last.fm top tags failed"))?;
        tags.truncate(TOP_TAGS_LIMIT);
        Ok(tags)
    }

    /// Scrobbles among the user's most recent ones, counted per local
    /// calendar day in ascending date order.
    pub async fn get_play_count_per_day(&self, user: &str) -> Res<Vec<PlayCountPerDay>> {
        let times = self
            .client
            .recent_scrobble_times(user)
            .await
            .inspect_err(|e| warn!(user, error = %e, "Fetching recent scrobbles failed"))?;
        Ok(utils::group_plays_by_day(times, &Local))
    }
}
