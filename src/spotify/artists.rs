use crate::{
    error::Res,
    spotify::{
        SpotifyClient,
        models::{self, Paging, SpotifyArtist},
    },
    types::{DetailedArtist, TimeRange},
};

impl SpotifyClient {
    /// Retrieves the user's most played artists for a time range.
    ///
    /// Calls `GET me/top/artists`. Genres and images of each artist are
    /// de-duplicated while keeping their order.
    ///
    /// # Arguments
    ///
    /// * `time_range` - Statistical window to query
    /// * `limit` - Page size (1-50)
    /// * `offset` - Index of the first artist to return
    pub async fn top_artists(
        &self,
        time_range: TimeRange,
        limit: u32,
        offset: u32,
    ) -> Res<Vec<DetailedArtist>> {
        let page: Paging<SpotifyArtist> = self
            .get(
                "me/top/artists",
                &[
                    ("time_range", time_range.to_api_value().to_string()),
                    ("limit", limit.to_string()),
                    ("offset", offset.to_string()),
                ],
            )
            .await?;

        Ok(models::into_artists(page.items))
    }

    pub async fn artist_by_id(&self, id: &str) -> Res<DetailedArtist> {
        let artist: SpotifyArtist = self.get(&format!("artists/{}", id), &[]).await?;
        Ok(artist.into())
    }
}
