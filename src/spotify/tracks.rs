use crate::{
    error::Res,
    spotify::{
        SpotifyClient,
        models::{self, ArtistTopTracksResponse, Paging, SpotifyTrack},
    },
    types::{TimeRange, Track},
};

impl SpotifyClient {
    /// Retrieves the user's most played tracks for a time range.
    ///
    /// Calls `GET me/top/tracks`. Spotify caps `limit` at 50 per page; use
    /// `offset` to page further.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Track>)` - Tracks in rank order, without records lacking an id
    /// - `Err(Error::NotAuthenticated)` - No usable token, even after a refresh
    /// - `Err(Error::Api { .. })` - Spotify rejected the request
    ///
    /// # Example
    ///
    /// ```
    /// let tracks = client.top_tracks(TimeRange::ShortTerm, 20, 0).await?;
    /// ```
    pub async fn top_tracks(&self, time_range: TimeRange, limit: u32, offset: u32) -> Res<Vec<Track>> {
        let page: Paging<SpotifyTrack> = self
            .get(
                "me/top/tracks",
                &[
                    ("time_range", time_range.to_api_value().to_string()),
                    ("limit", limit.to_string()),
                    ("offset", offset.to_string()),
                ],
            )
            .await?;

        Ok(models::into_tracks(page.items))
    }

    /// Retrieves a single track by its Spotify id.
    pub async fn track_by_id(&self, id: &str) -> Res<Track> {
        let track: SpotifyTrack = self.get(&format!("tracks/{}", id), &[]).await?;
        Ok(track.into())
    }

    /// Retrieves an artist's most popular tracks in the given market.
    pub async fn artist_top_tracks(&self, artist_id: &str, market: &str) -> Res<Vec<Track>> {
        let response: ArtistTopTracksResponse = self
            .get(
                &format!("artists/{}/top-tracks", artist_id),
                &[("market", market.to_string())],
            )
            .await?;

        Ok(models::into_tracks(response.tracks))
    }
}
