use tracing::warn;

use crate::{
    error::Res,
    spotify::SpotifyClient,
    types::{DetailedArtist, RecommendationParameters, Recommendations, Track},
};

/// Market used for artist top tracks when none is configured.
pub const DEFAULT_MARKET: &str = "US";

/// Uncached recommendations; every call asks Spotify again.
#[derive(Debug, Clone)]
pub struct RecommendationsRepository {
    client: SpotifyClient,
}

impl RecommendationsRepository {
    pub fn new(client: SpotifyClient) -> Self {
        Self { client }
    }

    pub async fn get_recommendations(
        &self,
        params: &RecommendationParameters,
    ) -> Res<Recommendations> {
        self.client
            .recommendations(params)
            .await
            .inspect_err(|e| warn!(error = %e, "Fetching recommendations failed"))
    }

    pub async fn get_available_genre_seeds(&self) -> Res<Vec<String>> {
        let mut genres = self
            .client
            .genre_seeds()
            .await
            .inspect_err(|e| warn!(error = %e, "Fetching genre seeds failed"))?;
        genres.sort();
        genres.dedup();
        Ok(genres)
    }
}

#[derive(Debug, Clone)]
pub struct TrackRepository {
    client: SpotifyClient,
}

impl TrackRepository {
    pub fn new(client: SpotifyClient) -> Self {
        Self { client }
    }

    pub async fn get_track_by_id(&self, id: &str) -> Res<Track> {
        self.client
            .track_by_id(id)
            .await
            .inspect_err(|e| warn!(id, error = %e, "Fetching track failed"))
    }

    pub async fn get_artist_top_tracks(&self, artist_id: &str, market: &str) -> Res<Vec<Track>> {
        self.client
            .artist_top_tracks(artist_id, market)
            .await
            .inspect_err(|e| warn!(artist_id, market, error = %e, "Fetching artist top tracks failed"))
    }
}

#[derive(Debug, Clone)]
pub struct ArtistRepository {
    client: SpotifyClient,
}

impl ArtistRepository {
    pub fn new(client: SpotifyClient) -> Self {
        Self { client }
    }

    pub async fn get_artist_by_id(&self, id: &str) -> Res<DetailedArtist> {
        self.client
            .artist_by_id(id)
            .await
            .inspect_err(|e| warn!(id, error = %e, "Fetching artist failed"))
    }
}
