use crate::{
    error::{Error, Res},
    spotify::{
        SpotifyClient,
        models::{GenreSeedsResponse, RecommendationsResponse},
    },
    types::{RecommendationParameters, Recommendations},
};

impl SpotifyClient {
    /// Requests track recommendations for a validated set of seeds.
    ///
    /// At least one seed is required; Spotify answers `400` otherwise, so the
    /// request is rejected locally instead.
    pub async fn recommendations(&self, params: &RecommendationParameters) -> Res<Recommendations> {
        if params.seed_count() == 0 {
            return Err(Error::Validation(
                "At least one seed artist, track or genre is required".to_string(),
            ));
        }

        let response: RecommendationsResponse =
            self.get("recommendations", &params.to_query()).await?;
        Ok(response.into())
    }

    /// Lists the genres accepted as recommendation seeds.
    pub async fn genre_seeds(&self) -> Res<Vec<String>> {
        let response: GenreSeedsResponse = self
            .get("recommendations/available-genre-seeds", &[])
            .await?;
        Ok(response.genres)
    }
}
