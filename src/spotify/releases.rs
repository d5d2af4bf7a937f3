use crate::{
    error::Res,
    spotify::{SpotifyClient, models::NewReleasesResponse},
    types::NewRelease,
};

impl SpotifyClient {
    /// Retrieves the albums and singles Spotify currently features as new.
    ///
    /// Calls `GET browse/new-releases`. Without a `country` the market of the
    /// authenticated user applies.
    ///
    /// # Example
    ///
    /// ```
    /// let releases = client.new_releases(Some("DE"), 20, 0).await?;
    /// for release in releases {
    ///     println!("{} ({})", release.name, release.release_date);
    /// }
    /// ```
    pub async fn new_releases(
        &self,
        country: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Res<Vec<NewRelease>> {
        let mut query = vec![("limit", limit.to_string()), ("offset", offset.to_string())];
        if let Some(country) = country {
            query.push(("country", country.to_uppercase()));
        }

        let response: NewReleasesResponse = self.get("browse/new-releases", &query).await?;

        Ok(response
            .albums
            .items
            .into_iter()
            .filter(|album| !album.id.is_empty())
            .map(Into::into)
            .collect())
    }
}
