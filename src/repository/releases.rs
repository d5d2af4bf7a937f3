use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::{error::Res, spotify::SpotifyClient, types::NewRelease};

pub const NEW_RELEASES_FETCH_LIMIT: u32 = 50;

/// New releases held in memory for the lifetime of the repository.
#[derive(Debug)]
pub struct NewReleasesRepository {
    client: SpotifyClient,
    releases: RwLock<Vec<NewRelease>>,
}

impl NewReleasesRepository {
    pub fn new(client: SpotifyClient) -> Self {
        Self {
            client,
            releases: RwLock::new(Vec::new()),
        }
    }

    /// Refreshes and returns the in-memory list.
    pub async fn get_new_releases(&self, country: Option<&str>) -> Res<Vec<NewRelease>> {
        self.refresh_new_releases(country).await?;
        Ok(self.releases.read().await.clone())
    }

    pub async fn refresh_new_releases(&self, country: Option<&str>) -> Res<()> {
        let releases = self
            .client
            .new_releases(country, NEW_RELEASES_FETCH_LIMIT, 0)
            .await
            .inspect_err(|e| warn!(?country, error = %e, "Refreshing new releases failed"))?;
        debug!(count = releases.len(), ?country, "Fetched new releases");

        *self.releases.write().await = releases;
        Ok(())
    }
}
