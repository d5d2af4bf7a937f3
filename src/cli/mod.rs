//! # CLI Module
//!
//! Command implementations for `spotinsights`. Each public function backs
//! one subcommand: it builds the repositories it needs, starts the load
//! through [`crate::state::launch`], shows a spinner while the state is
//! `Loading` and renders the settled state as a table.
//!
//! ## Commands
//!
//! ### Authentication
//!
//! - [`auth`] - Interactive Spotify login
//! - [`logout`] - Removes the stored tokens
//! - [`status`] - Shows whether a token is stored and when it expires
//!
//! ### Listening statistics
//!
//! - [`tracks`] - Top tracks for a time range (cached for a day)
//! - [`artists`] - Top artists for a time range (cached for an hour)
//! - [`track`] / [`artist`] - Details for a single track or artist
//! - [`releases`] - Albums and singles Spotify features as new
//! - [`recommend`] / [`genres`] - Seeded recommendations and the genre seeds
//!
//! ### Last.fm
//!
//! - [`stats_tags`], [`stats_plays`], [`stats_artist`]
//!
//! ## Error presentation
//!
//! Failures are printed with the colored macros together with a hint on how
//! to retry. An authentication problem points to `spotinsights auth`.
//! Missing configuration terminates the command through `error!`.

use std::{future::Future, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::{LastFmConfig, SpotifyConfig},
    error,
    lastfm::LastFmClient,
    management::{CacheStore, TokenManager},
    spotify::SpotifyClient,
    state::{self, Failure, Resource},
    types::{Track, TrackTableRow},
    utils, warning,
};

mod artists;
mod auth;
mod detail;
mod recommend;
mod releases;
mod stats;
mod tracks;

pub use artists::artists;
pub use auth::{auth, logout, status};
pub use detail::{artist, track};
pub use recommend::{RecommendOptions, genres, recommend};
pub use releases::releases;
pub use stats::{stats_artist, stats_plays, stats_tags};
pub use tracks::tracks;

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Launches `future` and waits for its settled state behind a spinner.
async fn load<T, F>(message: &str, future: F) -> Resource<T>
where
    T: Clone + Send + Sync + 'static,
    F: Future<Output = crate::Res<T>> + Send + 'static,
{
    let pb = spinner(message);
    let mut rx = state::launch(future);
    let resource = state::settle(&mut rx).await;
    pb.finish_and_clear();
    resource
}

/// Prints a failed load together with a way to retry.
fn report_error(failure: &Failure, retry: &str) {
    warning!("{}", failure);
    if failure.requires_login {
        warning!("Run `spotinsights auth` to log in again.");
    } else {
        warning!("Try again with `{}`.", retry);
    }
}

fn track_rows(tracks: &[Track]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            rank: i + 1,
            name: utils::truncate(&t.name, 40),
            artists: utils::truncate(&utils::join_artist_names(&t.artists), 30),
            album: utils::truncate(&t.album.name, 30),
            duration: utils::format_duration(t.duration_ms),
            popularity: t.popularity,
        })
        .collect()
}

fn spotify_config() -> SpotifyConfig {
    match SpotifyConfig::from_env() {
        Ok(config) => config,
        Err(e) => error!("{}", e),
    }
}

async fn spotify_client() -> SpotifyClient {
    let config = spotify_config();
    let tokens = match TokenManager::load(TokenManager::default_path()).await {
        Ok(tokens) => tokens,
        Err(e) => error!("Failed to load token. Please run spotinsights auth\n Error: {}", e),
    };

    match SpotifyClient::new(&config, tokens) {
        Ok(client) => client,
        Err(e) => error!("Cannot create Spotify client. Err: {}", e),
    }
}

fn cache_store() -> CacheStore {
    CacheStore::new(CacheStore::default_root())
}

fn lastfm_client() -> LastFmClient {
    let config = match LastFmConfig::from_env() {
        Ok(config) => config,
        Err(e) => error!("{}", e),
    };

    match LastFmClient::new(&config) {
        Ok(client) => client,
        Err(e) => error!("Cannot create Last.fm client. Err: {}", e),
    }
}
