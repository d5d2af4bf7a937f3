use colored::Colorize;
use tabled::Table;

use crate::{
    cli::{load, report_error, spotify_client, track_rows},
    info,
    repository::{ArtistRepository, DEFAULT_MARKET, TrackRepository},
    state::DetailState,
    types::{DetailedArtist, Track},
    utils,
};

pub async fn track(id: String) {
    let repo = TrackRepository::new(spotify_client().await);
    let mut state: DetailState<Track> = DetailState::default();

    let resource = load("Loading track...", async move {
        repo.get_track_by_id(&id).await
    })
    .await;
    state.apply(resource);

    if let Some(error) = &state.error {
        report_error(error, "spotinsights track <id>");
        return;
    }
    let Some(track) = state.item else {
        return;
    };

    println!("{}", track.name.bold());
    println!("  Artists:    {}", utils::join_artist_names(&track.artists));
    println!("  Album:      {} ({})", track.album.name, track.album.release_date);
    println!("  Duration:   {}", utils::format_duration(track.duration_ms));
    println!("  Popularity: {}", track.popularity);
    if track.explicit {
        println!("  Explicit:   yes");
    }
    if let Some(preview) = &track.preview_url {
        println!("  Preview:    {}", preview);
    }
    if !track.spotify_url.is_empty() {
        println!("  Spotify:    {}", track.spotify_url.blue());
    }
}

/// Artist details followed by the artist's top tracks.
pub async fn artist(id: String, market: Option<String>) {
    let client = spotify_client().await;
    let artists = ArtistRepository::new(client.clone());
    let tracks = TrackRepository::new(client);
    let market = market.unwrap_or_else(|| DEFAULT_MARKET.to_string());

    let mut state: DetailState<(DetailedArtist, Vec<Track>)> = DetailState::default();
    let resource = load("Loading artist...", async move {
        let (artist, top_tracks) = tokio::try_join!(
            artists.get_artist_by_id(&id),
            tracks.get_artist_top_tracks(&id, &market)
        )?;
        Ok((artist, top_tracks))
    })
    .await;
    state.apply(resource);

    if let Some(error) = &state.error {
        report_error(error, "spotinsights artist <id>");
        return;
    }
    let Some((artist, top_tracks)) = state.item else {
        return;
    };

    println!("{}", artist.name.bold());
    if !artist.genres.is_empty() {
        println!("  Genres:     {}", artist.genres.join(", "));
    }
    println!("  Popularity: {}", artist.popularity);
    println!("  Followers:  {}", utils::format_followers(artist.followers));
    if !artist.spotify_url.is_empty() {
        println!("  Spotify:    {}", artist.spotify_url.blue());
    }

    if top_tracks.is_empty() {
        return;
    }

    println!();
    info!("Top tracks");
    let rows = track_rows(&top_tracks);
    println!("{}", Table::new(rows));
}
