use std::sync::Arc;

use tabled::Table;

use crate::{
    cli::{cache_store, load, report_error, spotify_client},
    info,
    repository::TopArtistsRepository,
    state::ListState,
    types::{ArtistTableRow, DetailedArtist, TimeRange},
    utils,
};

/// Shows the cached top artists. A missing or stale entry, or `--refresh`,
/// triggers a refresh first.
pub async fn artists(time_range: TimeRange, refresh: bool) {
    let repo = Arc::new(TopArtistsRepository::new(
        spotify_client().await,
        cache_store(),
    ));
    let mut state: ListState<DetailedArtist> = ListState::new(time_range);

    if refresh {
        state.refreshing();
    } else {
        state.loading();
    }

    let resource = load("Loading top artists...", async move {
        if !refresh {
            let cached = repo.get_top_artists(time_range).await?;
            if !cached.is_empty() {
                return Ok(cached);
            }
        }
        repo.refresh_top_artists(time_range).await?;
        repo.get_top_artists(time_range).await
    })
    .await;
    state.apply(resource);

    render(&state);
}

fn render(state: &ListState<DetailedArtist>) {
    if let Some(error) = &state.error {
        report_error(error, "spotinsights artists --refresh");
        return;
    }

    if state.items.is_empty() {
        info!("No top artists for the {}.", state.time_range.describe());
        return;
    }

    info!("Top artists, {}", state.time_range.describe());
    let rows: Vec<ArtistTableRow> = state
        .items
        .iter()
        .enumerate()
        .map(|(i, a)| ArtistTableRow {
            rank: i + 1,
            name: a.name.clone(),
            genres: a.genres.iter().take(3).cloned().collect::<Vec<_>>().join(","),
            popularity: a.popularity,
            followers: utils::format_followers(a.followers),
        })
        .collect();

    println!("{}", Table::new(rows));
}
