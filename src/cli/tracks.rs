use tabled::Table;

use crate::{
    cli::{cache_store, load, report_error, spotify_client, track_rows},
    info,
    repository::TopTracksRepository,
    state::ListState,
    types::{TimeRange, Track},
};

pub async fn tracks(time_range: TimeRange, refresh: bool) {
    let repo = TopTracksRepository::new(spotify_client().await, cache_store());
    let mut state: ListState<Track> = ListState::new(time_range);

    let resource = if refresh {
        state.refreshing();
        load("Refreshing top tracks...", async move {
            repo.refresh_top_tracks(time_range).await?;
            repo.cached_top_tracks(time_range).await
        })
        .await
    } else {
        state.loading();
        load("Loading top tracks...", async move {
            repo.get_top_tracks(time_range).await
        })
        .await
    };
    state.apply(resource);

    render(&state);
}

fn render(state: &ListState<Track>) {
    if let Some(error) = &state.error {
        report_error(error, "spotinsights tracks --refresh");
        return;
    }

    if state.items.is_empty() {
        info!("No top tracks for the {}.", state.time_range.describe());
        return;
    }

    info!("Top tracks, {}", state.time_range.describe());
    println!("{}", Table::new(track_rows(&state.items)));
}
