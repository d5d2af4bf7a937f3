use tabled::Table;

use crate::{
    cli::{load, report_error, spotify_client},
    info,
    repository::NewReleasesRepository,
    state::ListState,
    types::{NewRelease, ReleaseTableRow},
    utils,
};

pub async fn releases(country: Option<String>) {
    let repo = NewReleasesRepository::new(spotify_client().await);
    let mut state: ListState<NewRelease> = ListState::default();
    state.loading();

    let resource = load("Fetching new releases...", async move {
        repo.get_new_releases(country.as_deref()).await
    })
    .await;
    state.apply(resource);

    if let Some(error) = &state.error {
        report_error(error, "spotinsights releases");
        return;
    }

    if state.items.is_empty() {
        info!("No new releases found.");
        return;
    }

    let mut items = state.items;
    items.sort_by(|a, b| b.release_date.cmp(&a.release_date));

    let rows: Vec<ReleaseTableRow> = items
        .into_iter()
        .map(|r| ReleaseTableRow {
            date: r.release_date,
            name: utils::truncate(&r.name, 40),
            album_type: r.album_type,
            tracks: r.total_tracks,
            artists: utils::truncate(
                &r.artists
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                30,
            ),
        })
        .collect();

    println!("{}", Table::new(rows));
}
