use tabled::Table;

use crate::{
    cli::{lastfm_client, load, report_error},
    config, info,
    repository::LastFmRepository,
    state::{DetailState, ListState},
    types::{LastFmArtist, LastFmTag, PlayCountPerDay, PlayCountTableRow, TagTableRow},
    utils, warning,
};

pub async fn stats_tags() {
    let repo = LastFmRepository::new(lastfm_client());
    let mut state: ListState<LastFmTag> = ListState::default();
    state.loading();

    let resource = load("Fetching top tags...", async move { repo.get_top_tags().await }).await;
    state.apply(resource);

    if let Some(error) = &state.error {
        report_error(error, "spotinsights stats tags");
        return;
    }

    let rows: Vec<TagTableRow> = state
        .items
        .into_iter()
        .map(|t| TagTableRow {
            name: t.name,
            count: t.count.map_or_else(|| "-".to_string(), |c| c.to_string()),
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub async fn stats_plays(user: Option<String>) {
    let user = match user.or_else(|| {
        config::LastFmConfig::from_env()
            .ok()
            .and_then(|c| c.default_user)
    }) {
        Some(user) => user,
        None => {
            warning!("No Last.fm user given. Pass --user or set LASTFM_USER.");
            return;
        }
    };

    let repo = LastFmRepository::new(lastfm_client());
    let mut state: ListState<PlayCountPerDay> = ListState::default();
    state.loading();

    let label = user.clone();
    let resource = load("Fetching recent scrobbles...", async move {
        repo.get_play_count_per_day(&user).await
    })
    .await;
    state.apply(resource);

    if let Some(error) = &state.error {
        report_error(error, "spotinsights stats plays");
        return;
    }

    if state.items.is_empty() {
        info!("No scrobbles found for {}.", label);
        return;
    }

    let total: u32 = state.items.iter().map(|p| p.count).sum();
    info!("{} plays by {} across {} days", total, label, state.items.len());

    let rows: Vec<PlayCountTableRow> = state
        .items
        .into_iter()
        .map(|p| PlayCountTableRow {
            date: p.date,
            plays: p.count,
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub async fn stats_artist(name: String) {
    let repo = LastFmRepository::new(lastfm_client());
    let mut state: DetailState<Option<LastFmArtist>> = DetailState::default();

    let resource = load("Looking up artist...", async move {
        repo.get_artist_info(&name).await
    })
    .await;
    state.apply(resource);

    if let Some(error) = &state.error {
        report_error(error, "spotinsights stats artist <name>");
        return;
    }

    let Some(artist) = state.item.flatten() else {
        warning!("Artist not found on Last.fm.");
        return;
    };

    info!("{}", artist.name);
    if let Some(listeners) = artist.listeners {
        println!("  Listeners: {}", utils::format_followers(Some(listeners)));
    }
    if let Some(playcount) = artist.playcount {
        println!("  Plays:     {}", utils::format_followers(Some(playcount)));
    }
    if let Some(url) = &artist.url {
        println!("  Last.fm:   {}", url);
    }
    if let Some(summary) = &artist.summary {
        println!();
        println!("{}", summary);
    }
}
