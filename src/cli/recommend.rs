use tabled::Table;

use crate::{
    cli::{load, report_error, spotify_client, track_rows},
    info,
    repository::RecommendationsRepository,
    state::{RecommendationsState, Resource},
    types::{MAX_SEEDS, RecommendationParameters, Recommendations},
    warning,
};

/// Seeds and tuning for `spotinsights recommend`.
#[derive(Debug, Clone, Default)]
pub struct RecommendOptions {
    pub genres: Vec<String>,
    pub seed_artists: Vec<String>,
    pub seed_tracks: Vec<String>,
    pub limit: Option<u32>,
    pub min_popularity: Option<u32>,
    pub max_popularity: Option<u32>,
    pub target_popularity: Option<u32>,
}

fn build_parameters(
    opts: &RecommendOptions,
    state: &RecommendationsState,
) -> crate::Res<RecommendationParameters> {
    let mut params = RecommendationParameters::new(
        opts.seed_artists.clone(),
        opts.seed_tracks.clone(),
        state.selected_genres.clone(),
    )?;
    if let Some(limit) = opts.limit {
        params = params.with_limit(limit)?;
    }
    params.with_popularity(
        opts.min_popularity,
        opts.max_popularity,
        opts.target_popularity,
    )
}

pub async fn recommend(opts: RecommendOptions) {
    let mut state = RecommendationsState::default();
    for genre in &opts.genres {
        if !state.select_genre(genre) {
            warning!(
                "Ignoring genre '{}', at most {} genres can be selected.",
                genre,
                MAX_SEEDS
            );
        }
    }

    let params = match build_parameters(&opts, &state) {
        Ok(params) => params,
        Err(e) => {
            warning!("{}", e);
            return;
        }
    };

    if params.seed_count() == 0 {
        warning!("Provide at least one --genre, --seed-artist or --seed-track.");
        info!("Run `spotinsights genres` to list the available genres.");
        return;
    }

    let repo = RecommendationsRepository::new(spotify_client().await);
    let resource = load("Fetching recommendations...", async move {
        repo.get_recommendations(&params).await
    })
    .await;

    let seeds = match &resource {
        Resource::Success(Recommendations { seeds, .. }) => seeds.clone(),
        _ => Vec::new(),
    };
    state.apply(resource);

    if let Some(error) = &state.error {
        report_error(error, "spotinsights recommend");
        return;
    }

    if state.recommendations.is_empty() {
        info!("Spotify returned no recommendations for these seeds.");
        return;
    }

    if !seeds.is_empty() {
        let described: Vec<String> = seeds
            .iter()
            .map(|s| format!("{:?} {}", s.seed_type, s.id).to_lowercase())
            .collect();
        info!("Seeds: {}", described.join(", "));
    }
    println!("{}", Table::new(track_rows(&state.recommendations)));
}

pub async fn genres() {
    let repo = RecommendationsRepository::new(spotify_client().await);
    let mut state = RecommendationsState::default();

    let resource = load("Fetching genre seeds...", async move {
        repo.get_available_genre_seeds().await
    })
    .await;
    state.apply_genres(resource);

    if let Some(error) = &state.error {
        report_error(error, "spotinsights genres");
        return;
    }

    info!("{} genres available as seeds", state.available_genres.len());
    for line in state.available_genres.chunks(6) {
        println!("  {}", line.join(", "));
    }
}
