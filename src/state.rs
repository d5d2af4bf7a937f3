//! Loading state propagation and the reducers the commands render from.
//!
//! A repository call is started with [`launch`], which immediately publishes
//! [`Resource::Loading`] and later the outcome of the call. Command
//! implementations fold those values into one of the state structs below and
//! render the result.

use std::{fmt, future::Future};

use tokio::sync::watch;

use crate::{
    error::{Error, Res},
    types::{MAX_SEEDS, RecommendationParameters, Recommendations, TimeRange, Track},
};

/// A failed load as the commands render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    /// Recovering needs a new `spotinsights auth`
    pub requires_login: bool,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            requires_login: false,
        }
    }
}

impl From<Error> for Failure {
    fn from(error: Error) -> Self {
        Self {
            requires_login: error.requires_login(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of an asynchronous load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<T> {
    Loading,
    Success(T),
    Error(Failure),
}

impl<T> Resource<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }
}

impl<T> From<Res<T>> for Resource<T> {
    fn from(result: Res<T>) -> Self {
        match result {
            Ok(value) => Resource::Success(value),
            Err(e) => Resource::Error(e.into()),
        }
    }
}

/// Runs `future` on the runtime and returns a receiver that starts at
/// `Loading` and then holds `Success` or `Error`.
pub fn launch<T, F>(future: F) -> watch::Receiver<Resource<T>>
where
    T: Send + Sync + 'static,
    F: Future<Output = Res<T>> + Send + 'static,
{
    let (tx, rx) = watch::channel(Resource::Loading);
    tokio::spawn(async move {
        // receiver may already be gone
        let _ = tx.send(future.await.into());
    });
    rx
}

/// Waits until the receiver holds something other than `Loading`.
pub async fn settle<T: Clone>(rx: &mut watch::Receiver<Resource<T>>) -> Resource<T> {
    match rx.wait_for(|r| !r.is_loading()).await {
        Ok(resource) => Resource::clone(&resource),
        Err(_) => Resource::Error(Failure::new("Task ended without a result")),
    }
}

/// State of a ranked list (top tracks, top artists, new releases).
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub is_refreshing: bool,
    pub error: Option<Failure>,
    pub time_range: TimeRange,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self::new(TimeRange::default())
    }
}

impl<T> ListState<T> {
    pub fn new(time_range: TimeRange) -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            is_refreshing: false,
            error: None,
            time_range,
        }
    }

    pub fn loading(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// A refresh keeps the current items visible.
    pub fn refreshing(&mut self) {
        self.is_refreshing = true;
        self.error = None;
    }

    pub fn apply(&mut self, resource: Resource<Vec<T>>) {
        match resource {
            Resource::Loading => {
                if !self.is_refreshing {
                    self.is_loading = true;
                }
            }
            Resource::Success(items) => {
                self.items = items;
                self.is_loading = false;
                self.is_refreshing = false;
                self.error = None;
            }
            Resource::Error(failure) => {
                self.is_loading = false;
                self.is_refreshing = false;
                self.error = Some(failure);
            }
        }
    }

    /// Switches the time range. Returns `false` if it was already selected.
    pub fn select_time_range(&mut self, time_range: TimeRange) -> bool {
        if self.time_range == time_range {
            return false;
        }
        self.time_range = time_range;
        self.items.clear();
        self.is_loading = true;
        self.error = None;
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationsState {
    pub recommendations: Vec<Track>,
    pub available_genres: Vec<String>,
    pub selected_genres: Vec<String>,
    pub is_loading: bool,
    pub error: Option<Failure>,
}

impl RecommendationsState {
    /// Deselects `genre` if selected, otherwise selects it while fewer than
    /// five genres are selected. Returns whether the selection changed.
    pub fn toggle_genre(&mut self, genre: &str) -> bool {
        if let Some(pos) = self.selected_genres.iter().position(|g| g == genre) {
            self.selected_genres.remove(pos);
            return true;
        }
        if self.selected_genres.len() < MAX_SEEDS {
            self.selected_genres.push(genre.to_string());
            return true;
        }
        false
    }

    /// Selects `genre` unless it is already selected or five genres are.
    /// Returns `false` only when the cap was hit.
    pub fn select_genre(&mut self, genre: &str) -> bool {
        if self.selected_genres.iter().any(|g| g == genre) {
            return true;
        }
        self.toggle_genre(genre)
    }

    /// Parameters seeded with the selected genres.
    pub fn parameters(&self) -> Res<RecommendationParameters> {
        RecommendationParameters::new(Vec::new(), Vec::new(), self.selected_genres.clone())
    }

    pub fn apply_genres(&mut self, resource: Resource<Vec<String>>) {
        match resource {
            Resource::Loading => self.is_loading = true,
            Resource::Success(genres) => {
                self.available_genres = genres;
                self.is_loading = false;
            }
            Resource::Error(failure) => {
                self.is_loading = false;
                self.error = Some(failure);
            }
        }
    }

    pub fn apply(&mut self, resource: Resource<Recommendations>) {
        match resource {
            Resource::Loading => {
                self.is_loading = true;
                self.error = None;
            }
            Resource::Success(recommendations) => {
                self.recommendations = recommendations.tracks;
                self.is_loading = false;
                self.error = None;
            }
            Resource::Error(failure) => {
                self.is_loading = false;
                self.error = Some(failure);
            }
        }
    }
}

/// State of a single-entity screen (track or artist details).
#[derive(Debug, Clone, PartialEq)]
pub struct DetailState<T> {
    pub item: Option<T>,
    pub is_loading: bool,
    pub error: Option<Failure>,
}

impl<T> Default for DetailState<T> {
    fn default() -> Self {
        Self {
            item: None,
            is_loading: false,
            error: None,
        }
    }
}

impl<T> DetailState<T> {
    pub fn apply(&mut self, resource: Resource<T>) {
        match resource {
            Resource::Loading => {
                self.is_loading = true;
                self.error = None;
            }
            Resource::Success(item) => {
                self.item = Some(item);
                self.is_loading = false;
            }
            Resource::Error(failure) => {
                self.is_loading = false;
                self.error = Some(failure);
            }
        }
    }
}
