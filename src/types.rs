use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error::{Error, Res};

/// Statistical window used by Spotify for top tracks and top artists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    /// Roughly the last 4 weeks
    ShortTerm,
    /// Roughly the last 6 months
    #[default]
    MediumTerm,
    /// Several years
    LongTerm,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [
        TimeRange::ShortTerm,
        TimeRange::MediumTerm,
        TimeRange::LongTerm,
    ];

    pub fn to_api_value(self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }

    pub fn from_api_value(value: &str) -> Res<Self> {
        match value.trim().to_lowercase().as_str() {
            "short_term" | "short" => Ok(TimeRange::ShortTerm),
            "medium_term" | "medium" => Ok(TimeRange::MediumTerm),
            "long_term" | "long" => Ok(TimeRange::LongTerm),
            other => Err(Error::Validation(format!(
                "Unknown time range value: {}",
                other
            ))),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "last 4 weeks",
            TimeRange::MediumTerm => "last 6 months",
            TimeRange::LongTerm => "all time",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_api_value())
    }
}

impl FromStr for TimeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeRange::from_api_value(s)
    }
}

/// OAuth tokens as persisted by the token store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    /// Absolute expiry in Unix milliseconds
    pub expires_at_ms: i64,
}

/// Body returned by the Spotify token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
}

/// Shared state between the interactive login and the callback handler.
#[derive(Debug, Clone)]
pub struct PendingAuth {
    /// Expected value of the `state` query parameter
    pub state: String,
    pub response: Option<AuthResponse>,
    pub error: Option<String>,
}

impl PendingAuth {
    pub fn new(state: String) -> Self {
        Self {
            state,
            response: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackArtist {
    pub id: String,
    pub name: String,
    pub spotify_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub release_date: String,
    pub image_url: String,
    pub spotify_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<TrackArtist>,
    pub album: Album,
    pub duration_ms: u64,
    pub popularity: u32,
    pub preview_url: Option<String>,
    pub spotify_url: String,
    pub explicit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedArtist {
    pub id: String,
    pub name: String,
    pub spotify_url: String,
    pub genres: Vec<String>,
    pub images: Vec<String>,
    pub popularity: u32,
    pub followers: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReleaseArtist {
    pub id: String,
    pub name: String,
    pub spotify_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRelease {
    pub id: String,
    pub name: String,
    pub album_type: String,
    pub total_tracks: u32,
    pub artists: Vec<NewReleaseArtist>,
    pub image_url: String,
    pub release_date: String,
    pub spotify_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedType {
    Artist,
    Track,
    Genre,
}

impl FromStr for SeedType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "artist" => Ok(SeedType::Artist),
            "track" => Ok(SeedType::Track),
            "genre" => Ok(SeedType::Genre),
            other => Err(Error::Validation(format!("Unknown seed type: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSeed {
    pub id: String,
    pub seed_type: SeedType,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub tracks: Vec<Track>,
    pub seeds: Vec<RecommendationSeed>,
}

/// Maximum number of seeds Spotify accepts across artists, tracks and genres.
pub const MAX_SEEDS: usize = 5;

/// Validated query for the recommendations endpoint.
///
/// Instances can only be obtained through [`RecommendationParameters::new`]
/// or the builder methods, all of which re-check the invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationParameters {
    seed_artists: Vec<String>,
    seed_tracks: Vec<String>,
    seed_genres: Vec<String>,
    limit: u32,
    min_popularity: Option<u32>,
    max_popularity: Option<u32>,
    target_popularity: Option<u32>,
}

impl Default for RecommendationParameters {
    fn default() -> Self {
        Self {
            seed_artists: Vec::new(),
            seed_tracks: Vec::new(),
            seed_genres: Vec::new(),
            limit: 20,
            min_popularity: None,
            max_popularity: None,
            target_popularity: None,
        }
    }
}

impl RecommendationParameters {
    pub fn new(
        seed_artists: Vec<String>,
        seed_tracks: Vec<String>,
        seed_genres: Vec<String>,
    ) -> Res<Self> {
        let params = Self {
            seed_artists,
            seed_tracks,
            seed_genres,
            ..Self::default()
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_limit(mut self, limit: u32) -> Res<Self> {
        self.limit = limit;
        self.validate()?;
        Ok(self)
    }

    pub fn with_popularity(
        mut self,
        min: Option<u32>,
        max: Option<u32>,
        target: Option<u32>,
    ) -> Res<Self> {
        self.min_popularity = min;
        self.max_popularity = max;
        self.target_popularity = target;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Res<()> {
        if self.seed_count() > MAX_SEEDS {
            return Err(Error::Validation(format!(
                "Total number of seeds must not exceed {}",
                MAX_SEEDS
            )));
        }
        if !(1..=100).contains(&self.limit) {
            return Err(Error::Validation(
                "Limit must be between 1 and 100".to_string(),
            ));
        }

        let bounds = [
            ("Minimum", self.min_popularity),
            ("Maximum", self.max_popularity),
            ("Target", self.target_popularity),
        ];
        for (label, value) in bounds {
            if let Some(v) = value {
                if v > 100 {
                    return Err(Error::Validation(format!(
                        "{} popularity must be between 0 and 100",
                        label
                    )));
                }
            }
        }

        if let (Some(min), Some(max)) = (self.min_popularity, self.max_popularity) {
            if min > max {
                return Err(Error::Validation(
                    "Minimum popularity must not exceed maximum popularity".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn seed_count(&self) -> usize {
        self.seed_artists.len() + self.seed_tracks.len() + self.seed_genres.len()
    }

    pub fn seed_artists(&self) -> &[String] {
        &self.seed_artists
    }

    pub fn seed_tracks(&self) -> &[String] {
        &self.seed_tracks
    }

    pub fn seed_genres(&self) -> &[String] {
        &self.seed_genres
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Query pairs for the recommendations endpoint; empty seed lists and
    /// unset popularity bounds are omitted.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        let seeds = [
            ("seed_artists", &self.seed_artists),
            ("seed_tracks", &self.seed_tracks),
            ("seed_genres", &self.seed_genres),
        ];
        for (key, values) in seeds {
            if !values.is_empty() {
                query.push((key, values.join(",")));
            }
        }

        query.push(("limit", self.limit.to_string()));

        let popularity = [
            ("min_popularity", self.min_popularity),
            ("max_popularity", self.max_popularity),
            ("target_popularity", self.target_popularity),
        ];
        for (key, value) in popularity {
            if let Some(v) = value {
                query.push((key, v.to_string()));
            }
        }

        query
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastFmArtist {
    pub name: String,
    pub mbid: Option<String>,
    pub url: Option<String>,
    pub summary: Option<String>,
    pub listeners: Option<u64>,
    pub playcount: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastFmTag {
    pub name: String,
    pub count: Option<u64>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayCountPerDay {
    /// Calendar date formatted as `YYYY-MM-DD`
    pub date: String,
    pub count: u32,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    pub name: String,
    pub artists: String,
    pub album: String,
    pub duration: String,
    pub popularity: u32,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    pub name: String,
    pub genres: String,
    pub popularity: u32,
    pub followers: String,
}

#[derive(Tabled)]
pub struct ReleaseTableRow {
    pub date: String,
    pub name: String,
    #[tabled(rename = "type")]
    pub album_type: String,
    pub tracks: u32,
    pub artists: String,
}

#[derive(Tabled)]
pub struct TagTableRow {
    pub name: String,
    pub count: String,
}

#[derive(Tabled)]
pub struct PlayCountTableRow {
    pub date: String,
    pub plays: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize, prefix: &str) -> Vec<String> {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    #[test]
    fn test_time_range_round_trip_api_value() {
        for range in TimeRange::ALL {
            assert_eq!(TimeRange::from_api_value(range.to_api_value()).unwrap(), range);
        }
    }

    #[test]
    fn test_time_range_short_aliases() {
        assert_eq!("short".parse::<TimeRange>().unwrap(), TimeRange::ShortTerm);
        assert_eq!("LONG".parse::<TimeRange>().unwrap(), TimeRange::LongTerm);
        assert!("yearly".parse::<TimeRange>().is_err());
    }

    #[test]
    fn test_default_time_range_is_medium() {
        assert_eq!(TimeRange::default(), TimeRange::MediumTerm);
    }

    #[test]
    fn test_recommendation_parameters_accept_five_seeds() {
        let params =
            RecommendationParameters::new(ids(2, "artist"), ids(2, "track"), ids(1, "genre"));
        assert!(params.is_ok());
        assert_eq!(params.unwrap().seed_count(), 5);
    }

    #[test]
    fn test_recommendation_parameters_reject_six_seeds() {
        let params = RecommendationParameters::new(ids(3, "artist"), ids(2, "track"), ids(1, "g"));
        assert!(matches!(params, Err(Error::Validation(_))));
    }

    #[test]
    fn test_recommendation_parameters_limit_bounds() {
        let base = RecommendationParameters::default();
        assert!(base.clone().with_limit(0).is_err());
        assert!(base.clone().with_limit(101).is_err());
        assert_eq!(base.with_limit(100).unwrap().limit(), 100);
    }

    #[test]
    fn test_recommendation_parameters_popularity_bounds() {
        let base = RecommendationParameters::default();
        assert!(base.clone().with_popularity(Some(101), None, None).is_err());
        assert!(base.clone().with_popularity(None, Some(150), None).is_err());
        assert!(base.clone().with_popularity(None, None, Some(101)).is_err());
        assert!(base.clone().with_popularity(Some(80), Some(20), None).is_err());
        assert!(base.with_popularity(Some(0), Some(100), Some(50)).is_ok());
    }

    #[test]
    fn test_recommendation_query_omits_empty_values() {
        let params = RecommendationParameters::new(vec![], vec![], vec!["rock".into(), "jazz".into()])
            .unwrap()
            .with_popularity(None, None, Some(70))
            .unwrap();

        let query = params.to_query();
        assert_eq!(
            query,
            vec![
                ("seed_genres", "rock,jazz".to_string()),
                ("limit", "20".to_string()),
                ("target_popularity", "70".to_string()),
            ]
        );
    }

    #[test]
    fn test_seed_type_parsing_is_case_insensitive() {
        assert_eq!("ARTIST".parse::<SeedType>().unwrap(), SeedType::Artist);
        assert_eq!("genre".parse::<SeedType>().unwrap(), SeedType::Genre);
        assert!("album".parse::<SeedType>().is_err());
    }
}
