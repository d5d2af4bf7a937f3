//! Wire shapes of the Spotify Web API and their mapping into domain types.

use std::collections::HashMap;

use serde::Deserialize;

use crate::{
    types::{
        Album, DetailedArtist, NewRelease, NewReleaseArtist, RecommendationSeed, Recommendations,
        SeedType, Track, TrackArtist,
    },
    utils,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrackArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    pub id: String,
    pub name: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub popularity: u32,
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
    #[serde(default)]
    pub explicit: bool,
    pub album: SpotifyAlbum,
    pub artists: Vec<SpotifyTrackArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyFollowers {
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub followers: Option<SpotifyFollowers>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyNewReleaseAlbum {
    pub id: String,
    pub name: String,
    pub album_type: String,
    #[serde(default)]
    pub total_tracks: u32,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub artists: Vec<SpotifyTrackArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReleasesResponse {
    pub albums: Paging<SpotifyNewReleaseAlbum>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyRecommendationSeed {
    pub id: String,
    #[serde(rename = "type")]
    pub seed_type: String,
    #[serde(default)]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsResponse {
    pub tracks: Vec<SpotifyTrack>,
    #[serde(default)]
    pub seeds: Vec<SpotifyRecommendationSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreSeedsResponse {
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistTopTracksResponse {
    pub tracks: Vec<SpotifyTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
}

fn spotify_url(urls: &HashMap<String, String>) -> String {
    urls.get("spotify").cloned().unwrap_or_default()
}

fn first_image(images: &[SpotifyImage]) -> String {
    images.first().map(|i| i.url.clone()).unwrap_or_default()
}

impl From<SpotifyTrackArtist> for TrackArtist {
    fn from(artist: SpotifyTrackArtist) -> Self {
        Self {
            spotify_url: spotify_url(&artist.external_urls),
            id: artist.id,
            name: artist.name,
        }
    }
}

impl From<SpotifyAlbum> for Album {
    fn from(album: SpotifyAlbum) -> Self {
        Self {
            image_url: first_image(&album.images),
            spotify_url: spotify_url(&album.external_urls),
            id: album.id,
            name: album.name,
            release_date: album.release_date,
        }
    }
}

impl From<SpotifyTrack> for Track {
    fn from(track: SpotifyTrack) -> Self {
        Self {
            spotify_url: spotify_url(&track.external_urls),
            id: track.id,
            name: track.name,
            artists: track.artists.into_iter().map(Into::into).collect(),
            album: track.album.into(),
            duration_ms: track.duration_ms,
            popularity: track.popularity,
            preview_url: track.preview_url,
            explicit: track.explicit,
        }
    }
}

impl From<SpotifyArtist> for DetailedArtist {
    fn from(artist: SpotifyArtist) -> Self {
        Self {
            spotify_url: spotify_url(&artist.external_urls),
            genres: utils::dedup_preserving_order(artist.genres),
            images: utils::dedup_preserving_order(
                artist.images.into_iter().map(|i| i.url).collect(),
            ),
            followers: artist.followers.map(|f| f.total),
            id: artist.id,
            name: artist.name,
            popularity: artist.popularity,
        }
    }
}

impl From<SpotifyNewReleaseAlbum> for NewRelease {
    fn from(album: SpotifyNewReleaseAlbum) -> Self {
        Self {
            image_url: first_image(&album.images),
            spotify_url: spotify_url(&album.external_urls),
            artists: album
                .artists
                .into_iter()
                .map(|a| NewReleaseArtist {
                    spotify_url: spotify_url(&a.external_urls),
                    id: a.id,
                    name: a.name,
                })
                .collect(),
            id: album.id,
            name: album.name,
            album_type: album.album_type,
            total_tracks: album.total_tracks,
            release_date: album.release_date,
        }
    }
}

impl From<RecommendationsResponse> for Recommendations {
    fn from(response: RecommendationsResponse) -> Self {
        Self {
            tracks: into_tracks(response.tracks),
            seeds: response
                .seeds
                .into_iter()
                .filter_map(|seed| {
                    let seed_type = seed.seed_type.parse::<SeedType>().ok()?;
                    Some(RecommendationSeed {
                        id: seed.id,
                        seed_type,
                        href: seed.href.unwrap_or_default(),
                    })
                })
                .collect(),
        }
    }
}

/// Maps wire tracks to domain tracks, dropping records without an id.
pub fn into_tracks(tracks: Vec<SpotifyTrack>) -> Vec<Track> {
    tracks
        .into_iter()
        .filter(|t| !t.id.is_empty())
        .map(Into::into)
        .collect()
}

/// Maps wire artists to domain artists, dropping records without an id.
pub fn into_artists(artists: Vec<SpotifyArtist>) -> Vec<DetailedArtist> {
    artists
        .into_iter()
        .filter(|a| !a.id.is_empty())
        .map(Into::into)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACK_JSON: &str = r#"{
        "id": "t1",
        "name": "Song",
        "duration_ms": 201000,
        "popularity": 77,
        "preview_url": null,
        "external_urls": {"spotify": "https://open.spotify.com/track/t1"},
        "explicit": true,
        "album": {
            "id": "al1",
            "name": "Record",
            "release_date": "2024-03-01",
            "images": [{"url": "https://i.scdn.co/large", "height": 640, "width": 640},
                       {"url": "https://i.scdn.co/small", "height": 64, "width": 64}],
            "external_urls": {"spotify": "https://open.spotify.com/album/al1"}
        },
        "artists": [{"id": "ar1", "name": "Band", "external_urls": {}}]
    }"#;

    #[test]
    fn test_track_mapping() {
        let wire: SpotifyTrack = serde_json::from_str(TRACK_JSON).unwrap();
        let track: Track = wire.into();

        assert_eq!(track.spotify_url, "https://open.spotify.com/track/t1");
        assert_eq!(track.album.image_url, "https://i.scdn.co/large");
        assert_eq!(track.artists[0].spotify_url, "");
        assert!(track.preview_url.is_none());
        assert!(track.explicit);
    }

    #[test]
    fn test_artist_mapping_dedups_genres_and_images() {
        let wire: SpotifyArtist = serde_json::from_str(
            r#"{
                "id": "a1",
                "name": "Artist",
                "external_urls": {"spotify": "https://open.spotify.com/artist/a1"},
                "genres": ["indie", "rock", "indie"],
                "images": [{"url": "x", "height": null, "width": null},
                           {"url": "x", "height": null, "width": null}],
                "popularity": 50,
                "followers": {"href": null, "total": 1234}
            }"#,
        )
        .unwrap();

        let artist: DetailedArtist = wire.into();
        assert_eq!(artist.genres, vec!["indie", "rock"]);
        assert_eq!(artist.images, vec!["x"]);
        assert_eq!(artist.followers, Some(1234));
    }

    #[test]
    fn test_tracks_without_id_are_dropped() {
        let mut blank: SpotifyTrack = serde_json::from_str(TRACK_JSON).unwrap();
        blank.id = String::new();
        let good: SpotifyTrack = serde_json::from_str(TRACK_JSON).unwrap();

        let tracks = into_tracks(vec![blank, good]);
        assert_eq!(tracks.len(), 1);
    }

    #[test]
    fn test_recommendation_seed_types() {
        let response: RecommendationsResponse = serde_json::from_str(
            r#"{
                "tracks": [],
                "seeds": [
                    {"id": "rock", "type": "GENRE", "href": null},
                    {"id": "a1", "type": "ARTIST", "href": "https://api.spotify.com/v1/artists/a1"},
                    {"id": "x", "type": "PODCAST", "href": null}
                ]
            }"#,
        )
        .unwrap();

        let recommendations: Recommendations = response.into();
        assert_eq!(recommendations.seeds.len(), 2);
        assert_eq!(recommendations.seeds[0].seed_type, SeedType::Genre);
        assert_eq!(recommendations.seeds[1].seed_type, SeedType::Artist);
    }
}
