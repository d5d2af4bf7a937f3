//! Repositories between the API clients and the command layer.
//!
//! Top tracks and top artists are kept in the on-disk
//! [`CacheStore`](crate::management::CacheStore) and only refreshed when
//! missing or stale:
//!
//! | data            | cache           | window |
//! |-----------------|-----------------|--------|
//! | top tracks      | disk, per range | 24 h   |
//! | top artists     | disk, per range | 1 h    |
//! | new releases    | memory          | -      |
//! | recommendations | none            | -      |
//!
//! Everything else goes straight to the network.

mod catalog;
mod lastfm;
mod releases;
mod top_artists;
mod top_tracks;

pub use catalog::{ArtistRepository, DEFAULT_MARKET, RecommendationsRepository, TrackRepository};
pub use lastfm::{LastFmRepository, TOP_TAGS_LIMIT};
pub use releases::{NEW_RELEASES_FETCH_LIMIT, NewReleasesRepository};
pub use top_artists::{
    TOP_ARTISTS_CACHE_MS, TOP_ARTISTS_FETCH_LIMIT, TopArtistsRepository,
    cache_key as top_artists_cache_key,
};
pub use top_tracks::{
    TOP_TRACKS_CACHE_MS, TOP_TRACKS_FETCH_LIMIT, TopTracksRepository,
    cache_key as top_tracks_cache_key,
};
