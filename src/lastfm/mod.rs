//! Last.fm API client
//!
//! Provides artist information, global top tags and recent scrobbles, which
//! feed the `stats` commands.

mod client;
mod models;

pub use client::{LastFmClient, RECENT_TRACKS_LIMIT};
