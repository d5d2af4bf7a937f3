//! # Spotify Integration Module
//!
//! Authenticated access to the Spotify Web API and the accounts service.
//!
//! ## Architecture
//!
//! ```text
//! Repositories / CLI
//!          ↓
//! SpotifyClient (bearer token, refresh, rate limits)
//!     ├── tracks           top tracks, track details, artist top tracks
//!     ├── artists          top artists, artist details
//!     ├── releases         new releases
//!     └── recommendations  recommendations, genre seeds
//!          ↓
//! AuthService (token endpoint, own HTTP client)
//!          ↓
//! Spotify Accounts / Web API
//! ```
//!
//! ## Authentication
//!
//! [`auth`] implements the OAuth 2.0 authorization-code flow with a client
//! secret. The interactive login starts the local callback server, opens the
//! browser and stores the tokens once the callback has exchanged the code.
//!
//! ## Token handling
//!
//! [`SpotifyClient`] wraps every request:
//!
//! - **Proactive refresh**: a token within four minutes of expiry is
//!   refreshed before the request goes out
//! - **Reactive refresh**: a `401` triggers one refresh and one replay
//! - **Single flight**: the token store is guarded by one async mutex; a
//!   request that finds the token already replaced reuses it
//! - **Failure**: a failed refresh clears the stored tokens and the request
//!   fails with [`crate::Error::NotAuthenticated`]
//!
//! ## Rate limiting
//!
//! A `429` with `Retry-After` of at most two minutes is waited out and the
//! request replayed once. Longer waits are reported and returned as errors.
//!
//! ## Usage
//!
//! ```rust
//! let tokens = TokenManager::load(TokenManager::default_path()).await?;
//! let client = SpotifyClient::new(&SpotifyConfig::from_env()?, tokens)?;
//!
//! let tracks = client.top_tracks(TimeRange::ShortTerm, 50, 0).await?;
//! let releases = client.new_releases(None, 20, 0).await?;
//! ```

pub mod artists;
pub mod auth;
pub mod client;
pub mod models;
pub mod recommendations;
pub mod releases;
pub mod tracks;

pub use auth::AuthService;
pub use client::SpotifyClient;
