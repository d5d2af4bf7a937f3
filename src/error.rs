//! Error type shared by every layer of spotinsights.
//!
//! Library code returns [`Res`] and propagates with `?`. The binary turns the
//! final error into a colored message with the `error!`/`warning!` macros.

use thiserror::Error;

/// Errors raised by the Spotify and Last.fm clients, the local stores and
/// the repositories built on top of them.
#[derive(Debug, Error)]
pub enum Error {
    /// A required configuration value is missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failure (connect, timeout, body decoding)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Spotify answered with a non-success status
    #[error("Spotify API error {status}: {message}")]
    Api { status: u16, message: String },

    /// No usable access token, even after a refresh attempt
    #[error("Not authenticated. Please run spotinsights auth")]
    NotAuthenticated,

    /// The token endpoint rejected a code or refresh token
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Last.fm returned an error document
    #[error("Last.fm API error {code}: {message}")]
    LastFm { code: i32, message: String },

    /// Caller supplied parameters that can never succeed
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the user has to log in again to recover from this error.
    pub fn requires_login(&self) -> bool {
        matches!(self, Error::NotAuthenticated | Error::Auth(_))
    }
}

/// Result alias used throughout the crate.
pub type Res<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_login() {
        assert!(Error::NotAuthenticated.requires_login());
        assert!(Error::Auth("invalid_grant".to_string()).requires_login());
        assert!(
            !Error::Api {
                status: 500,
                message: "boom".to_string()
            }
            .requires_login()
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = Error::Api {
            status: 404,
            message: "Not found".to_string(),
        };
        assert_eq!(err.to_string(), "Spotify API error 404: Not found");
    }
}
