use std::{io::ErrorKind, path::PathBuf};

use tracing::debug;

use crate::{
    config,
    error::Res,
    types::{AuthResponse, Token},
};

/// Tokens are treated as expired this long before Spotify would reject them.
pub const EXPIRY_MARGIN_MS: i64 = 240 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationState {
    Authenticated,
    Unauthenticated,
}

/// File-backed store for the OAuth tokens.
///
/// Every mutation is written through to disk so that a refreshed token
/// survives the process.
#[derive(Debug)]
pub struct TokenManager {
    path: PathBuf,
    token: Option<Token>,
}

impl TokenManager {
    pub fn new(path: PathBuf) -> Self {
        TokenManager { path, token: None }
    }

    pub fn default_path() -> PathBuf {
        config::cache_dir().join("token.json")
    }

    /// Loads the store from `path`. A missing file yields an empty store.
    pub async fn load(path: PathBuf) -> Res<Self> {
        let token = match async_fs::read_to_string(&path).await {
            Ok(content) => Some(serde_json::from_str::<Token>(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, token })
    }

    /// Stores a token endpoint response.
    ///
    /// Spotify may omit `refresh_token` on refresh; the previous one is kept
    /// in that case.
    pub async fn save_tokens(&mut self, response: AuthResponse) -> Res<()> {
        let refresh_token = response
            .refresh_token
            .or_else(|| self.refresh_token().map(str::to_string));

        self.token = Some(Token {
            access_token: response.access_token,
            refresh_token,
            scope: response.scope,
            expires_at_ms: crate::utils::now_ms() + (response.expires_in as i64) * 1000,
        });
        debug!(target: "spotinsights::auth", "Saved tokens, expires in {}s", response.expires_in);
        self.persist().await
    }

    pub async fn clear_tokens(&mut self) -> Res<()> {
        self.token = None;
        match async_fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        debug!(target: "spotinsights::auth", "Cleared stored tokens");
        Ok(())
    }

    /// A missing token counts as expired.
    pub fn is_token_expired(&self, now_ms: i64) -> bool {
        let expires_at = self.token.as_ref().map_or(0, |t| t.expires_at_ms);
        now_ms >= expires_at - EXPIRY_MARGIN_MS
    }

    pub fn access_token(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.access_token.as_str())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.token.as_ref().and_then(|t| t.refresh_token.as_deref())
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn authentication_state(&self) -> AuthenticationState {
        if self.access_token().is_some() {
            AuthenticationState::Authenticated
        } else {
            AuthenticationState::Unauthenticated
        }
    }

    async fn persist(&self) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}
