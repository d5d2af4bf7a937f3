use std::{
    net::SocketAddr,
    str::FromStr,
    sync::Arc,
    time::{Duration, Instant},
};

use reqwest::{Client, Url, header::AUTHORIZATION};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    api::CallbackState,
    config::{self, SpotifyConfig},
    error::{Error, Res},
    info,
    management::TokenManager,
    server,
    types::{AuthResponse, PendingAuth},
    utils, warning,
};

/// How long the interactive login waits for the browser redirect.
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(120);

const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Client for the Spotify accounts service.
///
/// Talks to the token endpoint with its own HTTP client, so token requests
/// never pass through the bearer-token interceptor in [`super::SpotifyClient`].
#[derive(Debug, Clone)]
pub struct AuthService {
    http: Client,
    config: SpotifyConfig,
}

impl AuthService {
    pub fn new(config: SpotifyConfig) -> Res<Self> {
        let http = Client::builder().timeout(TOKEN_REQUEST_TIMEOUT).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &SpotifyConfig {
        &self.config
    }

    /// Builds the URL the user opens to grant access.
    pub fn authorization_url(&self, state: &str) -> Res<String> {
        let scope = self.config.scopes.join(" ");
        debug!(target: "spotinsights::auth", "Generating authorization URL with scopes: {}", scope);

        let url = Url::parse_with_params(
            &self.config.authorize_url(),
            &[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| Error::Config(format!("Invalid accounts URL: {}", e)))?;

        Ok(url.to_string())
    }

    /// Exchanges an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Res<AuthResponse> {
        debug!(
            target: "spotinsights::auth",
            "Getting access token with auth code: {}...",
            code.chars().take(5).collect::<String>()
        );

        let response = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.config.redirect_uri),
            ])
            .await?;

        debug!(
            target: "spotinsights::auth",
            "Successfully obtained access token, expires in: {} seconds",
            response.expires_in
        );
        Ok(response)
    }

    /// Exchanges a refresh token for a new access token.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Res<AuthResponse> {
        debug!(target: "spotinsights::auth", "Attempting to refresh access token");

        let response = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        debug!(
            target: "spotinsights::auth",
            "Successfully refreshed access token, expires in: {} seconds",
            response.expires_in
        );
        Ok(response)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Res<AuthResponse> {
        let response = self
            .http
            .post(self.config.token_url())
            .header(
                AUTHORIZATION,
                utils::basic_auth_header(&self.config.client_id, &self.config.client_secret),
            )
            .form(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<TokenErrorBody>(&body) {
                Ok(err) => match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                },
                Err(_) => format!("token endpoint returned {}", status),
            };
            warn!(target: "spotinsights::auth", status = status.as_u16(), "Token request rejected: {}", message);
            return Err(Error::Auth(message));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Runs the interactive authorization-code login.
///
/// Existing tokens are cleared first. The local callback server is started,
/// the authorization URL is opened in the browser (or printed if that fails)
/// and the function waits up to [`AUTH_TIMEOUT`] for the callback to deliver
/// tokens, which are then persisted through `tokens`.
pub async fn auth(config: SpotifyConfig, tokens: &mut TokenManager) -> Res<()> {
    let auth = Arc::new(AuthService::new(config)?);

    tokens.clear_tokens().await?;

    let state = utils::generate_state();
    let pending = Arc::new(Mutex::new(Some(PendingAuth::new(state.clone()))));

    let addr = SocketAddr::from_str(&config::server_addr())
        .map_err(|e| Error::Config(format!("Failed to parse server address: {}", e)))?;
    let listener = server::bind(addr).await?;

    let server_state = CallbackState {
        pending: Arc::clone(&pending),
        auth: Arc::clone(&auth),
    };
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, server_state).await {
            warn!("Callback server stopped: {}", e);
        }
    });

    let auth_url = auth.authorization_url(&state)?;
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        );
    } else {
        info!("Waiting for authorization in your browser...");
    }

    let result = wait_for_token(pending, AUTH_TIMEOUT).await;
    server_handle.abort();

    tokens.save_tokens(result?).await
}

/// Polls the shared state until the callback stored tokens or an error.
pub async fn wait_for_token(
    pending: Arc<Mutex<Option<PendingAuth>>>,
    max_wait: Duration,
) -> Res<AuthResponse> {
    let start = Instant::now();

    while start.elapsed() < max_wait {
        {
            let lock = pending.lock().await;
            if let Some(p) = lock.as_ref() {
                if let Some(response) = &p.response {
                    return Ok(response.clone());
                }
                if let Some(error) = &p.error {
                    return Err(Error::Auth(error.clone()));
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    Err(Error::Auth("Authentication timed out".to_string()))
}
