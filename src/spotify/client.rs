use std::{sync::Arc, time::Duration};

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::{sync::Mutex, time::sleep};
use tracing::{debug, warn};

use crate::{
    config::SpotifyConfig,
    error::{Error, Res},
    management::TokenManager,
    spotify::{auth::AuthService, models::ErrorBody},
    utils, warning,
};

/// Longest `Retry-After` the client is willing to sleep through.
pub const MAX_RETRY_AFTER_SECS: u64 = 120;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated Spotify Web API client.
///
/// Every request goes through [`SpotifyClient::get`], which attaches the
/// bearer token, refreshes it ahead of expiry or after a 401, and waits out
/// short rate limits. The token store sits behind one async mutex, so
/// concurrent requests that hit an expired token trigger a single refresh.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    auth: AuthService,
    tokens: Arc<Mutex<TokenManager>>,
}

impl SpotifyClient {
    pub fn new(config: &SpotifyConfig, tokens: TokenManager) -> Res<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            auth: AuthService::new(config.clone())?,
            tokens: Arc::new(Mutex::new(tokens)),
        })
    }

    /// Shared handle to the token store.
    pub fn tokens(&self) -> Arc<Mutex<TokenManager>> {
        Arc::clone(&self.tokens)
    }

    /// Sends an authenticated GET to `path` below the API base URL and
    /// decodes the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Res<T> {
        let url = format!("{}/{}", self.api_url, path.trim_start_matches('/'));
        let request = || self.http.get(&url).query(query);

        let mut token = self.bearer().await;
        let mut refreshed = false;
        let mut rate_limited = false;

        loop {
            let response = with_bearer(request(), token.as_deref()).send().await?;

            match response.status() {
                StatusCode::UNAUTHORIZED if !refreshed => {
                    refreshed = true;
                    debug!(target: "spotinsights::auth", path, "Request unauthorized, refreshing token");
                    token = self.refresh_after_unauthorized(token.as_deref()).await;
                    if token.is_none() {
                        return Err(Error::NotAuthenticated);
                    }
                }
                StatusCode::TOO_MANY_REQUESTS if !rate_limited => {
                    rate_limited = true;
                    let retry_after = retry_after_secs(&response);
                    if retry_after > MAX_RETRY_AFTER_SECS {
                        warning!(
                            "Retry after has reached an abnormal high of {} seconds. Try again later.",
                            retry_after
                        );
                        return decode(response).await;
                    }
                    warn!(path, retry_after, "Rate limited, waiting before retry");
                    sleep(Duration::from_secs(retry_after)).await;
                }
                _ => return decode(response).await,
            }
        }
    }

    /// Current access token, refreshed first if it is about to expire.
    ///
    /// A failed refresh clears the store; the request then goes out without
    /// a bearer header and the resulting 401 is surfaced to the caller.
    async fn bearer(&self) -> Option<String> {
        let mut tokens = self.tokens.lock().await;

        if tokens.is_token_expired(utils::now_ms()) && tokens.refresh_token().is_some() {
            debug!(target: "spotinsights::auth", "Access token expired, refreshing");
            self.refresh_locked(&mut tokens).await;
        }

        tokens.access_token().map(str::to_string)
    }

    /// Handles a 401 for a request sent with `rejected`.
    ///
    /// If another request already replaced the token while this one waited
    /// for the lock, the stored token is reused instead of refreshing again.
    async fn refresh_after_unauthorized(&self, rejected: Option<&str>) -> Option<String> {
        let mut tokens = self.tokens.lock().await;

        if let Some(current) = tokens.access_token() {
            if Some(current) != rejected {
                return Some(current.to_string());
            }
        }

        if tokens.refresh_token().is_none() {
            return None;
        }

        self.refresh_locked(&mut tokens).await;
        tokens.access_token().map(str::to_string)
    }

    /// Refreshes with the stored refresh token and persists the result.
    /// Any failure leaves the store cleared.
    async fn refresh_locked(&self, tokens: &mut TokenManager) {
        let Some(refresh_token) = tokens.refresh_token().map(str::to_string) else {
            return;
        };

        let outcome = match self.auth.refresh_access_token(&refresh_token).await {
            Ok(response) => tokens.save_tokens(response).await,
            Err(e) => Err(e),
        };

        if let Err(e) = outcome {
            warn!(target: "spotinsights::auth", error = %e, "Token refresh failed, clearing tokens");
            if let Err(e) = tokens.clear_tokens().await {
                warn!(target: "spotinsights::auth", error = %e, "Failed to clear tokens");
            }
        }
    }
}

fn with_bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(1)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Res<T> {
    let status = response.status();
    if status.is_success() {
        let body = response.text().await?;
        return Ok(serde_json::from_str(&body)?);
    }

    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::NotAuthenticated);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}
