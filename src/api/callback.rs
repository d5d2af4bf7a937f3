use axum::{Extension, extract::Query, http::StatusCode, response::Html};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::api::CallbackState;

/// Query parameters Spotify appends to the redirect URI.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

const SUCCESS_PAGE: &str =
    "<h2>Authentication successful.</h2><p>You can close this browser window.</p>";

/// Handles the OAuth redirect from Spotify's authorization server.
///
/// Checks the `state` parameter against the login in progress, exchanges the
/// authorization code for tokens and records the outcome in the shared
/// [`PendingAuth`](crate::types::PendingAuth), where the waiting login picks
/// it up.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(shared): Extension<CallbackState>,
) -> (StatusCode, Html<&'static str>) {
    {
        let mut pending = shared.pending.lock().await;
        let Some(pending) = pending.as_mut() else {
            return (
                StatusCode::CONFLICT,
                Html("<h4>No login in progress.</h4>"),
            );
        };

        // a stray request must not end the login in progress
        if params.state.as_deref() != Some(pending.state.as_str()) {
            warn!(target: "spotinsights::auth", "Ignoring callback with mismatched state");
            return (StatusCode::BAD_REQUEST, Html("<h4>Login failed: state mismatch.</h4>"));
        }

        if let Some(error) = &params.error {
            pending.error = Some(format!("Authorization denied: {}", error));
            return (StatusCode::OK, Html("<h4>Login was cancelled.</h4>"));
        }
    }

    let Some(code) = params.code else {
        record_error(&shared, "Authorization code missing from callback".to_string()).await;
        return (StatusCode::BAD_REQUEST, Html("<h4>Missing authorization code.</h4>"));
    };

    debug!(target: "spotinsights::auth", "Received authorization callback");

    match shared.auth.exchange_code(&code).await {
        Ok(response) => {
            if let Some(pending) = shared.pending.lock().await.as_mut() {
                pending.response = Some(response);
            }
            (StatusCode::OK, Html(SUCCESS_PAGE))
        }
        Err(e) => {
            warn!(target: "spotinsights::auth", error = %e, "Token exchange failed");
            record_error(&shared, e.to_string()).await;
            (StatusCode::BAD_GATEWAY, Html("<h4>Login failed.</h4>"))
        }
    }
}

async fn record_error(shared: &CallbackState, message: String) {
    if let Some(pending) = shared.pending.lock().await.as_mut() {
        pending.error = Some(message);
    }
}
