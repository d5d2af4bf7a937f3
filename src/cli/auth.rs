use crate::{
    cli::spotify_config,
    error, info,
    management::{AuthenticationState, TokenManager},
    spotify::{self, AuthService},
    success, utils, warning,
};

pub async fn auth() {
    let config = spotify_config();
    let mut tokens = TokenManager::new(TokenManager::default_path());

    match spotify::auth::auth(config, &mut tokens).await {
        Ok(()) => success!("Authentication completed successfully."),
        Err(e) => error!("Authentication failed. Err: {}", e),
    }
}

pub async fn logout() {
    let mut tokens = TokenManager::new(TokenManager::default_path());
    match tokens.clear_tokens().await {
        Ok(()) => success!("Logged out."),
        Err(e) => error!("Cannot remove stored tokens. Err: {}", e),
    }
}

pub async fn status() {
    let mut tokens = match TokenManager::load(TokenManager::default_path()).await {
        Ok(tokens) => tokens,
        Err(e) => error!("Cannot read stored tokens. Err: {}", e),
    };

    if tokens.is_token_expired(utils::now_ms()) {
        if let Some(refresh_token) = tokens.refresh_token().map(str::to_string) {
            info!("Access token expired, refreshing...");
            refresh(&mut tokens, &refresh_token).await;
        }
    }

    match (tokens.authentication_state(), tokens.current_token()) {
        (AuthenticationState::Authenticated, Some(token)) => {
            success!("Authenticated.");
            info!(
                "Access token {}",
                utils::describe_expiry(token.expires_at_ms, utils::now_ms())
            );
            if token.refresh_token.is_none() {
                warning!("No refresh token stored; you will need to log in again once it expires.");
            }
            if !token.scope.is_empty() {
                info!("Scopes: {}", token.scope);
            }
        }
        _ => warning!("Not authenticated. Run `spotinsights auth` to log in."),
    }
}

/// Refreshes the stored tokens; any failure clears them.
async fn refresh(tokens: &mut TokenManager, refresh_token: &str) {
    let outcome = match AuthService::new(spotify_config()) {
        Ok(service) => match service.refresh_access_token(refresh_token).await {
            Ok(response) => tokens.save_tokens(response).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };

    if let Err(e) = outcome {
        warning!("Token refresh failed: {}", e);
        if let Err(e) = tokens.clear_tokens().await {
            warning!("Cannot remove stored tokens: {}", e);
        }
    }
}
