//! Local HTTP server receiving the OAuth redirect.

use std::net::SocketAddr;

use axum::{Extension, Router, routing::get};
use tokio::net::TcpListener;
use tracing::debug;

use crate::{
    api::{self, CallbackState},
    error::{Error, Res},
};

/// Routes of the callback server.
pub fn router(state: CallbackState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Binds the callback listener. Must happen before the browser is opened.
pub async fn bind(addr: SocketAddr) -> Res<TcpListener> {
    TcpListener::bind(addr).await.map_err(|e| {
        Error::Config(format!(
            "Cannot bind callback server to {}: {}. Set SERVER_ADDRESS to a free address",
            addr, e
        ))
    })
}

/// Serves the callback routes until the task is aborted.
pub async fn serve(listener: TcpListener, state: CallbackState) -> Res<()> {
    if let Ok(addr) = listener.local_addr() {
        debug!(%addr, "Callback server listening");
    }
    axum::serve(listener, router(state)).await?;
    Ok(())
}
