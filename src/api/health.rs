use axum::response::Json;
use serde_json::{Value, json};

use crate::config::APP_NAME;

/// Liveness check of the callback server.
pub async fn health() -> Json<Value> {
    Json(json!({
        "name": APP_NAME,
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
