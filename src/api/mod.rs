//! # API Module
//!
//! HTTP endpoints of the local server that receives the OAuth redirect.
//!
//! ## Endpoints
//!
//! - [`callback`] - `GET /callback`, validates `state`, exchanges the
//!   authorization code through [`AuthService`] and hands the tokens to the
//!   waiting login
//! - [`health`] - `GET /health`, name, status and version as JSON
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! let state = CallbackState {
//!     pending: Arc::new(Mutex::new(Some(PendingAuth::new(state)))),
//!     auth: Arc::new(AuthService::new(config)?),
//! };
//! let app = server::router(state);
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{spotify::AuthService, types::PendingAuth};

pub mod callback;
pub mod health;

pub use callback::callback;
pub use health::health;

/// State shared between the login flow and the callback handler.
#[derive(Debug, Clone)]
pub struct CallbackState {
    pub pending: Arc<Mutex<Option<PendingAuth>>>,
    pub auth: Arc<AuthService>,
}
