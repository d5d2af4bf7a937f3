mod auth;
mod cache;

pub use auth::AuthenticationState;
pub use auth::EXPIRY_MARGIN_MS;
pub use auth::TokenManager;
pub use cache::CacheEntry;
pub use cache::CacheStore;
