mod auth;
mod store;

pub use auth::TokenManager;
pub use auth::spawn_background_refresh;
pub use store::TokenStore;
