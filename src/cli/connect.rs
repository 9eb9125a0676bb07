use std::sync::Arc;

use crate::{
    config::AppConfig, error, management::TokenManager, spotify::client::SpotifyClient, success,
};

/// Makes sure a usable token is stored, logging in through the browser when
/// necessary, and confirms the session by fetching the current user.
pub async fn connect(config: Arc<AppConfig>) {
    let manager = match TokenManager::new(Arc::clone(&config)) {
        Ok(m) => m,
        Err(e) => error!("Cannot set up authentication. Err: {}", e),
    };

    let token = match manager.ensure_valid_token().await {
        Ok(t) => t,
        Err(e) => error!("Failed to connect to Spotify. Err: {}", e),
    };

    let client = match SpotifyClient::new(&config) {
        Ok(c) => c,
        Err(e) => error!("Cannot create Spotify client. Err: {}", e),
    };

    match client.current_user(&token.access_token).await {
        Ok(user) => {
            let name = user.display_name.filter(|n| !n.is_empty()).unwrap_or(user.id);
            success!("You are logged in as: {}", name);
        }
        Err(e) => error!("Connected, but cannot read your profile. Err: {}", e),
    }
}
