//! Configuration management for spotcli.
//!
//! This module builds the [`AppConfig`] object that every component receives
//! by reference. Nothing reads configuration from ambient globals after
//! `main` has constructed it.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the per-user config directory
//! 3. Application defaults

use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use crate::error::AuthError;

/// Interval between two playback fetches in continuous display modes.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Interval of the background token refresher.
pub const BACKGROUND_REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Pause after observing that nothing is playing.
pub const IDLE_PAUSE: Duration = Duration::from_secs(5);

/// Lifetime assigned to a token when the token endpoint omits `expires_in`.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";
const DEFAULT_CALLBACK_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SCOPES: &[&str] = &[
    "user-read-playback-state",
    "user-read-currently-playing",
    "user-modify-playback-state",
    "user-read-private",
];
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration shared by the authenticator, token manager and poller.
///
/// Constructed once at process start. Tests build it with [`AppConfig::new`]
/// and override the endpoints and paths they need.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OAuth client id. Empty when not configured.
    pub client_id: String,
    /// Redirect target registered with the authorization server.
    pub redirect_uri: String,
    /// Loopback address the callback listener binds to.
    pub callback_addr: SocketAddr,
    /// Scopes requested during authorization.
    pub scopes: Vec<String>,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    /// Location of the persisted token file.
    pub token_path: PathBuf,
    /// Upper bound for every outgoing HTTP request.
    pub http_timeout: Duration,
    /// Whether the login flow tries to launch a browser.
    pub open_browser: bool,
}

impl AppConfig {
    /// Creates a configuration with default endpoints for the given client id.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            callback_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            token_path: default_token_path(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            open_browser: true,
        }
    }

    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if a variable is present but
    /// cannot be parsed (callback address, timeout).
    ///
    /// # Example
    ///
    /// ```
    /// let config = AppConfig::from_env()?;
    /// println!("token stored at {}", config.token_path.display());
    /// ```
    pub fn from_env() -> Result<Self, AuthError> {
        let mut config = Self::new(env::var("SPOTIFY_CLIENT_ID").unwrap_or_default());

        if let Ok(uri) = env::var("SPOTCLI_REDIRECT_URI") {
            config.redirect_uri = uri;
        }

        let addr = env::var("SPOTCLI_CALLBACK_ADDR").unwrap_or(DEFAULT_CALLBACK_ADDR.into());
        config.callback_addr = addr.parse().map_err(|e| {
            AuthError::Configuration(format!("invalid SPOTCLI_CALLBACK_ADDR '{}': {}", addr, e))
        })?;

        if let Ok(scopes) = env::var("SPOTCLI_SCOPES") {
            config.scopes = scopes.split_whitespace().map(String::from).collect();
        }
        if let Ok(url) = env::var("SPOTIFY_API_AUTH_URL") {
            config.auth_url = url;
        }
        if let Ok(url) = env::var("SPOTIFY_API_TOKEN_URL") {
            config.token_url = url;
        }
        if let Ok(url) = env::var("SPOTIFY_API_URL") {
            config.api_url = url;
        }
        if let Ok(path) = env::var("SPOTCLI_TOKEN_PATH") {
            config.token_path = PathBuf::from(path);
        }
        if let Ok(secs) = env::var("SPOTCLI_HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|e| {
                AuthError::Configuration(format!("invalid SPOTCLI_HTTP_TIMEOUT_SECS: {}", e))
            })?;
            config.http_timeout = Duration::from_secs(secs);
        }
        config.open_browser = env::var_os("SPOTCLI_NO_BROWSER").is_none();

        Ok(config)
    }

    /// Returns the client id, failing if none was configured.
    pub fn require_client_id(&self) -> Result<&str, AuthError> {
        if self.client_id.trim().is_empty() {
            return Err(AuthError::Configuration(
                "SPOTIFY_CLIENT_ID must be set".to_string(),
            ));
        }
        Ok(&self.client_id)
    }
}

/// Loads environment variables from the `.env` file in the config directory.
///
/// Creates the `spotcli` config directory if needed. A missing `.env` file is
/// not an error: the environment and defaults are used instead.
///
/// # Directory Structure
///
/// - Linux: `~/.config/spotcli/.env`
/// - macOS: `~/Library/Application Support/spotcli/.env`
/// - Windows: `%APPDATA%/spotcli/.env`
pub async fn load_env() -> Result<(), String> {
    let path = config_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(format!("{}: {}", path.display(), e)),
    }
}

/// Per-user config directory of the application.
pub fn config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotcli");
    path
}

fn default_token_path() -> PathBuf {
    config_dir().join("token.json")
}
