use reqwest::StatusCode;
use thiserror::Error;

use crate::types::OAuthToken;

/// Failures of the authentication and token lifecycle.
///
/// `NotFound`, `Expired` and `NoRefreshToken` are recoverable states handled
/// inside [`crate::management::TokenManager`]; they never reach the command
/// layer from `ensure_valid_token`.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Secure randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    #[error("No token has been saved yet")]
    NotFound,

    #[error("Stored token expired at {}", .0.expiry)]
    Expired(Box<OAuthToken>),

    #[error("State mismatch in authorization callback")]
    StateMismatch,

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Stored token carries no refresh token")]
    NoRefreshToken,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Token storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Callback server error: {0}")]
    CallbackServer(String),

    #[error("Login callback was abandoned before a token was delivered")]
    CallbackAborted,
}

/// Failures of calls against the remote playback API.
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Spotify API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}
