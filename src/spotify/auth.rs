use std::{fmt, sync::Arc, time::Duration};

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Response, Url};
use tokio::{net::TcpListener, sync::oneshot};

use crate::{
    api::CallbackState,
    config::AppConfig,
    error::AuthError,
    info, server,
    types::{OAuthToken, PkceMaterial, TokenResponse},
    warning,
};

/// OAuth client identity plus the three token endpoint operations.
///
/// Only the PKCE authorization-code grant and the refresh grant are supported.
pub struct Authenticator {
    config: Arc<AppConfig>,
    http: Client,
}

impl Authenticator {
    pub fn new(config: Arc<AppConfig>) -> Result<Self, AuthError> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AuthError::Configuration(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Builds the authorization endpoint URL for one login attempt.
    ///
    /// Embeds client id, redirect target, scopes, the `S256` challenge method,
    /// the challenge and the state.
    ///
    /// # Example
    ///
    /// ```
    /// let pkce = PkceMaterial::generate()?;
    /// let url = authenticator.authorization_url(&pkce.state, &pkce.code_challenge)?;
    /// // https://accounts.spotify.com/authorize?client_id=...&code_challenge_method=S256&...
    /// ```
    pub fn authorization_url(&self, state: &str, challenge: &str) -> Result<String, AuthError> {
        let client_id = self.config.require_client_id()?;
        let scope = self.config.scopes.join(" ");

        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", client_id),
                ("response_type", "code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("code_challenge_method", "S256"),
                ("code_challenge", challenge),
                ("state", state),
                ("scope", scope.as_str()),
            ],
        )
        .map_err(|e| {
            AuthError::Configuration(format!("invalid auth url '{}': {}", self.config.auth_url, e))
        })?;

        Ok(url.into())
    }

    /// Exchanges an authorization code for a token.
    ///
    /// The state comparison happens before any network traffic: a mismatch
    /// returns [`AuthError::StateMismatch`] without contacting the token
    /// endpoint.
    ///
    /// # Errors
    ///
    /// - [`AuthError::StateMismatch`] if `received_state != expected_state`
    /// - [`AuthError::TokenExchangeFailed`] on transport errors or a
    ///   non-success response
    pub async fn exchange_code(
        &self,
        received_state: &str,
        expected_state: &str,
        code: &str,
        verifier: &str,
    ) -> Result<OAuthToken, AuthError> {
        if received_state != expected_state {
            return Err(AuthError::StateMismatch);
        }

        let client_id = self.config.require_client_id()?;
        let res = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("client_id", client_id),
                ("code", code),
                ("code_verifier", verifier),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?;

        let body = read_token_response(res)
            .await
            .map_err(AuthError::TokenExchangeFailed)?;

        Ok(body.into_token(Utc::now(), None))
    }

    /// Trades the refresh token of `old` for a new token.
    ///
    /// The result replaces `old` wholesale. If the response has no
    /// `expires_in`, the new token expires one hour from now; if it has no
    /// `refresh_token`, the previous one is kept.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NoRefreshToken`] if `old` has no refresh token
    /// - [`AuthError::RefreshFailed`] on transport errors or a non-success
    ///   response
    pub async fn refresh_token(&self, old: &OAuthToken) -> Result<OAuthToken, AuthError> {
        let refresh_token = old.refresh_token().ok_or(AuthError::NoRefreshToken)?;
        let client_id = self.config.require_client_id()?;

        let res = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", client_id),
            ])
            .send()
            .await
            .map_err(|e| AuthError::RefreshFailed(e.to_string()))?;

        let body = read_token_response(res)
            .await
            .map_err(AuthError::RefreshFailed)?;

        Ok(body.into_token(Utc::now(), Some(refresh_token)))
    }
}

async fn read_token_response(res: Response) -> Result<TokenResponse, String> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(format!("{} {}", status, body.trim()));
    }
    res.json::<TokenResponse>().await.map_err(|e| e.to_string())
}

/// Shows the authorization URL to the user.
pub trait AuthorizationPrompt: Send + Sync {
    fn present(&self, url: &str);
}

/// Prints the URL and tries to open it in the default browser.
pub struct BrowserPrompt {
    pub open_browser: bool,
}

impl AuthorizationPrompt for BrowserPrompt {
    fn present(&self, url: &str) {
        info!(
            "Please log in to Spotify by visiting the following page in your browser:\n{}",
            url
        );
        if self.open_browser && webbrowser::open(url).is_err() {
            warning!("Failed to open browser. Please navigate to the URL above manually.");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Idle,
    AwaitingCallback,
    Completed,
    Failed,
}

impl fmt::Display for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoginState::Idle => "idle",
            LoginState::AwaitingCallback => "awaiting-callback",
            LoginState::Completed => "completed",
            LoginState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// First-time login through the browser.
///
/// Generates PKCE material, binds the loopback callback listener, presents
/// the authorization URL and blocks until the listener hands over exactly one
/// outcome. There is no timeout: an abandoned browser tab keeps the caller
/// waiting until the process is interrupted.
pub struct LoginFlow {
    authenticator: Arc<Authenticator>,
    prompt: Arc<dyn AuthorizationPrompt>,
}

impl LoginFlow {
    pub fn new(authenticator: Arc<Authenticator>, prompt: Arc<dyn AuthorizationPrompt>) -> Self {
        Self {
            authenticator,
            prompt,
        }
    }

    /// Runs one login attempt to completion.
    ///
    /// # Errors
    ///
    /// Any failure is terminal for the attempt; nothing is retried.
    /// - [`AuthError::RandomnessUnavailable`] if PKCE material cannot be generated
    /// - [`AuthError::CallbackServer`] if the listener cannot bind
    /// - [`AuthError::StateMismatch`] / [`AuthError::TokenExchangeFailed`] from
    ///   the callback
    pub async fn run(&self) -> Result<OAuthToken, AuthError> {
        let mut state = LoginState::Idle;
        tracing::info!(%state, "Starting login");

        let outcome = self.attempt(&mut state).await;

        state = if outcome.is_ok() {
            LoginState::Completed
        } else {
            LoginState::Failed
        };
        match &outcome {
            Ok(token) => tracing::info!(%state, expiry = %token.expiry, "Login finished"),
            Err(e) => tracing::error!(%state, error = %e, "Login failed"),
        }

        outcome
    }

    async fn attempt(&self, state: &mut LoginState) -> Result<OAuthToken, AuthError> {
        let pkce = PkceMaterial::generate()?;
        let url = self
            .authenticator
            .authorization_url(&pkce.state, &pkce.code_challenge)?;

        let addr = self.authenticator.config().callback_addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AuthError::CallbackServer(format!("cannot bind {}: {}", addr, e)))?;

        let (token_tx, token_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let callback = CallbackState::new(Arc::clone(&self.authenticator), pkce, token_tx);

        tokio::spawn(async move {
            if let Err(e) = server::start_callback_server(listener, callback, shutdown_rx).await {
                tracing::error!(error = %e, "Callback server stopped");
            }
        });

        *state = LoginState::AwaitingCallback;
        tracing::info!(%state, %addr, "Callback listener ready");
        self.prompt.present(&url);

        let spinner = waiting_spinner();
        let outcome = token_rx.await.unwrap_or(Err(AuthError::CallbackAborted));
        spinner.finish_and_clear();

        let _ = shutdown_tx.send(());
        outcome
    }
}

fn waiting_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for authorization in the browser...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
