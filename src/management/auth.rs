use std::{sync::Arc, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{Instant, interval_at},
};

use crate::{
    config::AppConfig,
    error::AuthError,
    management::TokenStore,
    spotify::auth::{AuthorizationPrompt, Authenticator, BrowserPrompt, LoginFlow},
    types::OAuthToken,
};

/// Single entry point for obtaining a usable token.
///
/// Loads the persisted token and transparently runs refresh or the full login
/// flow when needed, persisting every new token before returning it.
pub struct TokenManager {
    store: TokenStore,
    authenticator: Arc<Authenticator>,
    login: LoginFlow,
}

impl TokenManager {
    /// Creates a manager that presents the login URL through the browser.
    pub fn new(config: Arc<AppConfig>) -> Result<Self, AuthError> {
        let prompt = BrowserPrompt {
            open_browser: config.open_browser,
        };
        Self::with_prompt(config, Arc::new(prompt))
    }

    pub fn with_prompt(
        config: Arc<AppConfig>,
        prompt: Arc<dyn AuthorizationPrompt>,
    ) -> Result<Self, AuthError> {
        let store = TokenStore::new(config.token_path.clone());
        let authenticator = Arc::new(Authenticator::new(config)?);
        let login = LoginFlow::new(Arc::clone(&authenticator), prompt);
        Ok(Self {
            store,
            authenticator,
            login,
        })
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Returns a token that is valid at return time.
    ///
    /// 1. A stored, unexpired token is returned as is, without network traffic.
    /// 2. No stored token: full login.
    /// 3. Expired token: refresh, or full login if it has no refresh token.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Expired` and `NoRefreshToken` are handled here and never
    /// returned. Login, refresh and storage failures are propagated.
    pub async fn ensure_valid_token(&self) -> Result<OAuthToken, AuthError> {
        let token = match self.store.load().await {
            // Re-checked: the expiry may pass between load and use.
            Ok(token) if token.is_valid() => return Ok(token),
            Ok(token) => self.refresh_or_login(token).await?,
            Err(AuthError::NotFound) => {
                tracing::info!(path = %self.store.path().display(), "No stored token, starting login");
                self.login_and_save().await?
            }
            Err(AuthError::Expired(token)) => self.refresh_or_login(*token).await?,
            Err(e) => return Err(e),
        };

        ensure_unexpired(token)
    }

    /// Like [`Self::ensure_valid_token`], but never starts the browser login.
    ///
    /// Used on polling paths, where a login cannot be presented and must not
    /// be cut short by a per-tick timeout.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotFound`] if no token is stored
    /// - [`AuthError::NoRefreshToken`] if the stored token expired and cannot
    ///   be refreshed
    /// - refresh and storage failures
    pub async fn refresh_if_expired(&self) -> Result<OAuthToken, AuthError> {
        let expired = match self.store.load().await {
            Ok(token) if token.is_valid() => return Ok(token),
            Ok(token) => token,
            Err(AuthError::Expired(token)) => *token,
            Err(e) => return Err(e),
        };

        tracing::info!(expiry = %expired.expiry, "Stored token expired, refreshing without login");
        let token = self.authenticator.refresh_token(&expired).await?;
        self.store.save(&token).await?;
        ensure_unexpired(token)
    }

    /// Refreshes the stored token regardless of its expiry and persists it.
    ///
    /// Never falls back to login. Used by the background refresher.
    pub async fn refresh_stored(&self) -> Result<OAuthToken, AuthError> {
        let old = self.store.read().await?;
        let token = self.authenticator.refresh_token(&old).await?;
        self.store.save(&token).await?;
        Ok(token)
    }

    async fn refresh_or_login(&self, expired: OAuthToken) -> Result<OAuthToken, AuthError> {
        tracing::info!(expiry = %expired.expiry, "Stored token expired, refreshing");
        match self.authenticator.refresh_token(&expired).await {
            Ok(token) => {
                self.store.save(&token).await?;
                Ok(token)
            }
            Err(AuthError::NoRefreshToken) => {
                tracing::info!("No refresh token available, starting login");
                self.login_and_save().await
            }
            Err(e) => Err(e),
        }
    }

    async fn login_and_save(&self) -> Result<OAuthToken, AuthError> {
        let token = self.login.run().await?;
        self.store.save(&token).await?;
        Ok(token)
    }
}

fn ensure_unexpired(token: OAuthToken) -> Result<OAuthToken, AuthError> {
    if !token.is_valid() {
        return Err(AuthError::RefreshFailed(format!(
            "token endpoint returned a token that expired at {}",
            token.expiry
        )));
    }
    Ok(token)
}

/// Spawns the background refresher of an interactive display session.
///
/// Every `period` the stored token is refreshed unconditionally and persisted.
/// Failures are logged and the loop keeps running. The first refresh happens
/// one full period after the call. Abort the returned handle to stop it.
pub fn spawn_background_refresh(manager: Arc<TokenManager>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            match manager.refresh_stored().await {
                Ok(token) => tracing::info!(expiry = %token.expiry, "Background refresh succeeded"),
                Err(e) => tracing::warn!(error = %e, "Background refresh failed"),
            }
        }
    })
}
