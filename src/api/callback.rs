use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tokio::sync::{Mutex, oneshot};

use crate::{
    error::AuthError,
    spotify::auth::Authenticator,
    types::{OAuthToken, PkceMaterial},
};

const LOGIN_COMPLETED: &str = "Login completed! You can now close this tab.";

type TokenSender = oneshot::Sender<Result<OAuthToken, AuthError>>;

/// State of one login attempt shared with the `/callback` handler.
///
/// Holds the only sender of the handoff channel. The first callback takes it,
/// every later request finds the slot empty and is not serviced.
#[derive(Clone)]
pub struct CallbackState {
    authenticator: Arc<Authenticator>,
    pending: Arc<Mutex<Option<PendingLogin>>>,
}

struct PendingLogin {
    pkce: PkceMaterial,
    sender: TokenSender,
}

impl CallbackState {
    pub fn new(authenticator: Arc<Authenticator>, pkce: PkceMaterial, sender: TokenSender) -> Self {
        Self {
            authenticator,
            pending: Arc::new(Mutex::new(Some(PendingLogin { pkce, sender }))),
        }
    }
}

/// Handles the redirect from the authorization server.
///
/// | outcome | status | forwarded |
/// |---|---|---|
/// | token obtained | 200, HTML | `Ok(token)` |
/// | state mismatch | 404 | `Err(StateMismatch)` |
/// | exchange failed or denied | 403 | `Err(TokenExchangeFailed)` |
/// | login already handled | 404 | nothing |
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<CallbackState>,
) -> Response {
    // Held across the exchange so a concurrent second callback waits and then
    // finds the slot empty.
    let mut slot = shared_state.pending.lock().await;
    let Some(PendingLogin { pkce, sender }) = slot.take() else {
        return (StatusCode::NOT_FOUND, "Login already handled.").into_response();
    };

    let received_state = params.get("state").map(String::as_str).unwrap_or_default();

    let outcome = match (params.get("code"), params.get("error")) {
        (Some(code), None) => {
            shared_state
                .authenticator
                .exchange_code(received_state, &pkce.state, code, &pkce.code_verifier)
                .await
        }
        _ if received_state != pkce.state => Err(AuthError::StateMismatch),
        (_, reason) => Err(AuthError::TokenExchangeFailed(format!(
            "authorization denied: {}",
            reason.map(String::as_str).unwrap_or("no code in callback")
        ))),
    };

    let response = match &outcome {
        Ok(_) => Html(LOGIN_COMPLETED).into_response(),
        Err(AuthError::StateMismatch) => {
            tracing::warn!("Callback state does not match the issued state");
            (StatusCode::NOT_FOUND, "404 page not found").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Token exchange failed");
            (StatusCode::FORBIDDEN, "Couldn't get token").into_response()
        }
    };

    if sender.send(outcome).is_err() {
        tracing::warn!("Login caller is gone, dropping callback outcome");
    }

    response
}
