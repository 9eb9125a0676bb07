use axum::{Extension, Router, routing::get};
use tokio::{net::TcpListener, sync::oneshot};

use crate::{
    api::{self, CallbackState},
    error::AuthError,
};

/// Serves the callback routes on an already bound listener until `shutdown`
/// fires or its sender is dropped.
///
/// In-flight responses are completed before the server returns.
pub async fn start_callback_server(
    listener: TcpListener,
    state: CallbackState,
    shutdown: oneshot::Receiver<()>,
) -> Result<(), AuthError> {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state));

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = shutdown.await;
        })
        .await
        .map_err(|e| AuthError::CallbackServer(e.to_string()))
}
