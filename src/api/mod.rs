//! # API Module
//!
//! HTTP handlers of the short-lived loopback listener that receives the OAuth
//! redirect during `spotcli connect`.
//!
//! ## Endpoints
//!
//! - [`callback`] - `GET /callback?code=..&state=..`. Validates the state,
//!   exchanges the code and hands the outcome to the waiting login flow.
//! - [`health`] - `GET /health`. Reports that the listener is accepting
//!   connections.
//!
//! The listener serves exactly one login attempt. See [`crate::server`] for
//! how it is started and stopped.

mod callback;
mod health;

pub use callback::CallbackState;
pub use callback::callback;
pub use health::health;
