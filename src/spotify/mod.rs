//! # Spotify Integration Module
//!
//! Integration layer between spotcli and Spotify's accounts service and Web
//! API.
//!
//! ```text
//! CLI / UI
//!    ↓
//! Spotify Integration Layer
//!    ├── auth    (PKCE login, code exchange, refresh)
//!    └── client  (playback state, transport commands, profile)
//!    ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Authentication
//!
//! [`auth`] implements the OAuth 2.0 authorization-code grant with PKCE:
//! 1. **Code Verifier Generation**: random verifier from the OS entropy source
//! 2. **Challenge Creation**: SHA-256 of the verifier, URL-safe base64
//! 3. **Authorization Request**: user is sent to Spotify with challenge and state
//! 4. **Local Callback**: loopback listener receives the code
//! 5. **Token Exchange**: code and verifier are traded for a token
//!
//! Tokens are persisted and renewed by [`crate::management::TokenManager`].
//!
//! ## Playback
//!
//! [`client`] wraps `GET /me/player`, `PUT /me/player/play`,
//! `PUT /me/player/pause`, `POST /me/player/next`, `POST /me/player/previous`,
//! `PUT /me/player/shuffle` and `GET /me`. All requests carry the configured
//! timeout so a hung call cannot stall the display loop.

pub mod auth;
pub mod client;
