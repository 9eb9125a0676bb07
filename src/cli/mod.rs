//! # CLI Module
//!
//! Command implementations behind the `spotcli` binary. Every command receives
//! the process-wide [`crate::config::AppConfig`] and reports its outcome with
//! the colored status macros; failures end the process with exit code 1.
//!
//! ## Commands
//!
//! - [`connect`] - Runs the browser login if needed and shows the logged in user
//! - [`player`] - Shows the current playback, full-screen or on one line
//! - [`control`] - Play, pause, skip, toggle and shuffle
//!
//! ## Architecture Design
//!
//! ```text
//! CLI Layer (User Interface)
//!     ↓
//! Management Layer (Token lifecycle)
//!     ↓
//! Spotify Layer (Accounts service, Web API)
//!     ↓
//! Network Layer (HTTP Requests)
//! ```
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotcli connect                  # Log in once
//! spotcli player                   # Full-screen player, quit with q
//! spotcli player --oneline         # Print the current track and exit
//! spotcli player -o -s 30          # Scrolling status line, 30 columns wide
//! spotcli player toggle            # Pause or resume
//! ```
//!
//! Authentication failures point the user at `spotcli connect`; playback
//! failures print the message returned by Spotify and are not retried.

mod connect;
mod player;

pub use connect::connect;
pub use player::PlayerAction;
pub use player::PlayerSettings;
pub use player::control;
pub use player::player;
