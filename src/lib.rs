//! Spotify companion CLI library
//!
//! This library provides the building blocks of `spotcli`: browser-based PKCE
//! login with a local callback listener, a persisted and self-renewing OAuth
//! token, a small Spotify Web API client and two playback displays.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local callback listener
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration object, constants and `.env` loading
//! - `error` - Error types of authentication and playback
//! - `logging` - File-based diagnostics
//! - `management` - Token persistence and lifecycle
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Authenticator, login flow and Web API client
//! - `types` - Data structures and type definitions
//! - `ui` - Playback polling and rendering
//! - `utils` - PKCE and formatting helpers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use spotcli::{config::AppConfig, management::TokenManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), spotcli::error::AuthError> {
//!     let manager = TokenManager::new(Arc::new(AppConfig::from_env()?))?;
//!     let token = manager.ensure_valid_token().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod ui;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Please log in to Spotify by visiting the following page");
/// info!("Token stored at {}", path.display());
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations. Used to provide positive feedback
/// when operations complete successfully.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// success!("Playback paused");
/// success!("You are logged in as: {}", name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Used for unrecoverable errors
/// that require immediate program termination.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal errors where
/// recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// error!("Failed to connect to Spotify. Err: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Creates a formatted output line with a yellow "!" indicator to highlight
/// potential issues or important notices that don't require program termination.
/// Used for recoverable issues or important information that users should notice.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// warning!("Failed to open browser. Please navigate to the URL above manually.");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
