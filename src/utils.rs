use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{TryRngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

use crate::error::AuthError;

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generates a random string for PKCE verifiers and OAuth states.
///
/// Draws `size` bytes from the operating system's entropy source, maps each
/// byte into the 62-symbol alphanumeric alphabet and encodes the result as
/// URL-safe base64 without padding. A 32 byte draw gives a 43 character
/// verifier.
///
/// # Errors
///
/// Returns [`AuthError::RandomnessUnavailable`] if the entropy source fails.
/// There is no fallback to a weaker generator.
pub fn generate_random_string(size: usize) -> Result<String, AuthError> {
    let mut values = vec![0u8; size];
    OsRng
        .try_fill_bytes(&mut values)
        .map_err(|e| AuthError::RandomnessUnavailable(e.to_string()))?;

    for b in values.iter_mut() {
        *b = ALPHANUMERIC[*b as usize % ALPHANUMERIC.len()];
    }

    Ok(URL_SAFE_NO_PAD.encode(values))
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Formats elapsed and total milliseconds as `MM:SS / MM:SS`.
///
/// Values are truncated, never rounded, and never clamped: an elapsed time
/// beyond the total is shown as reported.
pub fn format_progress(elapsed_ms: u64, duration_ms: u64) -> String {
    format!("{} / {}", format_clock(elapsed_ms), format_clock(duration_ms))
}

fn format_clock(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn join_artists(artists: &[String]) -> String {
    artists.join(", ")
}
