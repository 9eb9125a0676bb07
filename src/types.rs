use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{config::DEFAULT_TOKEN_LIFETIME_SECS, error::AuthError, utils};

/// Persisted OAuth token.
///
/// Serialized as `{access_token, token_type, refresh_token, expiry}` with an
/// RFC 3339 `expiry`. A token is only ever replaced wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expiry: DateTime<Utc>,
}

impl OAuthToken {
    /// True iff the expiry lies strictly after `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry > now
    }

    /// Validity against the current clock. Never cached.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Refresh token, treating an empty string as absent.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Raw response of the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl TokenResponse {
    /// Converts the response into a token obtained at `now`.
    ///
    /// A missing, non-positive or unrepresentable `expires_in` yields an
    /// expiry one hour after `now`. A missing refresh token falls back to
    /// `previous_refresh`.
    pub fn into_token(self, now: DateTime<Utc>, previous_refresh: Option<&str>) -> OAuthToken {
        let lifetime = self
            .expires_in
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);

        let refresh_token = self
            .refresh_token
            .filter(|t| !t.is_empty())
            .or_else(|| previous_refresh.map(String::from));

        // Out-of-range lifetimes from the server fall back to the default.
        let expiry = Duration::try_seconds(lifetime)
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or_else(|| now + Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS));

        OAuthToken {
            access_token: self.access_token,
            token_type: self.token_type,
            refresh_token,
            expiry,
        }
    }
}

/// PKCE material for one authorization round-trip. Never persisted.
#[derive(Debug, Clone)]
pub struct PkceMaterial {
    pub code_verifier: String,
    pub code_challenge: String,
    pub state: String,
}

impl PkceMaterial {
    const VERIFIER_BYTES: usize = 32;
    const STATE_BYTES: usize = 16;

    /// Generates a fresh verifier, its S256 challenge and an independent state.
    pub fn generate() -> Result<Self, AuthError> {
        let code_verifier = utils::generate_random_string(Self::VERIFIER_BYTES)?;
        let code_challenge = utils::generate_code_challenge(&code_verifier);
        let state = utils::generate_random_string(Self::STATE_BYTES)?;
        Ok(Self {
            code_verifier,
            code_challenge,
            state,
        })
    }
}

/// Playback state observed on one poll tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    /// `None` means nothing is playing.
    pub item: Option<PlaybackItem>,
    pub progress_ms: u64,
    pub is_playing: bool,
    pub shuffle_state: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackItem {
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    pub duration_ms: u64,
}

impl PlaybackSnapshot {
    /// Formatted `MM:SS / MM:SS` progress, `None` when nothing is playing.
    pub fn progress(&self) -> Option<String> {
        self.item
            .as_ref()
            .map(|item| utils::format_progress(self.progress_ms, item.duration_ms))
    }
}

impl From<CurrentlyPlayingResponse> for PlaybackSnapshot {
    fn from(res: CurrentlyPlayingResponse) -> Self {
        let item = res.item.map(|item| PlaybackItem {
            name: item.name,
            artists: item.artists.into_iter().map(|a| a.name).collect(),
            album: item.album.map(|a| a.name).unwrap_or_default(),
            duration_ms: item.duration_ms,
        });

        Self {
            item,
            progress_ms: res.progress_ms.unwrap_or_default(),
            is_playing: res.is_playing,
            shuffle_state: res.shuffle_state,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentlyPlayingResponse {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub shuffle_state: bool,
    #[serde(default)]
    pub progress_ms: Option<u64>,
    #[serde(default)]
    pub item: Option<PlayingItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayingItem {
    pub name: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub artists: Vec<ItemArtist>,
    #[serde(default)]
    pub album: Option<ItemAlbum>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemAlbum {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}
