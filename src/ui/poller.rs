use std::{future::Future, sync::Arc};

use crate::{
    error::PlayerError,
    management::TokenManager,
    spotify::client::SpotifyClient,
    types::PlaybackSnapshot,
    utils,
};

pub const NOTHING_PLAYING: &str = "No Song Playing";
const NO_PROGRESS: &str = "00:00 / 00:00";

/// Anything that can produce one playback snapshot per poll tick.
pub trait PlaybackSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<PlaybackSnapshot, PlayerError>> + Send;
}

/// Authenticated view of the remote player.
///
/// Every fetch goes through [`TokenManager::refresh_if_expired`], so an
/// expired token is refreshed on the polling path even when the background
/// refresher has stopped succeeding. Polling never starts a login: a missing
/// or unrefreshable token ends the display with an auth error.
pub struct SpotifySession {
    manager: Arc<TokenManager>,
    client: SpotifyClient,
}

impl SpotifySession {
    pub fn new(manager: Arc<TokenManager>, client: SpotifyClient) -> Self {
        Self { manager, client }
    }

    pub fn manager(&self) -> &Arc<TokenManager> {
        &self.manager
    }

    pub fn client(&self) -> &SpotifyClient {
        &self.client
    }

    /// Returns a valid access token, logging in or refreshing as needed.
    pub async fn access_token(&self) -> Result<String, PlayerError> {
        let token = self.manager.ensure_valid_token().await?;
        Ok(token.access_token)
    }
}

impl PlaybackSource for SpotifySession {
    fn fetch(&self) -> impl Future<Output = Result<PlaybackSnapshot, PlayerError>> + Send {
        async move {
            let token = self.manager.refresh_if_expired().await?;
            self.client.playback_state(&token.access_token).await
        }
    }
}

/// What the full-screen renderer draws.
///
/// Starts in the "nothing playing" state and is updated from each fetched
/// snapshot. Width and height are the last known terminal size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    pub title: String,
    pub artists: String,
    pub album: String,
    pub progress: String,
    pub is_playing: bool,
    pub width: u16,
    pub height: u16,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            title: NOTHING_PLAYING.to_string(),
            artists: String::new(),
            album: String::new(),
            progress: NO_PROGRESS.to_string(),
            is_playing: false,
            width: 0,
            height: 0,
        }
    }
}

impl DisplayState {
    /// Replaces the track fields with `snapshot`.
    ///
    /// Returns `false` if nothing is playing; the fields are then reset to the
    /// "nothing playing" indicator. Terminal dimensions are kept.
    pub fn apply(&mut self, snapshot: &PlaybackSnapshot) -> bool {
        let Some(item) = &snapshot.item else {
            *self = Self {
                width: self.width,
                height: self.height,
                ..Self::default()
            };
            return false;
        };

        self.title = item.name.clone();
        self.artists = utils::join_artists(&item.artists);
        self.album = item.album.clone();
        self.progress = utils::format_progress(snapshot.progress_ms, item.duration_ms);
        self.is_playing = snapshot.is_playing;
        true
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }
}
