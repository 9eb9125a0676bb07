use std::sync::Arc;

use crate::{
    config::{AppConfig, BACKGROUND_REFRESH_INTERVAL},
    error,
    error::PlayerError,
    management::{TokenManager, spawn_background_refresh},
    spotify::client::SpotifyClient,
    success,
    ui::{
        SpotifySession, fullscreen,
        oneline::{self, OneLineOptions},
    },
};

const CONNECT_HINT: &str = "Run `spotcli connect` to connect to Spotify.";

#[derive(Debug, Clone, Copy)]
pub struct PlayerSettings {
    pub oneline: bool,
    pub show_progress: bool,
    pub scroll: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Play,
    Pause,
    Next,
    Previous,
    Toggle,
    Shuffle,
}

/// Displays the current playback.
///
/// Continuous displays (full-screen, scrolling one-line) run the background
/// token refresher for as long as they are open.
pub async fn player(config: Arc<AppConfig>, settings: PlayerSettings) {
    let session = Arc::new(open_session(&config));

    // Login must finish before the terminal is taken over.
    if let Err(e) = session.access_token().await {
        fail(e);
    }

    let continuous = !settings.oneline || settings.scroll > 0;
    let refresher = continuous.then(|| {
        spawn_background_refresh(
            Arc::clone(session.manager()),
            BACKGROUND_REFRESH_INTERVAL,
        )
    });

    let outcome = if settings.oneline {
        let options = OneLineOptions {
            show_progress: settings.show_progress,
            scroll: settings.scroll,
        };
        oneline::run(session.as_ref(), options).await
    } else {
        fullscreen::run(Arc::clone(&session), config.http_timeout).await
    };

    if let Some(handle) = refresher {
        handle.abort();
    }

    if let Err(e) = outcome {
        fail(e);
    }
}

/// Runs a single transport command against the active device.
pub async fn control(config: Arc<AppConfig>, action: PlayerAction) {
    let session = open_session(&config);
    if let Err(e) = run_action(&session, action).await {
        fail(e);
    }
}

async fn run_action(session: &SpotifySession, action: PlayerAction) -> Result<(), PlayerError> {
    let token = session.access_token().await?;
    let client = session.client();

    match action {
        PlayerAction::Play => {
            client.play(&token).await?;
            success!("Playback started");
        }
        PlayerAction::Pause => {
            client.pause(&token).await?;
            success!("Playback paused");
        }
        PlayerAction::Next => {
            client.next(&token).await?;
            success!("Skipped to the next track");
        }
        PlayerAction::Previous => {
            client.previous(&token).await?;
            success!("Back to the previous track");
        }
        PlayerAction::Toggle => {
            let state = client.playback_state(&token).await?;
            if state.is_playing {
                client.pause(&token).await?;
                success!("Playback paused");
            } else {
                client.play(&token).await?;
                success!("Playback resumed");
            }
        }
        PlayerAction::Shuffle => {
            let state = client.playback_state(&token).await?;
            let shuffle = !state.shuffle_state;
            client.shuffle(&token, shuffle).await?;
            success!("Shuffle is now {}", if shuffle { "on" } else { "off" });
        }
    }

    tracing::info!(?action, "Player command completed");
    Ok(())
}

fn open_session(config: &Arc<AppConfig>) -> SpotifySession {
    let manager = match TokenManager::new(Arc::clone(config)) {
        Ok(m) => m,
        Err(e) => error!("Cannot set up authentication. Err: {}", e),
    };
    let client = match SpotifyClient::new(config) {
        Ok(c) => c,
        Err(e) => error!("Cannot create Spotify client. Err: {}", e),
    };
    SpotifySession::new(Arc::new(manager), client)
}

fn fail(e: PlayerError) -> ! {
    match e {
        PlayerError::Auth(e) => error!("{}\n{}", e, CONNECT_HINT),
        e => error!("{}", e),
    }
}
