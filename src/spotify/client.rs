use reqwest::{Client, RequestBuilder, Response, StatusCode, header::CONTENT_LENGTH};

use crate::{
    config::AppConfig,
    error::{AuthError, PlayerError},
    types::{ApiErrorResponse, CurrentUser, CurrentlyPlayingResponse, PlaybackSnapshot},
};

/// Thin client for the player and profile endpoints of the Spotify Web API.
///
/// Every call is a single request authenticated with the given access token.
/// Nothing is retried.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
}

impl SpotifyClient {
    pub fn new(config: &AppConfig) -> Result<Self, AuthError> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AuthError::Configuration(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the current playback state.
    ///
    /// `204 No Content` means no active session and maps to a snapshot
    /// without an item.
    pub async fn playback_state(&self, token: &str) -> Result<PlaybackSnapshot, PlayerError> {
        let res = self
            .http
            .get(self.url("/me/player"))
            .bearer_auth(token)
            .send()
            .await?;
        let res = check_status(res).await?;

        if res.status() == StatusCode::NO_CONTENT {
            return Ok(PlaybackSnapshot::default());
        }

        let body = res.json::<CurrentlyPlayingResponse>().await?;
        Ok(PlaybackSnapshot::from(body))
    }

    pub async fn play(&self, token: &str) -> Result<(), PlayerError> {
        self.send_empty(self.http.put(self.url("/me/player/play")), token)
            .await
    }

    pub async fn pause(&self, token: &str) -> Result<(), PlayerError> {
        self.send_empty(self.http.put(self.url("/me/player/pause")), token)
            .await
    }

    pub async fn next(&self, token: &str) -> Result<(), PlayerError> {
        self.send_empty(self.http.post(self.url("/me/player/next")), token)
            .await
    }

    pub async fn previous(&self, token: &str) -> Result<(), PlayerError> {
        self.send_empty(self.http.post(self.url("/me/player/previous")), token)
            .await
    }

    pub async fn shuffle(&self, token: &str, state: bool) -> Result<(), PlayerError> {
        let req = self
            .http
            .put(self.url("/me/player/shuffle"))
            .query(&[("state", state)]);
        self.send_empty(req, token).await
    }

    pub async fn current_user(&self, token: &str) -> Result<CurrentUser, PlayerError> {
        let res = self
            .http
            .get(self.url("/me"))
            .bearer_auth(token)
            .send()
            .await?;
        let res = check_status(res).await?;
        Ok(res.json::<CurrentUser>().await?)
    }

    async fn send_empty(&self, req: RequestBuilder, token: &str) -> Result<(), PlayerError> {
        let res = req
            .bearer_auth(token)
            .header(CONTENT_LENGTH, 0)
            .send()
            .await?;
        check_status(res).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

async fn check_status(res: Response) -> Result<Response, PlayerError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorResponse>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    tracing::warn!(%status, %message, "Spotify API request failed");
    Err(PlayerError::Api { status, message })
}
