use std::{
    io,
    path::{Path, PathBuf},
};

use async_fs::OpenOptions;
use futures::AsyncWriteExt;

use crate::{error::AuthError, types::OAuthToken};

/// Reads and writes the persisted OAuth token.
///
/// Writes go to a uniquely named sibling file that is renamed over the token
/// file, so a reader sees either the old or the new token, never a partial one.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the token and checks it against the current time.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotFound`] if no token was saved, or the file is unreadable
    ///   as a token.
    /// - [`AuthError::Expired`] carrying the stale token if its expiry has passed.
    pub async fn load(&self) -> Result<OAuthToken, AuthError> {
        let token = self.read().await?;
        if !token.is_valid() {
            return Err(AuthError::Expired(Box::new(token)));
        }
        Ok(token)
    }

    /// Loads the token without looking at its expiry.
    pub async fn read(&self) -> Result<OAuthToken, AuthError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AuthError::NotFound);
            }
            Err(e) => return Err(AuthError::Storage(e)),
        };

        serde_json::from_str(&content).map_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable token file");
            AuthError::NotFound
        })
    }

    /// Persists the token, creating the parent directory if needed.
    pub async fn save(&self, token: &OAuthToken) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(token)?;
        let tmp = self.temp_path();
        if let Err(e) = write_private(&tmp, json.as_bytes()).await {
            let _ = async_fs::remove_file(&tmp).await;
            return Err(AuthError::Storage(e));
        }

        if let Err(e) = async_fs::rename(&tmp, &self.path).await {
            let _ = async_fs::remove_file(&tmp).await;
            return Err(AuthError::Storage(e));
        }

        tracing::debug!(path = %self.path.display(), expiry = %token.expiry, "Saved token");
        Ok(())
    }

    // Unique per write: the background refresher and the poll path may save
    // concurrently within one process.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "token.json".to_string());
        self.path
            .with_file_name(format!(".{}.{:016x}.tmp", name, rand::random::<u64>()))
    }
}

// Owner-only from creation on Unix; the token is never readable by others.
async fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use async_fs::unix::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).await?;
    file.write_all(contents).await?;
    file.flush().await?;
    file.sync_all().await
}
