use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::token::AccessToken;
use crate::error::TokenError;
use crate::helpers::fs::write_atomic;
use crate::utils::constants::SECRET_FILE_MODE;

/// On-disk layout of the access token cache.
#[derive(Debug, Serialize, Deserialize)]
struct CachedToken {
    access_token: String,
    /// Older caches store fractional seconds.
    expires_at: f64,
}

/// Access token cache persisted as JSON, shared by every invocation of the CLI.
#[derive(Debug, Clone)]
pub struct TokenCacheStore {
    path: PathBuf,
}

impl TokenCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached token if the file exists and parses. Any problem reads as a miss.
    pub async fn read(&self) -> Option<AccessToken> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("token cache '{}' not found", self.path.display());
                return None;
            }
            Err(err) => {
                warn!("token cache '{}' unreadable, ignoring: {}", self.path.display(), err);
                return None;
            }
        };

        match serde_json::from_str::<CachedToken>(&content) {
            Ok(cached) if cached.expires_at.is_finite() => Some(AccessToken::new(
                cached.access_token,
                cached.expires_at.floor() as i64,
            )),
            Ok(_) => {
                warn!("token cache '{}' has invalid expires_at, ignoring", self.path.display());
                None
            }
            Err(err) => {
                warn!("token cache '{}' is corrupt, ignoring: {}", self.path.display(), err);
                None
            }
        }
    }

    /// Atomically replace the cache with `token`.
    pub async fn write(&self, token: &AccessToken) -> Result<(), TokenError> {
        let cached = CachedToken {
            access_token: token.secret().to_owned(),
            expires_at: token.expires_at as f64,
        };
        let persist_err = |source| TokenError::PersistAccessToken { path: self.path.clone(), source };

        let content = serde_json::to_vec(&cached)
            .map_err(|err| persist_err(std::io::Error::new(ErrorKind::InvalidData, err)))?;
        write_atomic(&self.path, &content, Some(SECRET_FILE_MODE))
            .await
            .map_err(persist_err)?;

        info!("access token cached at '{}', expires at {}", self.path.display(), token.expires_at);
        Ok(())
    }
}
