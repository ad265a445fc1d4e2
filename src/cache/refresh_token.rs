use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::error::TokenError;
use crate::helpers::fs::write_atomic;
use crate::utils::constants::SECRET_FILE_MODE;

/// Holds the current refresh token once the provider has rotated it.
///
/// When no path is configured the store is always empty and rotated values
/// live only for the current process.
#[derive(Debug, Clone)]
pub struct RefreshTokenStore {
    path: Option<PathBuf>,
}

impl RefreshTokenStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Stored refresh token, or None when the store is absent or empty.
    pub async fn read(&self) -> Option<SecretString> {
        let path = self.path.as_ref()?;
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                let value = content.trim();
                if value.is_empty() {
                    warn!("refresh token file '{}' is empty, ignoring", path.display());
                    None
                } else {
                    Some(SecretString::new(value.to_owned()))
                }
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("refresh token file '{}' not found", path.display());
                None
            }
            Err(err) => {
                warn!("refresh token file '{}' unreadable, ignoring: {}", path.display(), err);
                None
            }
        }
    }

    /// Replace the stored refresh token; the file is owner read/write only.
    pub async fn write(&self, token: &str) -> Result<(), TokenError> {
        let Some(path) = &self.path else {
            warn!("refresh token rotated but paths.refresh_token is not configured; the new value is not persisted");
            return Ok(());
        };

        write_atomic(path, token.as_bytes(), Some(SECRET_FILE_MODE))
            .await
            .map_err(|source| TokenError::PersistRefreshToken { path: path.clone(), source })?;

        info!("rotated refresh token saved to '{}'", path.display());
        Ok(())
    }
}
