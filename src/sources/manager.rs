use reqwest::Client;
use secrecy::SecretString;
use tracing::{debug, error, info};

use crate::cache::refresh_token::RefreshTokenStore;
use crate::cache::token::AccessToken;
use crate::cache::token_cache::TokenCacheStore;
use crate::config::settings::ServiceConfig;
use crate::error::TokenError;
use crate::helpers::time::now_i64;
use crate::sources::oauth2::OAuth2Source;

/// Token lifecycle manager: the only owner of the token cache and the
/// refresh token store.
///
/// Nothing is kept in memory between calls; every call starts from the files,
/// so another process rotating the refresh token is picked up immediately.
#[derive(Debug, Clone)]
pub struct TokenManager {
    client: Client,
    source: OAuth2Source,
    cache: TokenCacheStore,
    refresh_store: RefreshTokenStore,
    initial_refresh_token: SecretString,
    safety_margin_seconds: u64,
}

impl TokenManager {
    pub fn new(config: &ServiceConfig, client: Client) -> Self {
        Self {
            client,
            source: OAuth2Source::new(config),
            cache: TokenCacheStore::new(&config.paths.token_cache),
            refresh_store: RefreshTokenStore::new(config.paths.refresh_token.to_owned()),
            initial_refresh_token: config.auth.refresh_token.clone(),
            safety_margin_seconds: config.settings.safety_margin_seconds(),
        }
    }

    /// Return a cached access token while it is fresh, otherwise run one
    /// refresh exchange and persist its results.
    ///
    /// A rotated refresh token is saved before the access token; if saving it
    /// fails the new access token is dropped and the call fails.
    pub async fn get_valid_access_token(&self) -> Result<AccessToken, TokenError> {
        let refresh_token = self.current_refresh_token().await;

        if let Some(token) = self.cache.read().await {
            if token.is_fresh(self.safety_margin_seconds) {
                debug!("using cached access token, expires at {}", token.expires_at);
                return Ok(token);
            }
            info!("cached access token expires at {}, refreshing", token.expires_at);
        } else {
            info!("no usable cached access token, refreshing");
        }

        let requested_at = now_i64();
        let response = self
            .source
            .refresh(&self.client, &refresh_token)
            .await
            .inspect_err(|err| error!("access token refresh failed: {}", err))?;

        let token = AccessToken::new(response.access_token, requested_at + response.expires_in as i64);

        if let Some(rotated) = response.refresh_token {
            self.refresh_store
                .write(&rotated)
                .await
                .inspect_err(|err| error!("{}", err))?;
        }

        self.cache.write(&token).await?;
        info!("access token refreshed, expires at {}", token.expires_at);
        Ok(token)
    }

    /// Rotated value from the store, else the configured initial token.
    async fn current_refresh_token(&self) -> SecretString {
        match self.refresh_store.read().await {
            Some(token) => token,
            None => {
                debug!("using refresh token from config");
                self.initial_refresh_token.clone()
            }
        }
    }
}
