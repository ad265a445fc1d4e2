use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::settings::ServiceConfig;
use crate::error::TokenError;
use crate::utils::constants::GRANT_TYPE_REFRESH_TOKEN;

/// Successful token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Seconds until the access token expires.
    pub expires_in: u64,
    /// Present when the provider rotated the refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// OAuth2 token endpoint speaking the refresh-token grant.
#[derive(Debug, Clone)]
pub struct OAuth2Source {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: SecretString,
    pub scope: String,
}

impl OAuth2Source {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            token_url: config.auth.token_url.to_owned(),
            client_id: config.azure_app.client_id.to_owned(),
            client_secret: config.azure_app.client_secret.clone(),
            scope: config.auth.scope.to_owned(),
        }
    }

    /// Exchange `refresh_token` for a new access token. One request, no retries:
    /// a rotated refresh token may already be invalid after the first use.
    pub async fn refresh(
        &self,
        client: &Client,
        refresh_token: &SecretString,
    ) -> Result<TokenResponse, TokenError> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret().as_str()),
            ("refresh_token", refresh_token.expose_secret().as_str()),
            ("grant_type", GRANT_TYPE_REFRESH_TOKEN),
            ("scope", self.scope.as_str()),
        ];

        debug!("requesting access token from '{}'", self.token_url);
        let response = client.post(&self.token_url).form(&form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("token endpoint returned {}", status);
            return Err(TokenError::Status { status, body });
        }

        serde_json::from_str(&body).map_err(|err| TokenError::MalformedResponse(err.to_string()))
    }
}
