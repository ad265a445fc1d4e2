use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failures of the token lifecycle.
///
/// A corrupt or missing access token cache is never reported here; it only
/// forces a refresh exchange.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token endpoint request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("token endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed token response: {0}")]
    MalformedResponse(String),

    #[error("failed to persist rotated refresh token to '{}': {source}", path.display())]
    PersistRefreshToken {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to persist access token cache to '{}': {source}", path.display())]
    PersistAccessToken {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of a single mail send.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("cannot obtain access token: {0}")]
    Token(#[from] TokenError),

    #[error("mail request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("mail API returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}
