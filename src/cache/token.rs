use secrecy::{ExposeSecret, SecretString};

use crate::helpers::time::now_i64;

/// Short-lived bearer credential with its absolute expiry.
#[derive(Debug, Clone)]
pub struct AccessToken {
    value: SecretString,
    pub expires_at: i64, // UNIX TIMESTAMP
}

impl AccessToken {
    pub fn new(value: String, expires_at: i64) -> Self {
        Self { value: SecretString::new(value), expires_at }
    }

    /// Token value for the Authorization header.
    pub fn secret(&self) -> &str {
        self.value.expose_secret()
    }

    /// Usable at `now` only while more than `safety_margin_seconds` remain.
    pub fn is_fresh_at(&self, now: i64, safety_margin_seconds: u64) -> bool {
        self.expires_at > now + safety_margin_seconds as i64
    }

    pub fn is_fresh(&self, safety_margin_seconds: u64) -> bool {
        self.is_fresh_at(now_i64(), safety_margin_seconds)
    }
}

impl PartialEq for AccessToken {
    fn eq(&self, other: &Self) -> bool {
        self.expires_at == other.expires_at && self.secret() == other.secret()
    }
}

impl Eq for AccessToken {}
