use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use crate::utils::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_SAFETY_MARGIN_SECS, DEFAULT_SCOPE,
    DEFAULT_WARNING_THRESHOLD_DAYS,
};

/// ================================
/// Full service configuration
/// ================================
///
/// Loaded once at start and passed by reference afterwards; nothing mutates it.
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub azure_app: AppConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
    pub email_settings: EmailConfig,
    pub paths: PathsConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// ================================
/// Application identity
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

impl AppConfig {
    /// First 8 characters of the client id, enough to identify the app in a notice.
    pub fn client_id_short(&self) -> String {
        self.client_id.chars().take(8).collect()
    }
}

/// ================================
/// Token endpoint
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub token_url: String,
    /// Initial refresh token; superseded by the refresh token file once rotated.
    pub refresh_token: SecretString,
    #[serde(default = "default_scope")]
    pub scope: String,
}

/// ================================
/// Client secret expiry warning
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SecurityConfig {
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub secret_expire_date: Option<String>,
    #[serde(default = "default_warning_threshold_days")]
    pub warning_threshold_days: i64,
}

/// ================================
/// Mail API
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    pub graph_send_url: String,
    pub admin_notify_email: String,
}

/// ================================
/// On-disk artifacts
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    pub token_cache: PathBuf,
    #[serde(default)]
    pub refresh_token: Option<PathBuf>,
    pub warning_log: PathBuf,
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
    #[serde(default)]
    pub warning_template_name: Option<String>,
}

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SettingsConfig {
    pub logging: Option<LoggingConfig>,
    pub safety_margin_seconds: Option<u64>,
    pub http_timeout_seconds: Option<u64>,
}

impl SettingsConfig {
    pub fn safety_margin_seconds(&self) -> u64 {
        self.safety_margin_seconds.unwrap_or(DEFAULT_SAFETY_MARGIN_SECS)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS))
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new (level: String, format: LogFormat) -> Self {
        Self { level: level, format: format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_owned()
}

fn default_warning_threshold_days() -> i64 {
    DEFAULT_WARNING_THRESHOLD_DAYS
}
