// tests/common/mod.rs
use std::path::Path;

use reqwest::Client;
use secrecy::SecretString;

use crate::config::settings::{
    AppConfig, AuthConfig, EmailConfig, PathsConfig, SecurityConfig, ServiceConfig, SettingsConfig,
};

pub const CLIENT_ID: &str = "client-0123456789";
pub const INITIAL_REFRESH_TOKEN: &str = "R-initial";

/// Config whose endpoints point at `base_url` (`/token`, `/sendMail`) and
/// whose files all live in `dir`.
pub fn service_config(dir: &Path, base_url: &str) -> ServiceConfig {
    ServiceConfig {
        azure_app: AppConfig {
            client_id: CLIENT_ID.to_owned(),
            client_secret: SecretString::new("app-secret".to_owned()),
            tenant_id: None,
        },
        auth: AuthConfig {
            token_url: format!("{}/token", base_url),
            refresh_token: SecretString::new(INITIAL_REFRESH_TOKEN.to_owned()),
            scope: "https://graph.microsoft.com/.default".to_owned(),
        },
        security: SecurityConfig {
            secret_expire_date: None,
            warning_threshold_days: 30,
        },
        email_settings: EmailConfig {
            graph_send_url: format!("{}/sendMail", base_url),
            admin_notify_email: "admin@example.com".to_owned(),
        },
        paths: PathsConfig {
            token_cache: dir.join("token_cache.json"),
            refresh_token: Some(dir.join("refresh_token")),
            warning_log: dir.join("warning.log"),
            template_dir: Some(dir.join("templates")),
            warning_template_name: None,
        },
        settings: SettingsConfig::default(),
    }
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}
