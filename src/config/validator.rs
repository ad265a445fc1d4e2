//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Checks the invariants the token lifecycle and the self-check rely on:
//!   * credentials and endpoint urls present
//!   * file paths non-empty
//!   * expiry warning and timing settings within sane bounds

use chrono::NaiveDate;
use secrecy::ExposeSecret;
use tracing::{error, info, warn};

use crate::config::settings::{
    AppConfig, AuthConfig, EmailConfig, PathsConfig, SecurityConfig, ServiceConfig, SettingsConfig,
};
use crate::utils::constants::{EXPIRE_DATE_FORMAT, EXPIRE_DATE_PLACEHOLDER};

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_app(&cfg.azure_app, &mut errors);
    validate_auth(&cfg.auth, &mut errors);
    validate_security(&cfg.security, &mut errors);
    validate_email(&cfg.email_settings, &mut errors);
    validate_paths(&cfg.paths, &mut errors);
    validate_settings(&cfg.settings, &mut errors);

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        Err(errors)
    }
}

fn validate_app(app: &AppConfig, errors: &mut Vec<String>) {
    if app.client_id.trim().is_empty() {
        errors.push("azure_app.client_id must not be empty".to_string());
    }
    if app.client_secret.expose_secret().trim().is_empty() {
        errors.push("azure_app.client_secret must not be empty".to_string());
    }
}

fn validate_auth(auth: &AuthConfig, errors: &mut Vec<String>) {
    validate_url("auth.token_url", &auth.token_url, errors);
    if auth.refresh_token.expose_secret().trim().is_empty() {
        errors.push("auth.refresh_token must not be empty".to_string());
    }
    if auth.scope.trim().is_empty() {
        errors.push("auth.scope must not be empty".to_string());
    }
}

/// A malformed expiry date is not fatal: the self-check reports it at run time.
fn validate_security(security: &SecurityConfig, errors: &mut Vec<String>) {
    if security.warning_threshold_days < 0 {
        errors.push(format!(
            "security.warning_threshold_days ({}) must not be negative",
            security.warning_threshold_days
        ));
    }
    if let Some(date) = &security.secret_expire_date {
        if date != EXPIRE_DATE_PLACEHOLDER && NaiveDate::parse_from_str(date, EXPIRE_DATE_FORMAT).is_err() {
            warn!(
                "security.secret_expire_date '{}' is not a YYYY-MM-DD date; expiry self-check will be skipped",
                date
            );
        }
    }
}

fn validate_email(email: &EmailConfig, errors: &mut Vec<String>) {
    validate_url("email_settings.graph_send_url", &email.graph_send_url, errors);
    let admin = email.admin_notify_email.trim();
    if admin.is_empty() || !admin.contains('@') {
        errors.push(format!(
            "email_settings.admin_notify_email '{}' must be an email address",
            email.admin_notify_email
        ));
    }
}

fn validate_paths(paths: &PathsConfig, errors: &mut Vec<String>) {
    if paths.token_cache.as_os_str().is_empty() {
        errors.push("paths.token_cache must not be empty".to_string());
    }
    if paths.warning_log.as_os_str().is_empty() {
        errors.push("paths.warning_log must not be empty".to_string());
    }
    if let Some(refresh_token) = &paths.refresh_token {
        if refresh_token.as_os_str().is_empty() {
            errors.push("paths.refresh_token must not be empty when present".to_string());
        } else if refresh_token == &paths.token_cache {
            errors.push(format!(
                "paths.refresh_token '{}' must differ from paths.token_cache",
                refresh_token.display()
            ));
        }
    }
    if paths.warning_template_name.is_some() && paths.template_dir.is_none() {
        errors.push("paths.warning_template_name requires paths.template_dir".to_string());
    }
}

/// SETTINGS VALIDATION
fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    // safety margin sane bounds
    if let Some(s) = settings.safety_margin_seconds {
        if s > 60 * 60 * 24 {
            errors.push(format!(
                "settings.safety_margin_seconds ({}) is unreasonably large",
                s
            ));
        }
    }
    if settings.http_timeout_seconds == Some(0) {
        errors.push("settings.http_timeout_seconds must be greater than 0".to_string());
    }
    if let Some(logging) = &settings.logging {
        let allowed = ["trace", "debug", "info", "warn", "error"];
        if !allowed.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' must be one of {:?}",
                logging.level, allowed
            ));
        }
    }
}

fn validate_url(field: &str, url: &str, errors: &mut Vec<String>) {
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        errors.push(format!("{} '{}' must be an http(s) url", field, url));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::{LogFormat, LoggingConfig};
    use secrecy::SecretString;
    use std::path::PathBuf;

    fn valid_config() -> ServiceConfig {
        ServiceConfig {
            azure_app: AppConfig {
                client_id: "client".into(),
                client_secret: SecretString::new("secret".into()),
                tenant_id: None,
            },
            auth: AuthConfig {
                token_url: "https://login.example.com/token".into(),
                refresh_token: SecretString::new("refresh".into()),
                scope: "scope".into(),
            },
            security: SecurityConfig {
                secret_expire_date: Some("2030-01-01".into()),
                warning_threshold_days: 30,
            },
            email_settings: EmailConfig {
                graph_send_url: "https://graph.example.com/send".into(),
                admin_notify_email: "admin@example.com".into(),
            },
            paths: PathsConfig {
                token_cache: PathBuf::from("cache.json"),
                refresh_token: Some(PathBuf::from("refresh_token")),
                warning_log: PathBuf::from("warning.log"),
                template_dir: None,
                warning_template_name: None,
            },
            settings: SettingsConfig::default(),
        }
    }

    #[test]
    fn accepts_valid_config() {
        assert!(validate_service_config(&valid_config()).is_ok());
    }

    #[test]
    fn collects_every_problem() {
        let mut cfg = valid_config();
        cfg.azure_app.client_secret = SecretString::new("  ".into());
        cfg.security.warning_threshold_days = -1;
        cfg.paths.refresh_token = Some(PathBuf::from("cache.json"));
        cfg.settings.http_timeout_seconds = Some(0);
        cfg.settings.logging = Some(LoggingConfig::new("loud".into(), LogFormat::Json));

        let errors = validate_service_config(&cfg).unwrap_err();
        assert_eq!(errors.len(), 5, "{:?}", errors);
    }

    #[test]
    fn malformed_expiry_date_is_not_fatal() {
        let mut cfg = valid_config();
        cfg.security.secret_expire_date = Some("31/01/2030".into());
        assert!(validate_service_config(&cfg).is_ok());
    }

    #[test]
    fn warning_template_requires_template_dir() {
        let mut cfg = valid_config();
        cfg.paths.warning_template_name = Some("warning.html".into());
        let errors = validate_service_config(&cfg).unwrap_err();
        assert!(errors[0].contains("template_dir"));
    }
}
