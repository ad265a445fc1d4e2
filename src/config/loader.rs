use std::path::Path;

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use tracing::debug;

use crate::config::settings::ServiceConfig;
use crate::config::validator;

/// Config document syntax, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Load and validate config from a YAML or JSON file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read config file '{}'", path.display()))?;

    let expanded = expand_env_vars(&content);
    parse_config(&expanded, ConfigFormat::from_path(path))
}

pub fn parse_config(content: &str, format: ConfigFormat) -> Result<ServiceConfig> {
    let service_config: ServiceConfig = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Json => serde_json::from_str(content)?,
    };

    debug!("validation config ...");
    validator::validate_service_config(&service_config)
        .map_err(|errors| anyhow!("config is not valid:\n  - {}", errors.join("\n  - ")))?;

    Ok(service_config)
}

/// Replace `${VAR}` and `${VAR:default}` with values from the environment.
fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").expect("static regex");
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;
    use std::path::PathBuf;

    const YAML: &str = r#"
azure_app:
  client_id: "0123456789abcdef"
  client_secret: "app-secret"
auth:
  token_url: "https://login.example.com/common/oauth2/v2.0/token"
  refresh_token: "initial-refresh"
security:
  secret_expire_date: "2030-01-31"
  warning_threshold_days: 14
email_settings:
  graph_send_url: "https://graph.example.com/v1.0/me/sendMail"
  admin_notify_email: "admin@example.com"
paths:
  token_cache: "/var/lib/mail-agent/token_cache.json"
  refresh_token: "/var/lib/mail-agent/refresh_token"
  warning_log: "/var/lib/mail-agent/warning.log"
  template_dir: "/etc/mail-agent/templates"
  warning_template_name: "secret_warning.html"
"#;

    #[test]
    fn parses_yaml_with_defaults() {
        let cfg = parse_config(YAML, ConfigFormat::Yaml).unwrap();
        assert_eq!(cfg.azure_app.client_id, "0123456789abcdef");
        assert_eq!(cfg.azure_app.client_secret.expose_secret(), "app-secret");
        assert_eq!(cfg.auth.scope, "https://graph.microsoft.com/.default");
        assert_eq!(cfg.security.warning_threshold_days, 14);
        assert_eq!(
            cfg.paths.refresh_token,
            Some(PathBuf::from("/var/lib/mail-agent/refresh_token"))
        );
        assert_eq!(cfg.settings.safety_margin_seconds(), 300);
        assert_eq!(cfg.settings.http_timeout().as_secs(), 30);
        assert!(cfg.settings.logging.is_none());
    }

    #[test]
    fn parses_original_json_layout() {
        let json = r#"{
            "azure_app": {"client_id": "abc", "client_secret": "s"},
            "auth": {"token_url": "https://login.example.com/token", "refresh_token": "r"},
            "security": {"secret_expire_date": "202X-XX-XX", "warning_threshold_days": 30},
            "email_settings": {"graph_send_url": "https://graph.example.com/send", "admin_notify_email": "a@example.com"},
            "paths": {"token_cache": "cache.json", "warning_log": "warning.log"}
        }"#;
        let cfg = parse_config(json, ConfigFormat::Json).unwrap();
        assert_eq!(cfg.azure_app.client_id, "abc");
        assert!(cfg.paths.refresh_token.is_none());
        assert!(cfg.paths.template_dir.is_none());
    }

    #[test]
    fn missing_section_is_fatal() {
        let without_paths = YAML.split("paths:").next().unwrap();
        let err = parse_config(without_paths, ConfigFormat::Yaml).unwrap_err();
        assert!(err.to_string().contains("paths"), "{}", err);
    }

    #[test]
    fn invalid_values_are_reported_together() {
        let broken = YAML
            .replace("https://login.example.com/common/oauth2/v2.0/token", "ftp://nope")
            .replace("admin@example.com", "admin");
        let err = parse_config(&broken, ConfigFormat::Yaml).unwrap_err().to_string();
        assert!(err.contains("auth.token_url"), "{}", err);
        assert!(err.contains("email_settings.admin_notify_email"), "{}", err);
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("config.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("config.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Yaml);
    }

    #[test]
    #[serial]
    fn expands_env_vars_with_defaults() {
        std::env::set_var("MAIL_AGENT_TEST_SECRET", "from-env");
        std::env::remove_var("MAIL_AGENT_TEST_MISSING");
        let out = expand_env_vars("a: ${MAIL_AGENT_TEST_SECRET}\nb: ${MAIL_AGENT_TEST_MISSING:fallback}");
        assert_eq!(out, "a: from-env\nb: fallback");
        std::env::remove_var("MAIL_AGENT_TEST_SECRET");
    }

    #[tokio::test]
    async fn reads_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, YAML).unwrap();
        let cfg = file_to_config(&path).await.unwrap();
        assert_eq!(cfg.email_settings.admin_notify_email, "admin@example.com");

        let missing = file_to_config(&dir.path().join("absent.yaml")).await;
        assert!(missing.is_err());
    }
}
