use std::collections::HashMap;
use std::io::ErrorKind;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use crate::config::settings::ServiceConfig;
use crate::helpers::time::days_until;
use crate::parser::template::{render_template, TemplateLoader};
use crate::sinks::mail::{MailSender, OutgoingMail};
use crate::utils::constants::{EXPIRE_DATE_FORMAT, EXPIRE_DATE_PLACEHOLDER};

/// Body used when `paths.warning_template_name` is not configured.
const DEFAULT_WARNING_TEMPLATE: &str = "<html><body>\
<p>The client secret of application <b>${client_id_short}</b> expires on <b>${expire_date}</b>.</p>\
<p>${days_left} day(s) left. Create a new secret and update the mail agent configuration.</p>\
</body></html>";

/// Result of one self-check run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelfCheckOutcome {
    /// No expiry date configured.
    Disabled,
    NotDue { days_left: i64 },
    AlreadyNotified { days_left: i64 },
    Notified { days_left: i64 },
    /// The notice could not be sent; the next invocation tries again.
    SendFailed { days_left: i64 },
}

/// Client secret expiry self-check.
pub struct SelfCheck<'a> {
    config: &'a ServiceConfig,
    mailer: &'a MailSender,
    templates: &'a TemplateLoader,
}

impl<'a> SelfCheck<'a> {
    pub fn new(config: &'a ServiceConfig, mailer: &'a MailSender, templates: &'a TemplateLoader) -> Self {
        Self { config, mailer, templates }
    }

    /// Best effort: every failure is logged and swallowed.
    pub async fn run(&self, now: NaiveDateTime) -> Option<SelfCheckOutcome> {
        match self.run_at(now).await {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                warn!("self-check failed: {:#}", err);
                None
            }
        }
    }

    pub async fn run_at(&self, now: NaiveDateTime) -> Result<SelfCheckOutcome> {
        let Some(expire_date) = self.expire_date()? else {
            return Ok(SelfCheckOutcome::Disabled);
        };
        let days_left = days_until(expire_date, now);

        if days_left > self.config.security.warning_threshold_days {
            return Ok(SelfCheckOutcome::NotDue { days_left });
        }

        let today = now.date().format(EXPIRE_DATE_FORMAT).to_string();
        if self.last_notified().await?.as_deref() == Some(today.as_str()) {
            info!("secret expiry notice already sent today");
            return Ok(SelfCheckOutcome::AlreadyNotified { days_left });
        }

        warn!("client secret expires in {} day(s), notifying administrator", days_left);
        let mail = OutgoingMail {
            to: self.config.email_settings.admin_notify_email.to_owned(),
            subject: format!("[URGENT] Client secret expires soon ({} days left)", days_left),
            body: self.render_notice(expire_date, days_left).await?,
            is_html: true,
        };

        if let Err(err) = self.mailer.send(&mail).await {
            warn!("secret expiry notice not sent: {}", err);
            return Ok(SelfCheckOutcome::SendFailed { days_left });
        }

        let log = &self.config.paths.warning_log;
        tokio::fs::write(log, &today)
            .await
            .with_context(|| format!("cannot record notice in '{}'", log.display()))?;
        Ok(SelfCheckOutcome::Notified { days_left })
    }

    /// Configured expiry date; None when unset or still the placeholder.
    pub fn expire_date(&self) -> Result<Option<NaiveDate>> {
        match self.config.security.secret_expire_date.as_deref() {
            None | Some(EXPIRE_DATE_PLACEHOLDER) => Ok(None),
            Some(date) => NaiveDate::parse_from_str(date, EXPIRE_DATE_FORMAT)
                .map(Some)
                .with_context(|| format!("security.secret_expire_date '{}' is not YYYY-MM-DD", date)),
        }
    }

    async fn last_notified(&self) -> Result<Option<String>> {
        let log = &self.config.paths.warning_log;
        match tokio::fs::read_to_string(log).await {
            Ok(content) => Ok(Some(content.trim().to_owned())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("cannot read '{}'", log.display())),
        }
    }

    async fn render_notice(&self, expire_date: NaiveDate, days_left: i64) -> Result<String> {
        let vars = HashMap::from([
            ("days_left".to_string(), days_left.to_string()),
            ("expire_date".to_string(), expire_date.format(EXPIRE_DATE_FORMAT).to_string()),
            ("client_id_short".to_string(), self.config.azure_app.client_id_short()),
        ]);
        match &self.config.paths.warning_template_name {
            Some(name) => self.templates.load(name, Some(&vars)).await,
            None => Ok(render_template(DEFAULT_WARNING_TEMPLATE, &vars)),
        }
    }
}
