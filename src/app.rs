use anyhow::Result;
use reqwest::Client;
use tracing::{info, warn};

use crate::config::settings::ServiceConfig;
use crate::error::{MailError, TokenError};
use crate::health::self_check::{SelfCheck, SelfCheckOutcome};
use crate::helpers::time::{days_until, local_now};
use crate::parser::template::TemplateLoader;
use crate::sinks::mail::{MailSender, OutgoingMail};

/// Where the mail body comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySource {
    Text(String),
    /// File name inside `paths.template_dir`, sent verbatim as HTML.
    Template(String),
}

#[derive(Debug, Clone)]
pub struct SendRequest {
    pub to: String,
    pub subject: String,
    pub body: BodySource,
    pub html: bool,
}

/// What the OAuth health check found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub token_expires_at: i64,
    /// None when no secret expiry date is configured or it cannot be parsed.
    pub secret_days_left: Option<i64>,
}

/// One CLI invocation: configuration plus the collaborators built from it.
pub struct App {
    config: ServiceConfig,
    mailer: MailSender,
    templates: TemplateLoader,
}

impl App {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.settings.http_timeout())
            .build()?;
        Ok(Self {
            mailer: MailSender::new(&config, client),
            templates: TemplateLoader::new(config.paths.template_dir.to_owned()),
            config,
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn mailer(&self) -> &MailSender {
        &self.mailer
    }

    fn self_checker(&self) -> SelfCheck<'_> {
        SelfCheck::new(&self.config, &self.mailer, &self.templates)
    }

    /// Secret expiry self-check; never fails the invocation.
    pub async fn self_check(&self) -> Option<SelfCheckOutcome> {
        self.self_checker().run(local_now()).await
    }

    /// Obtain a valid access token and report the secret expiry status.
    pub async fn health_check(&self) -> Result<HealthReport, TokenError> {
        let token = self.mailer.tokens().get_valid_access_token().await?;

        let secret_days_left = match self.self_checker().expire_date() {
            Ok(date) => date.map(|date| days_until(date, local_now())),
            Err(err) => {
                warn!("{:#}", err);
                None
            }
        };

        Ok(HealthReport { token_expires_at: token.expires_at, secret_days_left })
    }

    /// Resolve the body of a send request; templates force HTML.
    pub async fn compose(&self, request: SendRequest) -> Result<OutgoingMail> {
        let (body, is_html) = match request.body {
            BodySource::Text(text) => (text, request.html),
            BodySource::Template(name) => {
                info!("using template file: {}", name);
                (self.templates.load(&name, None).await?, true)
            }
        };
        Ok(OutgoingMail { to: request.to, subject: request.subject, body, is_html })
    }

    pub async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        self.mailer.send(mail).await
    }
}
