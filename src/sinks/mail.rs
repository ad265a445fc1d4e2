use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

use crate::config::settings::ServiceConfig;
use crate::error::MailError;
use crate::sources::manager::TokenManager;

/// One outgoing message to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMailRequest<'a> {
    message: Message<'a>,
    save_to_sent_items: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Message<'a> {
    subject: &'a str,
    body: Body<'a>,
    to_recipients: [Recipient<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Body<'a> {
    content_type: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Recipient<'a> {
    email_address: EmailAddress<'a>,
}

#[derive(Debug, Serialize)]
struct EmailAddress<'a> {
    address: &'a str,
}

impl<'a> From<&'a OutgoingMail> for SendMailRequest<'a> {
    fn from(mail: &'a OutgoingMail) -> Self {
        Self {
            message: Message {
                subject: &mail.subject,
                body: Body {
                    content_type: if mail.is_html { "HTML" } else { "Text" },
                    content: &mail.body,
                },
                to_recipients: [Recipient { email_address: EmailAddress { address: &mail.to } }],
            },
            save_to_sent_items: "true",
        }
    }
}

/// Mail API client. Each send obtains its bearer token from the token manager.
#[derive(Debug, Clone)]
pub struct MailSender {
    client: Client,
    send_url: String,
    tokens: TokenManager,
}

impl MailSender {
    pub fn new(config: &ServiceConfig, client: Client) -> Self {
        Self {
            tokens: TokenManager::new(config, client.clone()),
            send_url: config.email_settings.graph_send_url.to_owned(),
            client,
        }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let token = self.tokens.get_valid_access_token().await?;

        let response = self
            .client
            .post(&self.send_url)
            .bearer_auth(token.secret())
            .json(&SendMailRequest::from(mail))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("mail API response: {}", body);
            return Err(MailError::Status { status, body });
        }

        info!("mail sent to {}", mail.to);
        Ok(())
    }
}
