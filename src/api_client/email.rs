//! Delivery of rendered digests through a transactional email HTTP API.

use crate::configuration::{DigestFormat, EmailSettings};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailBody {
    Html(String),
    Text(String),
}

/// A single-recipient message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: EmailBody,
}

#[derive(Debug)]
pub enum EmailError {
    Request(reqwest::Error),
    Rejected { status: u16, body: String },
}

impl fmt::Display for EmailError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EmailError::Request(e) => write!(f, "Email request failed: {}", e),
            EmailError::Rejected { status, body } => {
                write!(f, "Email service rejected message (HTTP {}): {}", status, body)
            }
        }
    }
}

impl std::error::Error for EmailError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EmailError::Request(e) => Some(e),
            EmailError::Rejected { .. } => None,
        }
    }
}

impl From<reqwest::Error> for EmailError {
    fn from(error: reqwest::Error) -> Self {
        EmailError::Request(error)
    }
}

/// Outbound email transport.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), EmailError>;
}

/// JSON body accepted by the email API.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_body: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_body: Option<&'a str>,
}

impl<'a> From<&'a Email> for SendEmailRequest<'a> {
    fn from(email: &'a Email) -> Self {
        let (html_body, text_body) = match &email.body {
            EmailBody::Html(html) => (Some(html.as_str()), None),
            EmailBody::Text(text) => (None, Some(text.as_str())),
        };

        Self {
            from: &email.sender,
            to: &email.recipient,
            subject: &email.subject,
            html_body,
            text_body,
        }
    }
}

pub struct HttpEmailClient {
    http_client: Client,
    api_url: String,
    api_token: Option<String>,
}

impl HttpEmailClient {
    pub fn new(settings: &EmailSettings) -> Result<Self, EmailError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_url: settings.api_url.clone(),
            api_token: settings.api_token.clone(),
        })
    }
}

#[async_trait]
impl EmailSender for HttpEmailClient {
    async fn send(&self, email: &Email) -> Result<(), EmailError> {
        let mut request = self
            .http_client
            .post(&self.api_url)
            .json(&SendEmailRequest::from(email));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Addresses and sends digests with a fixed sender and subject.
pub struct Notifier<'a> {
    sender: &'a dyn EmailSender,
    from: String,
    subject: String,
    format: DigestFormat,
}

impl<'a> Notifier<'a> {
    pub fn new(
        sender: &'a dyn EmailSender,
        settings: &EmailSettings,
        format: DigestFormat,
    ) -> Self {
        Self {
            sender,
            from: settings.sender.clone(),
            subject: settings.subject.clone(),
            format,
        }
    }

    fn compose(&self, body: &str, recipient: &str) -> Email {
        let body = match self.format {
            DigestFormat::Html => EmailBody::Html(body.to_string()),
            DigestFormat::Text => EmailBody::Text(body.to_string()),
        };

        Email {
            sender: self.from.clone(),
            recipient: recipient.to_string(),
            subject: self.subject.clone(),
            body,
        }
    }

    /// Sends `body` to `recipient`.
    ///
    /// Returns `false` instead of an error when delivery fails, so a bad
    /// address never stops the remaining digests from going out.
    pub async fn send_email(&self, body: &str, recipient: &str) -> bool {
        let email = self.compose(body, recipient);

        match self.sender.send(&email).await {
            Ok(()) => {
                info!(recipient, "digest sent");
                true
            }
            Err(e) => {
                error!(recipient, error = ?e, "failed to send digest: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings() -> EmailSettings {
        EmailSettings {
            sender: "digest@example.com".to_string(),
            api_url: "http://localhost:9/email".to_string(),
            api_token: Some("token".to_string()),
            subject: "Newest Music in Last 7 Days".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_request_body_html() {
        let email = Email {
            sender: "digest@example.com".to_string(),
            recipient: "sbobspants@nick.com".to_string(),
            subject: "New music".to_string(),
            body: EmailBody::Html("<p>hi</p>".to_string()),
        };

        let value = serde_json::to_value(SendEmailRequest::from(&email)).unwrap();

        assert_eq!(
            value,
            json!({
                "From": "digest@example.com",
                "To": "sbobspants@nick.com",
                "Subject": "New music",
                "HtmlBody": "<p>hi</p>"
            })
        );
    }

    #[test]
    fn test_request_body_text() {
        let email = Email {
            sender: "a@example.com".to_string(),
            recipient: "b@example.com".to_string(),
            subject: "s".to_string(),
            body: EmailBody::Text("hello".to_string()),
        };

        let value = serde_json::to_value(SendEmailRequest::from(&email)).unwrap();

        assert_eq!(value["TextBody"], "hello");
        assert!(value.get("HtmlBody").is_none());
    }

    #[tokio::test]
    async fn test_send_email_returns_true_on_success() {
        let mut sender = MockEmailSender::new();
        sender
            .expect_send()
            .withf(|email| {
                email.recipient == "sbobspants@nick.com"
                    && email.sender == "digest@example.com"
                    && email.body == EmailBody::Html("<p>you say i'm just a test</p>".to_string())
            })
            .times(1)
            .returning(|_| Ok(()));

        let notifier = Notifier::new(&sender, &settings(), DigestFormat::Html);

        assert!(
            notifier
                .send_email("<p>you say i'm just a test</p>", "sbobspants@nick.com")
                .await
        );
    }

    #[tokio::test]
    async fn test_send_email_returns_false_on_failure() {
        let mut sender = MockEmailSender::new();
        sender.expect_send().times(1).returning(|_| {
            Err(EmailError::Rejected {
                status: 422,
                body: "Invalid 'To' address".to_string(),
            })
        });

        let notifier = Notifier::new(&sender, &settings(), DigestFormat::Text);

        assert!(!notifier.send_email("hello", "not-an-address").await);
    }

    #[tokio::test]
    async fn test_http_client_unreachable_service_is_request_error() {
        let client = HttpEmailClient::new(&settings()).unwrap();
        let email =
            Notifier::new(&client, &settings(), DigestFormat::Text).compose("x", "b@example.com");

        assert!(matches!(
            client.send(&email).await,
            Err(EmailError::Request(_))
        ));
    }
}
