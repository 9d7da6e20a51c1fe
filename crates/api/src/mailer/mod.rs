//! Email notifier collaborator.
//!
//! The core treats delivery as opaque pass-through status: a
//! [`DeliveryResult`] is reported to the caller but never retried
//! internally. [`SmtpMailer`] sends over lettre's async SMTP transport;
//! when `SMTP_HOST` is unset, [`DisabledMailer`] reports every send as
//! unconfigured without failing the surrounding request.

pub mod templates;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;

/// Outcome of a single delivery attempt, passed through to API callers.
#[derive(Debug, Clone)]
pub struct DeliveryResult {
    pub success: bool,
    pub message: String,
    pub error_code: Option<String>,
}

impl DeliveryResult {
    fn ok(message: impl Into<String>) -> Self {
        DeliveryResult {
            success: true,
            message: message.into(),
            error_code: None,
        }
    }

    fn failed(message: impl Into<String>, error_code: impl Into<String>) -> Self {
        DeliveryResult {
            success: false,
            message: message.into(),
            error_code: Some(error_code.into()),
        }
    }
}

/// Configuration snapshot exposed by the email status endpoint.
///
/// Credentials are never included, only whether delivery is configured
/// and which relay it points at.
#[derive(Debug, Clone, Serialize)]
pub struct MailerStatus {
    pub configured: bool,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub from_address: Option<String>,
}

/// Sends account lifecycle emails. Object-safe so tests can substitute a
/// recording double.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification_email(&self, to: &str, name: &str, token: &str) -> DeliveryResult;

    async fn send_password_reset_email(&self, to: &str, name: &str, token: &str)
        -> DeliveryResult;

    /// Report configuration state for the diagnostics endpoint.
    fn status(&self) -> MailerStatus;
}

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@dosewise.local";

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl SmtpConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured.
    ///
    /// | Variable        | Required | Default                   |
    /// |-----------------|----------|---------------------------|
    /// | `SMTP_HOST`     | yes      | --                        |
    /// | `SMTP_PORT`     | no       | `587`                     |
    /// | `SMTP_FROM`     | no       | `noreply@dosewise.local`  |
    /// | `SMTP_USER`     | no       | --                        |
    /// | `SMTP_PASSWORD` | no       | --                        |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Sends account emails via SMTP (STARTTLS relay).
pub struct SmtpMailer {
    config: SmtpConfig,
    /// Base URL for verification / reset links embedded in emails.
    frontend_url: String,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig, frontend_url: String) -> Self {
        Self {
            config,
            frontend_url,
        }
    }

    async fn send(&self, to: &str, subject: String, body: String) -> DeliveryResult {
        let message = match Message::builder()
            .from(match self.config.from_address.parse() {
                Ok(addr) => addr,
                Err(e) => return DeliveryResult::failed(format!("Bad from address: {e}"), "ADDRESS"),
            })
            .to(match to.parse() {
                Ok(addr) => addr,
                Err(e) => return DeliveryResult::failed(format!("Bad recipient: {e}"), "ADDRESS"),
            })
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
        {
            Ok(m) => m,
            Err(e) => return DeliveryResult::failed(format!("Message build failed: {e}"), "BUILD"),
        };

        let transport_builder =
            match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host) {
                Ok(b) => b.port(self.config.smtp_port),
                Err(e) => {
                    return DeliveryResult::failed(format!("SMTP relay error: {e}"), "SMTP")
                }
            };

        let transport_builder = if let (Some(user), Some(pass)) =
            (&self.config.smtp_user, &self.config.smtp_password)
        {
            transport_builder.credentials(Credentials::new(user.clone(), pass.clone()))
        } else {
            transport_builder
        };

        match transport_builder.build().send(message).await {
            Ok(_) => {
                tracing::info!(to, "Email sent");
                DeliveryResult::ok("Email sent successfully")
            }
            Err(e) => {
                tracing::error!(to, error = %e, "Email delivery failed");
                DeliveryResult::failed(format!("SMTP send failed: {e}"), "SMTP")
            }
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_verification_email(&self, to: &str, name: &str, token: &str) -> DeliveryResult {
        let (subject, body) = templates::verification_email(name, to, token, &self.frontend_url);
        self.send(to, subject, body).await
    }

    async fn send_password_reset_email(
        &self,
        to: &str,
        name: &str,
        token: &str,
    ) -> DeliveryResult {
        let (subject, body) = templates::password_reset_email(name, to, token, &self.frontend_url);
        self.send(to, subject, body).await
    }

    fn status(&self) -> MailerStatus {
        MailerStatus {
            configured: true,
            smtp_host: Some(self.config.smtp_host.clone()),
            smtp_port: Some(self.config.smtp_port),
            from_address: Some(self.config.from_address.clone()),
        }
    }
}

/// Stand-in used when SMTP is not configured. Every send reports a
/// non-success [`DeliveryResult`] so callers can surface `email_sent:
/// false` without treating it as an infrastructure failure.
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send_verification_email(&self, to: &str, _name: &str, _token: &str) -> DeliveryResult {
        tracing::warn!(to, "Email delivery not configured, skipping verification email");
        DeliveryResult::failed("Email delivery not configured", "NOT_CONFIGURED")
    }

    async fn send_password_reset_email(
        &self,
        to: &str,
        _name: &str,
        _token: &str,
    ) -> DeliveryResult {
        tracing::warn!(to, "Email delivery not configured, skipping reset email");
        DeliveryResult::failed("Email delivery not configured", "NOT_CONFIGURED")
    }

    fn status(&self) -> MailerStatus {
        MailerStatus {
            configured: false,
            smtp_host: None,
            smtp_port: None,
            from_address: None,
        }
    }
}
