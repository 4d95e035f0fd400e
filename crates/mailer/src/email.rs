//! Password-reset email delivery via SMTP.
//!
//! [`SmtpMailer`] wraps the `lettre` async SMTP transport. Configuration is
//! loaded from environment variables; if `SMTP_HOST` is not set,
//! [`MailConfig::from_env`] returns `None` and no mailer should be constructed.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::ResetLinkSender;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// MailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@archive.local";

/// Subject line of the reset email.
const RESET_SUBJECT: &str = "Project Archive - Password Reset";

/// Configuration for the SMTP delivery service.
#[derive(Debug, Clone)]
pub struct MailConfig {
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

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured.
    ///
    /// | Variable         | Required | Default                  |
    /// |------------------|----------|--------------------------|
    /// | `SMTP_HOST`      | yes      | (none)                   |
    /// | `SMTP_PORT`      | no       | `587`                    |
    /// | `SMTP_FROM`      | no       | `noreply@archive.local`  |
    /// | `SMTP_USER`      | no       | (none)                   |
    /// | `SMTP_PASSWORD`  | no       | (none)                   |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok().filter(|h| !h.is_empty())?;
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

// ---------------------------------------------------------------------------
// SmtpMailer
// ---------------------------------------------------------------------------

/// Sends password-reset emails via SMTP.
pub struct SmtpMailer {
    config: MailConfig,
}

impl SmtpMailer {
    /// Create a new mailer with the given configuration.
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Assemble the reset email without sending it.
    pub fn build_message(&self, to_email: &str, reset_url: &str) -> Result<Message, MailError> {
        Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(RESET_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(reset_body(reset_url))
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait::async_trait]
impl ResetLinkSender for SmtpMailer {
    async fn send_reset_link(&self, to_email: &str, reset_url: &str) -> Result<(), MailError> {
        let email = self.build_message(to_email, reset_url)?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = to_email, "Password reset email sent");
        Ok(())
    }
}

/// Plain-text body of the reset email.
fn reset_body(reset_url: &str) -> String {
    format!(
        "You have requested to reset your password for the Project Archive.\n\n\
         Open the link below to choose a new password:\n\n\
         {reset_url}\n\n\
         This link expires in 1 hour. If you did not request a reset, ignore this email."
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
