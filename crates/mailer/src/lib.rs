//! Outbound delivery of password-reset links.
//!
//! The API depends only on the [`ResetLinkSender`] trait; [`SmtpMailer`] is the
//! production implementation and tests substitute a recording fake.

pub mod email;

pub use email::{MailConfig, MailError, SmtpMailer};

/// Delivers a password-reset link to the owner of an email address.
#[async_trait::async_trait]
pub trait ResetLinkSender: Send + Sync {
    /// Send `reset_url` to `to_email`. An `Err` means the link did not leave
    /// the server and the caller must report failure.
    async fn send_reset_link(&self, to_email: &str, reset_url: &str) -> Result<(), MailError>;
}
