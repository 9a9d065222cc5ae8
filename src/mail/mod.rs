//! Outbound mail for the password-reset flow
//!
//! A `Mailer` trait seam keeps SMTP out of the resolvers: production uses
//! lettre's async SMTP transport over STARTTLS, development falls back to a
//! noop that logs the reset link instead of sending it.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use crate::types::DevLinkError;

/// Sends the password-reset message
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_reset_link(&self, to: &str, link: &str) -> Result<(), DevLinkError>;
}

/// Compose the reset link from the front-end base URL and the reset token
pub fn reset_link(app_url: &str, token: &str) -> String {
    format!("{}/reset/{}", app_url.trim_end_matches('/'), token)
}

fn reset_body(link: &str) -> String {
    format!(
        "You requested a password reset for your DevLink account.\n\n\
         Follow this link to choose a new password:\n\n{}\n\n\
         The link expires shortly. If you did not request a reset, you can \
         ignore this message and your password will stay unchanged.\n",
        link
    )
}

/// SMTP mailer backed by lettre's async transport
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        from: String,
    ) -> Result<Self, DevLinkError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| DevLinkError::Dependency(format!("Invalid SMTP relay: {}", e)))?
            .port(port)
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_reset_link(&self, to: &str, link: &str) -> Result<(), DevLinkError> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| DevLinkError::Dependency(format!("Invalid from address: {}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| DevLinkError::Dependency(format!("Invalid recipient: {}", e)))?)
            .subject("DevLink password reset")
            .header(ContentType::TEXT_PLAIN)
            .body(reset_body(link))
            .map_err(|e| DevLinkError::Dependency(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| DevLinkError::Dependency(format!("Failed to send mail: {}", e)))?;

        info!("Sent password-reset mail to {}", to);
        Ok(())
    }
}

/// Development mailer that logs the link instead of sending it
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send_reset_link(&self, to: &str, link: &str) -> Result<(), DevLinkError> {
        warn!("SMTP not configured; reset link for {}: {}", to, link);
        Ok(())
    }
}

/// Mailer that records every dispatched (recipient, link) pair, for tests
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: std::sync::Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_reset_link(&self, to: &str, link: &str) -> Result<(), DevLinkError> {
        self.sent
            .lock()
            .expect("recording mailer poisoned")
            .push((to.to_string(), link.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_link_joins_without_double_slash() {
        assert_eq!(
            reset_link("http://localhost:3000/", "tok"),
            "http://localhost:3000/reset/tok"
        );
        assert_eq!(
            reset_link("https://devlink.example", "tok"),
            "https://devlink.example/reset/tok"
        );
    }

    #[tokio::test]
    async fn recording_mailer_captures_dispatches() {
        let mailer = RecordingMailer::new();
        mailer
            .send_reset_link("alice@example.com", "http://x/reset/t")
            .await
            .unwrap();
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "alice@example.com");
    }
}
