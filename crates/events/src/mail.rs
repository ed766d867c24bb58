//! Verification-code email over SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport. Configuration is read
//! from the environment; when the Gmail credentials are missing
//! [`EmailConfig::from_env`] returns `None` and no mailer is built.

use std::sync::Arc;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::dispatcher::Dispatcher;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;

const VERIFICATION_SUBJECT: &str = "Подтверждение регистрации Neo Movies";

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Gmail account; also the `From` address.
    pub user: String,
    pub password: String,
}

impl EmailConfig {
    /// Load from `GMAIL_USER` / `GMAIL_APP_PASSWORD`.
    ///
    /// `None` when either is unset or empty.
    pub fn from_env() -> Option<Self> {
        let user = std::env::var("GMAIL_USER").ok().filter(|v| !v.is_empty())?;
        let password = std::env::var("GMAIL_APP_PASSWORD")
            .ok()
            .filter(|v| !v.is_empty())?;
        Some(Self {
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            user,
            password,
        })
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

pub struct Mailer {
    from: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl Mailer {
    /// Build the STARTTLS transport. No connection is made until the first
    /// send.
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(config.user.clone(), config.password))
            .build();

        Ok(Self {
            from: config.user,
            transport,
        })
    }

    pub async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), EmailError> {
        let email = verification_message(&self.from, to, code)?;
        self.transport.send(email).await?;
        tracing::info!(to, "Verification email sent");
        Ok(())
    }

    /// Queue a verification email on `dispatcher`. Failures are logged.
    pub fn queue_verification_code(
        self: &Arc<Self>,
        dispatcher: &Dispatcher,
        to: String,
        code: String,
    ) -> bool {
        let mailer = Arc::clone(self);
        dispatcher.try_dispatch("verification_email", async move {
            if let Err(e) = mailer.send_verification_code(&to, &code).await {
                tracing::error!(error = %e, to = %to, "Failed to send verification email");
            }
        })
    }
}

// ---- private helpers ----

fn verification_message(from: &str, to: &str, code: &str) -> Result<Message, EmailError> {
    Message::builder()
        .from(from.parse()?)
        .to(to.parse()?)
        .subject(VERIFICATION_SUBJECT)
        .header(ContentType::TEXT_HTML)
        .body(verification_body(code))
        .map_err(|e| EmailError::Build(e.to_string()))
}

fn verification_body(code: &str) -> String {
    format!(
        r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #2196f3;">Neo Movies</h1>
  <p>Здравствуйте!</p>
  <p>Для завершения регистрации введите этот код:</p>
  <div style="background: #f5f5f5; padding: 20px; border-radius: 8px; text-align: center; font-size: 24px; letter-spacing: 4px; margin: 20px 0;">
    {code}
  </div>
  <p>Код действителен в течение 10 минут.</p>
  <p>Если вы не регистрировались на нашем сайте, просто проигнорируйте это письмо.</p>
</div>"#
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_embeds_code() {
        let body = verification_body("482913");
        assert!(body.contains("482913"));
        assert!(body.contains("10 минут"));
    }

    #[test]
    fn message_builds_for_valid_addresses() {
        let msg = verification_message("noreply@example.com", "neo@example.com", "111111").unwrap();
        let envelope = msg.envelope();
        assert_eq!(envelope.to().len(), 1);
        assert_eq!(envelope.to()[0].to_string(), "neo@example.com");
    }

    #[test]
    fn invalid_recipient_is_address_error() {
        let err = verification_message("noreply@example.com", "not-an-email", "1").unwrap_err();
        assert!(err.to_string().contains("Email address parse error"));
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }
}
