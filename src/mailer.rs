use async_trait::async_trait;
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use crate::config::SmtpConfig;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("smtp configuration missing")]
    ConfigMissing,
    #[error("send failed: {0}")]
    SendFailed(#[source] anyhow::Error),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)?
            .port(cfg.port)
            .credentials(Credentials::new(
                cfg.username.clone(),
                cfg.password.clone(),
            ))
            .build();
        let from: Mailbox = cfg
            .from
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid SMTP_FROM address: {e}"))?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| MailError::SendFailed(anyhow::anyhow!("invalid recipient: {e}")))?;
        let mail = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| MailError::SendFailed(anyhow::Error::new(e)))?;
        self.transport
            .send(mail)
            .await
            .map_err(|e| MailError::SendFailed(anyhow::Error::new(e)))?;
        info!(%subject, "mail sent");
        Ok(())
    }
}

/// Stand-in used when no SMTP section is configured. Every send fails
/// loudly so callers log and surface the miss instead of assuming the
/// message left the building.
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), MailError> {
        Err(MailError::ConfigMissing)
    }
}

pub fn credentials_email(name: &str, role: &str, email: &str, password: &str) -> (String, String) {
    (
        "Your Account Credentials".to_string(),
        format!("Hello {name},\nRole: {role}\nUsername: {email}\nPassword: {password}"),
    )
}

pub fn confirmation_email(candidate_name: &str) -> (String, String) {
    (
        "Congratulations - You have been confirmed!".to_string(),
        format!("Dear {candidate_name}, You have been confirmed for the role at our company."),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_email_carries_all_fields() {
        let (subject, body) = credentials_email("Sarah", "Employee", "sarah@corp.test", "p4ss");
        assert_eq!(subject, "Your Account Credentials");
        assert!(body.contains("Sarah"));
        assert!(body.contains("Employee"));
        assert!(body.contains("sarah@corp.test"));
        assert!(body.contains("p4ss"));
    }

    #[test]
    fn confirmation_email_addresses_candidate() {
        let (subject, body) = confirmation_email("Alex Doe");
        assert!(subject.contains("confirmed"));
        assert!(body.starts_with("Dear Alex Doe"));
    }

    #[tokio::test]
    async fn disabled_mailer_reports_missing_config() {
        let err = DisabledMailer
            .send("a@b.test", "subject", "body")
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::ConfigMissing));
    }
}
