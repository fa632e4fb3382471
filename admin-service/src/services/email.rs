//! Notification sink: outbound email behind a trait.
//!
//! Delivery failure surfaces as a distinguishable error rather than
//! being swallowed; by the time a send runs, the token it carries has
//! already been committed.

use crate::config::SmtpConfig;
use crate::services::ServiceError;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, Message,
    SmtpTransport, Transport,
};
use service_core::async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send_verification_email(&self, to_email: &str, token: &str)
        -> Result<(), ServiceError>;

    async fn send_password_reset_email(
        &self,
        to_email: &str,
        token: &str,
    ) -> Result<(), ServiceError>;

    async fn send_invite_email(&self, to_email: &str, token: &str) -> Result<(), ServiceError>;

    async fn send_email_change_email(
        &self,
        to_email: &str,
        token: &str,
    ) -> Result<(), ServiceError>;
}

/// SMTP-backed provider.
#[derive(Clone)]
pub struct SmtpEmailService {
    mailer: SmtpTransport,
    from_email: String,
    base_url: String,
}

impl SmtpEmailService {
    pub fn new(config: &SmtpConfig) -> Result<Self, ServiceError> {
        let creds = Credentials::new(config.user.clone(), config.password.clone());

        let mailer = SmtpTransport::relay(&config.host)
            .map_err(|e| ServiceError::Email(e.to_string()))?
            .credentials(creds)
            .port(587)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        tracing::info!(host = %config.host, "Email service initialized");

        Ok(Self {
            mailer,
            from_email: config.from_email.clone(),
            base_url: config.base_url.clone(),
        })
    }

    async fn send(&self, to_email: &str, subject: &str, body: String) -> Result<(), ServiceError> {
        let email = Message::builder()
            .from(
                self.from_email
                    .parse()
                    .map_err(|e: lettre::address::AddressError| ServiceError::Email(e.to_string()))?,
            )
            .to(to_email
                .parse()
                .map_err(|e: lettre::address::AddressError| ServiceError::Email(e.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| ServiceError::Email(e.to_string()))?;

        // Blocking SMTP send off the async runtime.
        let mailer = self.mailer.clone();
        let result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| ServiceError::Internal(e.into()))?;

        match result {
            Ok(_) => {
                tracing::info!(to = %to_email, subject = %subject, "Email sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, to = %to_email, "Failed to send email");
                Err(ServiceError::Email(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl EmailProvider for SmtpEmailService {
    async fn send_verification_email(
        &self,
        to_email: &str,
        token: &str,
    ) -> Result<(), ServiceError> {
        let link = format!("{}/auth/new-verification?token={}", self.base_url, token);
        let body = format!(
            "Welcome! Please verify your email address by visiting:\n\n{}\n\n\
             If you didn't request this, please ignore this email.",
            link
        );
        self.send(to_email, "Verify your email address", body).await
    }

    async fn send_password_reset_email(
        &self,
        to_email: &str,
        token: &str,
    ) -> Result<(), ServiceError> {
        let link = format!("{}/auth/new-password?token={}", self.base_url, token);
        let body = format!(
            "We received a request to reset your password. Set a new one here:\n\n{}\n\n\
             If you didn't request this, please ignore this email.",
            link
        );
        self.send(to_email, "Reset your password", body).await
    }

    async fn send_invite_email(&self, to_email: &str, token: &str) -> Result<(), ServiceError> {
        let link = format!("{}/signup?token={}", self.base_url, token);
        let body = format!(
            "An administrator invited you to the admin console. \
             Complete your signup here:\n\n{}",
            link
        );
        self.send(to_email, "You have been invited", body).await
    }

    async fn send_email_change_email(
        &self,
        to_email: &str,
        token: &str,
    ) -> Result<(), ServiceError> {
        let link = format!("{}/auth/new-email?token={}", self.base_url, token);
        let body = format!(
            "Confirm your new email address by visiting:\n\n{}\n\n\
             If you didn't request this change, please contact an administrator.",
            link
        );
        self.send(to_email, "Confirm your new email address", body)
            .await
    }
}

/// What a mock provider recorded about one send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub kind: &'static str,
    pub to_email: String,
    pub token: String,
}

/// Recording provider for tests: never fails, keeps an outbox.
#[derive(Default)]
pub struct MockEmailService {
    outbox: Mutex<Vec<SentEmail>>,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.outbox.lock().expect("outbox poisoned").clone()
    }

    pub fn last_token(&self) -> Option<String> {
        self.outbox
            .lock()
            .expect("outbox poisoned")
            .last()
            .map(|m| m.token.clone())
    }

    fn record(&self, kind: &'static str, to_email: &str, token: &str) {
        self.outbox.lock().expect("outbox poisoned").push(SentEmail {
            kind,
            to_email: to_email.to_string(),
            token: token.to_string(),
        });
    }
}

#[async_trait]
impl EmailProvider for MockEmailService {
    async fn send_verification_email(
        &self,
        to_email: &str,
        token: &str,
    ) -> Result<(), ServiceError> {
        self.record("verification", to_email, token);
        Ok(())
    }

    async fn send_password_reset_email(
        &self,
        to_email: &str,
        token: &str,
    ) -> Result<(), ServiceError> {
        self.record("password_reset", to_email, token);
        Ok(())
    }

    async fn send_invite_email(&self, to_email: &str, token: &str) -> Result<(), ServiceError> {
        self.record("invite", to_email, token);
        Ok(())
    }

    async fn send_email_change_email(
        &self,
        to_email: &str,
        token: &str,
    ) -> Result<(), ServiceError> {
        self.record("email_change", to_email, token);
        Ok(())
    }
}
