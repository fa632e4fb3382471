use crate::models::TokenKind;
use chrono::Duration;
use serde::Deserialize;
use service_core::config::{get_env, Environment};
use service_core::error::AppError;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    pub tokens: TokenTtlConfig,
    pub smtp: SmtpConfig,
    pub session: SessionConfig,
    pub seed: SeedConfig,
}

/// Per-variant token lifetimes. These are policy knobs, not constants:
/// every value can be overridden from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenTtlConfig {
    pub email_verification_minutes: i64,
    pub password_reset_minutes: i64,
    pub register_invite_hours: i64,
    pub email_change_minutes: i64,
}

impl TokenTtlConfig {
    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::EmailVerification => Duration::minutes(self.email_verification_minutes),
            TokenKind::PasswordReset => Duration::minutes(self.password_reset_minutes),
            TokenKind::RegisterInvite => Duration::hours(self.register_invite_hours),
            TokenKind::EmailChange => Duration::minutes(self.email_change_minutes),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub from_email: String,
    /// Base URL the emailed links point at.
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub jwt_secret: String,
    pub session_expiry_minutes: i64,
}

/// Fixed super-admin seed identity. Passed explicitly into the seeding
/// routine so it stays deterministic and testable.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    pub super_admin_id: Uuid,
    pub super_admin_email: String,
    pub super_admin_password: String,
}

impl AdminConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let environment = Environment::from_env()?;
        let is_prod = environment.is_prod();

        let config = AdminConfig {
            environment,
            service_name: get_env("SERVICE_NAME", Some("admin-service"), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            tokens: TokenTtlConfig {
                email_verification_minutes: parse_env(
                    "TOKEN_EMAIL_VERIFICATION_TTL_MINUTES",
                    "60",
                    is_prod,
                )?,
                password_reset_minutes: parse_env(
                    "TOKEN_PASSWORD_RESET_TTL_MINUTES",
                    "60",
                    is_prod,
                )?,
                register_invite_hours: parse_env("TOKEN_REGISTER_INVITE_TTL_HOURS", "48", is_prod)?,
                email_change_minutes: parse_env("TOKEN_EMAIL_CHANGE_TTL_MINUTES", "60", is_prod)?,
            },
            smtp: SmtpConfig {
                host: get_env("SMTP_HOST", Some("smtp.gmail.com"), is_prod)?,
                user: get_env("SMTP_USER", Some("dev@localhost"), is_prod)?,
                password: get_env("SMTP_PASSWORD", Some(""), is_prod)?,
                from_email: get_env("SMTP_FROM_EMAIL", Some("dev@localhost"), is_prod)?,
                base_url: get_env("APP_BASE_URL", Some("http://localhost:3000"), is_prod)?,
            },
            session: SessionConfig {
                jwt_secret: get_env("SESSION_JWT_SECRET", Some("dev-session-secret"), is_prod)?,
                session_expiry_minutes: parse_env("SESSION_EXPIRY_MINUTES", "60", is_prod)?,
            },
            seed: SeedConfig {
                super_admin_id: get_env(
                    "SUPER_ADMIN_UUID",
                    Some("00000000-0000-4000-8000-000000000001"),
                    is_prod,
                )?
                .parse()
                .map_err(|e: uuid::Error| AppError::ConfigError(anyhow::anyhow!(e)))?,
                super_admin_email: get_env(
                    "SUPER_ADMIN_EMAIL",
                    Some("super@localhost"),
                    is_prod,
                )?,
                super_admin_password: get_env(
                    "SUPER_ADMIN_PASSWORD",
                    Some("super-admin-dev"),
                    is_prod,
                )?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.tokens.email_verification_minutes <= 0
            || self.tokens.password_reset_minutes <= 0
            || self.tokens.register_invite_hours <= 0
            || self.tokens.email_change_minutes <= 0
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Token TTLs must be positive"
            )));
        }

        if self.session.session_expiry_minutes <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "SESSION_EXPIRY_MINUTES must be positive"
            )));
        }

        if self.environment.is_prod() && self.session.jwt_secret == "dev-session-secret" {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "SESSION_JWT_SECRET must be set in production"
            )));
        }

        Ok(())
    }
}

fn parse_env(key: &str, default: &str, is_prod: bool) -> Result<i64, AppError> {
    get_env(key, Some(default), is_prod)?
        .parse()
        .map_err(|e: std::num::ParseIntError| {
            AppError::ConfigError(anyhow::anyhow!("{}: {}", key, e))
        })
}
