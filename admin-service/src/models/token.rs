//! Verification token model.
//!
//! Four token variants (email verification, password reset, register
//! invite, email change) share one shape and lifecycle; the variant
//! lives in the payload tag.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    EmailVerification,
    PasswordReset,
    RegisterInvite,
    EmailChange,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::EmailVerification => "email_verification",
            TokenKind::PasswordReset => "password_reset",
            TokenKind::RegisterInvite => "register_invite",
            TokenKind::EmailChange => "email_change",
        }
    }
}

/// The identity a token is bound to. Email-change tokens are keyed by
/// user id, since the account's email is what is being replaced;
/// everything else is keyed by email.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenSubject {
    Email(String),
    User(Uuid),
}

/// Variant-specific payload carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenPayload {
    EmailVerification {
        email: String,
    },
    PasswordReset {
        email: String,
    },
    RegisterInvite {
        email: String,
        username: String,
        invited_by: Uuid,
    },
    EmailChange {
        user_id: Uuid,
        new_email: String,
    },
}

impl TokenPayload {
    pub fn kind(&self) -> TokenKind {
        match self {
            TokenPayload::EmailVerification { .. } => TokenKind::EmailVerification,
            TokenPayload::PasswordReset { .. } => TokenKind::PasswordReset,
            TokenPayload::RegisterInvite { .. } => TokenKind::RegisterInvite,
            TokenPayload::EmailChange { .. } => TokenKind::EmailChange,
        }
    }

    pub fn subject(&self) -> TokenSubject {
        match self {
            TokenPayload::EmailVerification { email }
            | TokenPayload::PasswordReset { email }
            | TokenPayload::RegisterInvite { email, .. } => TokenSubject::Email(email.clone()),
            TokenPayload::EmailChange { user_id, .. } => TokenSubject::User(*user_id),
        }
    }
}

/// Single-use, time-limited secret proving the bearer completed an
/// out-of-band verification step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationToken {
    pub id: Uuid,
    pub kind: TokenKind,
    pub subject: TokenSubject,
    pub value: String,
    pub payload: TokenPayload,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl VerificationToken {
    /// Mint a token for the given payload. The opaque value is freshly
    /// generated; kind and subject are derived from the payload.
    pub fn new(payload: TokenPayload, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind: payload.kind(),
            subject: payload.subject(),
            value: generate_token_value(),
            payload,
            expires_at: now + ttl,
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

fn generate_token_value() -> String {
    let mut rng = rand::thread_rng();
    let token_bytes: [u8; 32] = rng.gen();
    hex::encode(token_bytes)
}
