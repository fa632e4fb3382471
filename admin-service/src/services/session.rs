//! Session issuance capability.
//!
//! The auth flows treat this as an opaque collaborator: they only
//! distinguish `InvalidCredentials` from any other failure, which is
//! surfaced generically.

use crate::config::SessionConfig;
use crate::store::UserStore;
use crate::utils::{verify_password, Password, PasswordHashString};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use service_core::async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("session failure: {0}")]
    Other(String),
}

/// An established session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait SessionIssuer: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, SessionError>;

    async fn sign_out(&self) -> Result<(), SessionError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Credentials-checking issuer producing HS256 session tokens.
#[derive(Clone)]
pub struct JwtSessionIssuer {
    users: Arc<dyn UserStore>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl JwtSessionIssuer {
    pub fn new(users: Arc<dyn UserStore>, config: &SessionConfig) -> Self {
        Self {
            users,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            expiry: Duration::minutes(config.session_expiry_minutes),
        }
    }

    /// Decode and validate a session token.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, SessionError> {
        decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| SessionError::Other(e.to_string()))
    }
}

#[async_trait]
impl SessionIssuer for JwtSessionIssuer {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, SessionError> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(|e| SessionError::Other(e.to_string()))?
            .ok_or(SessionError::InvalidCredentials)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(SessionError::InvalidCredentials)?;

        if !verify_password(
            &Password::new(password),
            &PasswordHashString::new(hash),
        ) {
            return Err(SessionError::InvalidCredentials);
        }

        let now = Utc::now();
        let expires_at = now + self.expiry;
        let claims = SessionClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| SessionError::Other(e.to_string()))?;

        tracing::info!(user_id = %user.id, "Session established");

        Ok(Session {
            token,
            user_id: user.id,
            expires_at,
        })
    }

    async fn sign_out(&self) -> Result<(), SessionError> {
        // Stateless tokens: nothing to revoke server-side. The caller
        // drops its cookie and cached page state.
        tracing::info!("Session terminated");
        Ok(())
    }
}
