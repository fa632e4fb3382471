//! Token lifecycle: generation with variant-specific TTLs and
//! single-use consumption.

use crate::config::TokenTtlConfig;
use crate::models::{TokenKind, TokenPayload, VerificationToken};
use crate::services::ServiceError;
use crate::store::TokenStore;
use std::sync::Arc;

/// Wraps the token store with expiry policy.
///
/// Consumption here is deliberately not atomic with the caller's
/// follow-up mutation (marking an email verified, writing a new
/// password hash). If that mutation fails the token is already gone
/// and the user must request a new one. The store seam has no
/// cross-entity transaction, so the gap is kept and documented rather
/// than papered over.
#[derive(Clone)]
pub struct TokenLifecycle {
    store: Arc<dyn TokenStore>,
    ttls: TokenTtlConfig,
}

impl TokenLifecycle {
    pub fn new(store: Arc<dyn TokenStore>, ttls: TokenTtlConfig) -> Self {
        Self { store, ttls }
    }

    /// Mint a token for `payload`. Any live token for the same
    /// (kind, subject) is replaced; the earlier value stops resolving.
    pub async fn issue(&self, payload: TokenPayload) -> Result<VerificationToken, ServiceError> {
        let kind = payload.kind();
        let token = self.store.generate(payload, self.ttls.ttl(kind)).await?;

        tracing::info!(
            kind = kind.as_str(),
            token_id = %token.id,
            "Verification token issued"
        );

        Ok(token)
    }

    /// Resolve a token by value and consume it.
    ///
    /// Unknown value -> `InvalidToken`. Expired -> `TokenExpired`; the
    /// expired row is left in place, so a retry reports Expired again
    /// (or InvalidToken once replaced), never success. Otherwise the
    /// token is deleted before the payload is returned, enforcing
    /// single use.
    pub async fn verify_and_consume(
        &self,
        kind: TokenKind,
        value: &str,
    ) -> Result<TokenPayload, ServiceError> {
        let token = self
            .store
            .find_live(kind, value)
            .await?
            .ok_or(ServiceError::InvalidToken)?;

        if token.is_expired() {
            return Err(ServiceError::TokenExpired);
        }

        self.store.consume(token.id).await?;

        tracing::info!(
            kind = kind.as_str(),
            token_id = %token.id,
            "Verification token consumed"
        );

        Ok(token.payload)
    }

    /// Resolve a token by value without consuming it. Used to prefill
    /// the invite signup form before the user submits.
    pub async fn inspect(
        &self,
        kind: TokenKind,
        value: &str,
    ) -> Result<TokenPayload, ServiceError> {
        let token = self
            .store
            .find_live(kind, value)
            .await?
            .ok_or(ServiceError::InvalidToken)?;

        if token.is_expired() {
            return Err(ServiceError::TokenExpired);
        }

        Ok(token.payload)
    }
}
