//! Account creation and password hashing.
//!
//! This service is the only place password hashes are written.

use crate::models::{TokenKind, TokenPayload, User, VerificationToken};
use crate::services::{ServiceError, TokenLifecycle};
use crate::store::UserStore;
use crate::utils::{hash_password, Password};
use std::sync::Arc;

#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserStore>,
    tokens: TokenLifecycle,
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenLifecycle) -> Self {
        Self { users, tokens }
    }

    /// Self-signup: create an unverified account and issue its email
    /// verification token. `EmailInUse` short-circuits before any
    /// mutation.
    pub async fn create_self_signup(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<(User, VerificationToken), ServiceError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(ServiceError::EmailInUse);
        }

        let password_hash = hash_password(&Password::new(password))?;

        let user = self
            .users
            .insert(User::new(
                email.to_string(),
                name.to_string(),
                password_hash.into_string(),
            ))
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        let token = self
            .tokens
            .issue(TokenPayload::EmailVerification {
                email: user.email.clone(),
            })
            .await?;

        Ok((user, token))
    }

    /// Invite redemption: consume the register-invite token, then
    /// create a pre-verified account stamped with the inviting admin.
    ///
    /// The invited email may have been registered between invite
    /// issuance and redemption; that race surfaces as `EmailInUse`.
    pub async fn create_invited_signup(
        &self,
        token_value: &str,
        username: &str,
        password: &str,
    ) -> Result<User, ServiceError> {
        let payload = self
            .tokens
            .verify_and_consume(TokenKind::RegisterInvite, token_value)
            .await?;

        let (email, invited_by) = match payload {
            TokenPayload::RegisterInvite {
                email, invited_by, ..
            } => (email, invited_by),
            _ => return Err(ServiceError::InvalidToken),
        };

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::EmailInUse);
        }

        let password_hash = hash_password(&Password::new(password))?;

        let user = self
            .users
            .insert(User::new_invited(
                email,
                username.to_string(),
                password_hash.into_string(),
                invited_by,
            ))
            .await?;

        tracing::info!(user_id = %user.id, invited_by = %invited_by, "Invited user created");

        Ok(user)
    }

    /// Admin-initiated invite: mint a register-invite token for the
    /// notification sink to deliver. No user row is created yet.
    pub async fn create_pending_invite(
        &self,
        email: &str,
        username: &str,
        admin_id: uuid::Uuid,
    ) -> Result<VerificationToken, ServiceError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(ServiceError::EmailInUse);
        }

        let token = self
            .tokens
            .issue(TokenPayload::RegisterInvite {
                email: crate::models::normalize_email(email),
                username: username.to_string(),
                invited_by: admin_id,
            })
            .await?;

        tracing::info!(invited_by = %admin_id, "Register invite issued");

        Ok(token)
    }
}
