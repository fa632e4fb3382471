//! Auth flows: login, signup, invites, password reset, and the
//! verification pipelines.
//!
//! Each use case is an independent short pipeline with typed terminal
//! outcomes. Any "fetch by email/id" step that finds nothing is a
//! terminal error for that use case; tokens are never consumed on
//! behalf of an account that no longer exists without reporting it.

use crate::dtos::auth::{
    AcceptInviteRequest, InviteRequest, LoginRequest, NewPasswordRequest, ResetRequest,
    SignupRequest,
};
use crate::models::{TokenKind, TokenPayload, UserResponse};
use crate::services::{
    CredentialService, EmailProvider, ServiceError, Session, SessionError, SessionIssuer,
    TokenLifecycle,
};
use crate::store::UserStore;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Terminal outcome of a login attempt.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    SignedIn(Session),
    /// The account exists but is unverified: a fresh verification
    /// token was sent instead of attempting credential comparison.
    VerificationSent { email: String },
}

/// Live register-invite details, for prefilling the signup form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitePreview {
    pub email: String,
    pub username: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenLifecycle,
    credentials: CredentialService,
    email: Arc<dyn EmailProvider>,
    sessions: Arc<dyn SessionIssuer>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: TokenLifecycle,
        credentials: CredentialService,
        email: Arc<dyn EmailProvider>,
        sessions: Arc<dyn SessionIssuer>,
    ) -> Self {
        Self {
            users,
            tokens,
            credentials,
            email,
            sessions,
        }
    }

    pub async fn login(&self, req: LoginRequest) -> Result<LoginOutcome, ServiceError> {
        let user = self
            .users
            .find_by_email(&req.email)
            .await?
            .ok_or(ServiceError::EmailNotFound)?;

        // OAuth-only accounts never go through credential comparison.
        if !user.can_password_login() {
            return Err(ServiceError::EmailNotFound);
        }

        if !user.is_verified() {
            let token = self
                .tokens
                .issue(TokenPayload::EmailVerification {
                    email: user.email.clone(),
                })
                .await?;

            self.email
                .send_verification_email(&user.email, &token.value)
                .await?;

            tracing::info!(user_id = %user.id, "Unverified login, verification re-sent");

            return Ok(LoginOutcome::VerificationSent { email: user.email });
        }

        match self.sessions.sign_in(&user.email, &req.password).await {
            Ok(session) => Ok(LoginOutcome::SignedIn(session)),
            Err(SessionError::InvalidCredentials) => Err(ServiceError::InvalidCredentials),
            // Anything else from the issuer is surfaced generically.
            Err(e) => Err(ServiceError::Session(e)),
        }
    }

    pub async fn signup(&self, req: SignupRequest) -> Result<UserResponse, ServiceError> {
        let (user, token) = self
            .credentials
            .create_self_signup(&req.email, &req.name, &req.password)
            .await?;

        self.email
            .send_verification_email(&user.email, &token.value)
            .await?;

        Ok(user.sanitized())
    }

    /// Admin-initiated invite: mints the invite token and delivers it.
    pub async fn invite_user(
        &self,
        req: InviteRequest,
        admin_id: Uuid,
    ) -> Result<(), ServiceError> {
        let token = self
            .credentials
            .create_pending_invite(&req.email, &req.username, admin_id)
            .await?;

        self.email.send_invite_email(&req.email, &token.value).await
    }

    /// Peek at a live invite without consuming it.
    pub async fn inspect_invite(&self, token_value: &str) -> Result<InvitePreview, ServiceError> {
        match self
            .tokens
            .inspect(TokenKind::RegisterInvite, token_value)
            .await?
        {
            TokenPayload::RegisterInvite {
                email, username, ..
            } => Ok(InvitePreview { email, username }),
            _ => Err(ServiceError::InvalidToken),
        }
    }

    /// Redeem an invite: consumes the token and creates the account.
    pub async fn accept_invite(
        &self,
        req: AcceptInviteRequest,
    ) -> Result<UserResponse, ServiceError> {
        let user = self
            .credentials
            .create_invited_signup(&req.token, &req.username, &req.password)
            .await?;

        Ok(user.sanitized())
    }

    pub async fn request_password_reset(&self, req: ResetRequest) -> Result<(), ServiceError> {
        let user = self
            .users
            .find_by_email(&req.email)
            .await?
            .ok_or(ServiceError::EmailNotFound)?;

        let token = self
            .tokens
            .issue(TokenPayload::PasswordReset {
                email: user.email.clone(),
            })
            .await?;

        self.email
            .send_password_reset_email(&user.email, &token.value)
            .await
    }

    pub async fn complete_password_reset(
        &self,
        req: NewPasswordRequest,
    ) -> Result<(), ServiceError> {
        let payload = self
            .tokens
            .verify_and_consume(TokenKind::PasswordReset, &req.token)
            .await?;

        let email = match payload {
            TokenPayload::PasswordReset { email } => email,
            _ => return Err(ServiceError::InvalidToken),
        };

        // The account may have been deleted while the token was live.
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(ServiceError::EmailNotFound)?;

        let hash = crate::utils::hash_password(&crate::utils::Password::new(req.password))?;
        self.users
            .update_password_hash(user.id, hash.into_string())
            .await?;

        tracing::info!(user_id = %user.id, "Password reset completed");

        Ok(())
    }

    /// Initial email verification: marks the account verified.
    pub async fn verify_email(&self, token_value: &str) -> Result<(), ServiceError> {
        let payload = self
            .tokens
            .verify_and_consume(TokenKind::EmailVerification, token_value)
            .await?;

        let email = match payload {
            TokenPayload::EmailVerification { email } => email,
            _ => return Err(ServiceError::InvalidToken),
        };

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(ServiceError::EmailNotFound)?;

        self.users.set_email_verified(user.id, Utc::now()).await?;

        tracing::info!(user_id = %user.id, "Email verified");

        Ok(())
    }

    /// Start an email change for an existing (possibly already
    /// verified) account. The token is keyed by user id and delivered
    /// to the new address.
    pub async fn request_email_change(
        &self,
        user_id: Uuid,
        new_email: &str,
    ) -> Result<(), ServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::EmailNotFound)?;

        if self.users.find_by_email(new_email).await?.is_some() {
            return Err(ServiceError::EmailInUse);
        }

        let token = self
            .tokens
            .issue(TokenPayload::EmailChange {
                user_id: user.id,
                new_email: crate::models::normalize_email(new_email),
            })
            .await?;

        self.email
            .send_email_change_email(new_email, &token.value)
            .await
    }

    /// Complete an email change. Keyed by user id, unlike the initial
    /// verification flow.
    pub async fn verify_email_change(&self, token_value: &str) -> Result<(), ServiceError> {
        let payload = self
            .tokens
            .verify_and_consume(TokenKind::EmailChange, token_value)
            .await?;

        let (user_id, new_email) = match payload {
            TokenPayload::EmailChange { user_id, new_email } => (user_id, new_email),
            _ => return Err(ServiceError::InvalidToken),
        };

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::EmailNotFound)?;

        self.users.update_email(user.id, new_email).await?;

        tracing::info!(user_id = %user.id, "Email updated");

        Ok(())
    }

    /// Terminate the external session. Pure side effect on the session
    /// issuer; no Token/User state is touched.
    pub async fn logout(&self) -> Result<(), ServiceError> {
        self.sessions.sign_out().await.map_err(ServiceError::Session)
    }
}
