//! User model - admin console identity records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity.
///
/// `password_hash` is `None` for OAuth-only accounts; such users can
/// never authenticate through the password flow regardless of their
/// verification state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub email_verified_at: Option<DateTime<Utc>>,
    /// Admin that created this account, for admin-invited signups.
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a self-signup user. Unverified until the email
    /// verification token is consumed.
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(&email),
            name,
            password_hash: Some(password_hash),
            email_verified_at: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an admin-invited user. The invite proves the email was
    /// reachable, so the account starts verified and stamped with the
    /// inviting admin.
    pub fn new_invited(
        email: String,
        name: String,
        password_hash: String,
        invited_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(&email),
            name,
            password_hash: Some(password_hash),
            email_verified_at: Some(now),
            created_by: Some(invited_by),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }

    /// Whether this account can go through the password login flow at all.
    pub fn can_password_login(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Convert to a response without sensitive fields.
    pub fn sanitized(&self) -> UserResponse {
        UserResponse::from(self.clone())
    }
}

/// Case-normalized form used for every email comparison and storage.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User response without sensitive fields.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            email_verified_at: u.email_verified_at,
            created_by: u.created_by,
            created_at: u.created_at,
        }
    }
}
