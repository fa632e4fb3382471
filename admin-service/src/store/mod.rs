//! Persistence seam for the admin console core.
//!
//! The rest of the crate only talks to these traits; the concrete
//! backend is injected as `Arc<dyn _>`. Each store owns its records
//! exclusively: tokens are only touched through [`TokenStore`], user
//! rows through [`UserStore`], menus and role permission edges through
//! [`MenuStore`].

mod memory;

pub use memory::MemoryStore;

use crate::models::{Menu, Role, TokenKind, TokenPayload, User, VerificationToken};
use chrono::{DateTime, Duration, Utc};
use service_core::async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

/// Persistence-layer failure. Writes are never silently dropped; any
/// backend problem surfaces here.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("record not found")]
    NotFound,
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Mint and persist a token for `payload`, expiring after `ttl`.
    ///
    /// Any live token for the same (kind, subject) is deleted first, so
    /// at most one live token per (kind, subject) ever exists.
    async fn generate(
        &self,
        payload: TokenPayload,
        ttl: Duration,
    ) -> Result<VerificationToken, StorageError>;

    /// Look up an unconsumed token by its opaque value. Expiry is not
    /// filtered here; the lifecycle layer decides Expired vs NotFound.
    async fn find_live(
        &self,
        kind: TokenKind,
        value: &str,
    ) -> Result<Option<VerificationToken>, StorageError>;

    /// Delete a token. Idempotent: consuming an id that no longer
    /// exists is a no-op, not an error.
    async fn consume(&self, id: Uuid) -> Result<(), StorageError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Case-insensitive lookup by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StorageError>;

    async fn insert(&self, user: User) -> Result<User, StorageError>;

    async fn update_password_hash(&self, id: Uuid, hash: String) -> Result<(), StorageError>;

    async fn set_email_verified(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StorageError>;

    async fn update_email(&self, id: Uuid, email: String) -> Result<(), StorageError>;

    async fn insert_role(&self, role: Role) -> Result<Role, StorageError>;

    async fn find_role(&self, id: Uuid) -> Result<Option<Role>, StorageError>;

    async fn find_role_by_user(&self, user_id: Uuid) -> Result<Option<Role>, StorageError>;
}

#[async_trait]
pub trait MenuStore: Send + Sync {
    async fn insert_menu(&self, menu: Menu) -> Result<Menu, StorageError>;

    async fn update_menu(&self, menu: Menu) -> Result<(), StorageError>;

    async fn find_menu(&self, id: Uuid) -> Result<Option<Menu>, StorageError>;

    async fn all_menus(&self) -> Result<Vec<Menu>, StorageError>;

    /// Replace the role's permission edges with exactly `menu_ids`.
    async fn replace_permissions(
        &self,
        role_id: Uuid,
        menu_ids: HashSet<Uuid>,
    ) -> Result<(), StorageError>;

    async fn permissions_for_role(&self, role_id: Uuid) -> Result<HashSet<Uuid>, StorageError>;
}
