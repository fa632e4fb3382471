//! In-memory store backed by `dashmap`.
//!
//! Used by the seed binary and the test suite. The delete-then-insert
//! pair in `generate` is not transactional; concurrent generates for
//! the same (kind, subject) are last-writer-wins, matching the
//! documented store contract.

use super::{MenuStore, StorageError, TokenStore, UserStore};
use crate::models::{normalize_email, Menu, Role, TokenKind, TokenPayload, User, VerificationToken};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use service_core::async_trait::async_trait;
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    roles: DashMap<Uuid, Role>,
    tokens: DashMap<Uuid, VerificationToken>,
    menus: DashMap<Uuid, Menu>,
    permissions: DashMap<Uuid, HashSet<Uuid>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn generate(
        &self,
        payload: TokenPayload,
        ttl: Duration,
    ) -> Result<VerificationToken, StorageError> {
        let token = VerificationToken::new(payload, ttl);

        // Invalidate any prior live token for the same (kind, subject).
        self.tokens
            .retain(|_, t| !(t.kind == token.kind && t.subject == token.subject));

        self.tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn find_live(
        &self,
        kind: TokenKind,
        value: &str,
    ) -> Result<Option<VerificationToken>, StorageError> {
        Ok(self
            .tokens
            .iter()
            .find(|entry| entry.kind == kind && entry.value == value)
            .map(|entry| entry.value().clone()))
    }

    async fn consume(&self, id: Uuid) -> Result<(), StorageError> {
        self.tokens.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let needle = normalize_email(email);
        Ok(self
            .users
            .iter()
            .find(|entry| entry.email == needle)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, user: User) -> Result<User, StorageError> {
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_password_hash(&self, id: Uuid, hash: String) -> Result<(), StorageError> {
        let mut user = self.users.get_mut(&id).ok_or(StorageError::NotFound)?;
        user.password_hash = Some(hash);
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_email_verified(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut user = self.users.get_mut(&id).ok_or(StorageError::NotFound)?;
        user.email_verified_at = Some(at);
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn update_email(&self, id: Uuid, email: String) -> Result<(), StorageError> {
        let mut user = self.users.get_mut(&id).ok_or(StorageError::NotFound)?;
        user.email = normalize_email(&email);
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn insert_role(&self, role: Role) -> Result<Role, StorageError> {
        self.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn find_role(&self, id: Uuid) -> Result<Option<Role>, StorageError> {
        Ok(self.roles.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_role_by_user(&self, user_id: Uuid) -> Result<Option<Role>, StorageError> {
        Ok(self
            .roles
            .iter()
            .find(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl MenuStore for MemoryStore {
    async fn insert_menu(&self, menu: Menu) -> Result<Menu, StorageError> {
        self.menus.insert(menu.id, menu.clone());
        Ok(menu)
    }

    async fn update_menu(&self, menu: Menu) -> Result<(), StorageError> {
        if !self.menus.contains_key(&menu.id) {
            return Err(StorageError::NotFound);
        }
        self.menus.insert(menu.id, menu);
        Ok(())
    }

    async fn find_menu(&self, id: Uuid) -> Result<Option<Menu>, StorageError> {
        Ok(self.menus.get(&id).map(|entry| entry.value().clone()))
    }

    async fn all_menus(&self) -> Result<Vec<Menu>, StorageError> {
        Ok(self.menus.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn replace_permissions(
        &self,
        role_id: Uuid,
        menu_ids: HashSet<Uuid>,
    ) -> Result<(), StorageError> {
        self.permissions.insert(role_id, menu_ids);
        Ok(())
    }

    async fn permissions_for_role(&self, role_id: Uuid) -> Result<HashSet<Uuid>, StorageError> {
        Ok(self
            .permissions
            .get(&role_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}
