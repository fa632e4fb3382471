//! Seeding: the fixed super-admin account and the dev admin fixture.

use crate::config::SeedConfig;
use crate::models::{Menu, MenuKind, Role, User, UserRole};
use crate::services::ServiceError;
use crate::store::{MenuStore, UserStore};
use crate::utils::{hash_password, Password};
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct SeedService {
    users: Arc<dyn UserStore>,
    menus: Arc<dyn MenuStore>,
    config: SeedConfig,
}

impl SeedService {
    pub fn new(users: Arc<dyn UserStore>, menus: Arc<dyn MenuStore>, config: SeedConfig) -> Self {
        Self {
            users,
            menus,
            config,
        }
    }

    /// Seed the super-admin account from the configured identity.
    ///
    /// Exactly one super admin ever exists: when the configured email
    /// is already registered this is a no-op, not an error.
    pub async fn seed_super_admin(&self) -> Result<(), ServiceError> {
        if self
            .users
            .find_by_email(&self.config.super_admin_email)
            .await?
            .is_some()
        {
            tracing::info!("Super admin already exists");
            return Ok(());
        }

        tracing::info!("Seeding super admin");

        let hash = hash_password(&Password::new(self.config.super_admin_password.clone()))?;

        let mut user = User::new(
            self.config.super_admin_email.clone(),
            "super admin".to_string(),
            hash.into_string(),
        );
        user.id = self.config.super_admin_id;
        user.email_verified_at = Some(Utc::now());

        let user = self.users.insert(user).await?;
        let role = self
            .users
            .insert_role(Role::new(user.id, UserRole::SuperAdmin, None))
            .await?;

        tracing::info!(
            user_id = %user.id,
            role = role.user_role.as_str(),
            "Super admin seeded"
        );

        Ok(())
    }

    /// Seed a development admin with a role and a root "Dashboard"
    /// menu owned by that role. Idempotent by email existence check.
    pub async fn seed_dev_admin(&self) -> Result<(), ServiceError> {
        const DEV_ADMIN_EMAIL: &str = "admin@test.com";

        if self.users.find_by_email(DEV_ADMIN_EMAIL).await?.is_some() {
            return Ok(());
        }

        tracing::info!("Seeding dev admin");

        let hash = hash_password(&Password::new("admin1234"))?;

        let mut user = User::new(
            DEV_ADMIN_EMAIL.to_string(),
            "admin".to_string(),
            hash.into_string(),
        );
        user.email_verified_at = Some(Utc::now());
        user.created_by = Some(self.config.super_admin_id);

        let user = self.users.insert(user).await?;
        let role = self
            .users
            .insert_role(Role::new(
                user.id,
                UserRole::Admin,
                Some("Admin".to_string()),
            ))
            .await?;

        self.menus
            .insert_menu(Menu::new(
                "Dashboard".to_string(),
                "/".to_string(),
                MenuKind::Page,
                None,
                Some(role.id),
                user.id,
            ))
            .await?;

        tracing::info!(
            user_id = %user.id,
            role_id = %role.id,
            role = role.user_role.as_str(),
            "Dev admin seeded"
        );

        Ok(())
    }
}
