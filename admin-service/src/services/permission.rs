//! Role -> menu authorization: the menu forest and its permission
//! edges.

use crate::dtos::menu::{CreateMenuRequest, UpdateMenuRequest};
use crate::models::{Menu, UserRole};
use crate::services::ServiceError;
use crate::store::{MenuStore, UserStore};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct PermissionService {
    users: Arc<dyn UserStore>,
    menus: Arc<dyn MenuStore>,
}

impl PermissionService {
    pub fn new(users: Arc<dyn UserStore>, menus: Arc<dyn MenuStore>) -> Self {
        Self { users, menus }
    }

    /// Insert a menu node. The parent, when given, must exist; cycles
    /// are impossible at insert time since the new node has no
    /// descendants yet.
    pub async fn create_menu(
        &self,
        req: CreateMenuRequest,
        actor: Uuid,
    ) -> Result<Menu, ServiceError> {
        if let Some(parent_id) = req.parent_id {
            self.menus
                .find_menu(parent_id)
                .await?
                .ok_or(ServiceError::MenuNotFound)?;
        }

        let menu = self
            .menus
            .insert_menu(Menu::new(
                req.label,
                req.path,
                req.kind,
                req.parent_id,
                req.role_id,
                actor,
            ))
            .await?;

        tracing::info!(menu_id = %menu.id, "Menu created");

        Ok(menu)
    }

    /// Update a menu node. A reparent is validated with an ancestor
    /// walk: assigning a node under itself or any of its descendants is
    /// rejected, keeping the forest acyclic by construction.
    pub async fn update_menu(
        &self,
        menu_id: Uuid,
        req: UpdateMenuRequest,
        actor: Uuid,
    ) -> Result<Menu, ServiceError> {
        let mut menu = self
            .menus
            .find_menu(menu_id)
            .await?
            .ok_or(ServiceError::MenuNotFound)?;

        if let Some(new_parent) = req.parent_id {
            match new_parent {
                Some(parent_id) => {
                    self.menus
                        .find_menu(parent_id)
                        .await?
                        .ok_or(ServiceError::MenuNotFound)?;

                    if self.is_self_or_descendant(menu_id, parent_id).await? {
                        return Err(ServiceError::MenuCycle);
                    }

                    menu.parent_id = Some(parent_id);
                }
                None => menu.parent_id = None,
            }
        }

        if let Some(label) = req.label {
            menu.label = label;
        }
        if let Some(path) = req.path {
            menu.path = path;
        }
        if let Some(status) = req.status {
            menu.status = status;
        }

        menu.updated_by = actor;
        menu.updated_at = Utc::now();

        self.menus.update_menu(menu.clone()).await?;

        Ok(menu)
    }

    /// Walk up from `candidate` towards the roots; true when the walk
    /// passes through `node`.
    async fn is_self_or_descendant(
        &self,
        node: Uuid,
        candidate: Uuid,
    ) -> Result<bool, ServiceError> {
        let mut current = Some(candidate);
        let mut visited = HashSet::new();

        while let Some(id) = current {
            if id == node {
                return Ok(true);
            }
            // A repeated id means pre-existing corruption; stop walking.
            if !visited.insert(id) {
                return Ok(true);
            }
            current = match self.menus.find_menu(id).await? {
                Some(menu) => menu.parent_id,
                None => None,
            };
        }

        Ok(false)
    }

    /// Replace the role's permission set with exactly `menu_ids`.
    /// Callers wanting additive behavior read the current set and
    /// write the union themselves.
    pub async fn assign(
        &self,
        role_id: Uuid,
        menu_ids: HashSet<Uuid>,
    ) -> Result<(), ServiceError> {
        self.users
            .find_role(role_id)
            .await?
            .ok_or(ServiceError::RoleNotFound)?;

        for menu_id in &menu_ids {
            self.menus
                .find_menu(*menu_id)
                .await?
                .ok_or(ServiceError::MenuNotFound)?;
        }

        self.menus.replace_permissions(role_id, menu_ids).await?;

        tracing::info!(role_id = %role_id, "Role permissions replaced");

        Ok(())
    }

    /// Resolve the menus a role may see. The super-admin role sees the
    /// entire forest unconditionally; every other role sees exactly its
    /// explicit edges, with no parent/child inheritance in either
    /// direction.
    pub async fn effective_menus(&self, role_id: Uuid) -> Result<Vec<Menu>, ServiceError> {
        let role = self
            .users
            .find_role(role_id)
            .await?
            .ok_or(ServiceError::RoleNotFound)?;

        let all = self.menus.all_menus().await?;

        if role.super_admin || role.user_role == UserRole::SuperAdmin {
            return Ok(all);
        }

        let granted = self.menus.permissions_for_role(role_id).await?;
        Ok(all.into_iter().filter(|m| granted.contains(&m.id)).collect())
    }
}
