//! Role model - authorization grouping assigned to exactly one user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed role enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    Member,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "superAdmin",
            UserRole::Admin => "admin",
            UserRole::Member => "member",
        }
    }
}

/// Role entity. Each role belongs to exactly one user; the seeded
/// super-admin role additionally carries the `super_admin` flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_role: UserRole,
    pub name: Option<String>,
    pub super_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn new(user_id: Uuid, user_role: UserRole, name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            user_role,
            name,
            super_admin: user_role == UserRole::SuperAdmin,
            created_at: Utc::now(),
        }
    }
}
