//! Menu model - hierarchical navigable sections gated per role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Menu node status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuStatus {
    Active,
    Inactive,
}

/// Menu node kind: a grouping header or a navigable page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuKind {
    Group,
    Page,
}

/// Menu node entity. `parent_id = None` marks a forest root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    pub id: Uuid,
    pub label: String,
    pub path: String,
    pub status: MenuStatus,
    pub kind: MenuKind,
    pub parent_id: Option<Uuid>,
    /// Role that owns this node in the seed case.
    pub role_id: Option<Uuid>,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Menu {
    pub fn new(
        label: String,
        path: String,
        kind: MenuKind,
        parent_id: Option<Uuid>,
        role_id: Option<Uuid>,
        created_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            label,
            path,
            status: MenuStatus::Active,
            kind,
            parent_id,
            role_id,
            created_by,
            updated_by: created_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
