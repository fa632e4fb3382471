use crate::models::{MenuKind, MenuStatus};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMenuRequest {
    #[validate(length(min = 3, max = 50))]
    pub label: String,

    #[validate(length(min = 1, max = 20))]
    pub path: String,

    pub kind: MenuKind,

    pub parent_id: Option<Uuid>,

    /// Owning role in the seed case.
    pub role_id: Option<Uuid>,
}

/// Partial menu update. `parent_id` distinguishes "leave unchanged"
/// (outer `None`) from "move to root" (`Some(None)`).
#[derive(Debug, Deserialize, Validate, Default)]
pub struct UpdateMenuRequest {
    #[validate(length(min = 3, max = 50))]
    pub label: Option<String>,

    #[validate(length(min = 1, max = 20))]
    pub path: Option<String>,

    pub status: Option<MenuStatus>,

    pub parent_id: Option<Option<Uuid>>,
}
