use crate::services::session::SessionError;
use crate::store::StorageError;
use service_core::error::AppError;
use thiserror::Error;

/// Domain outcomes of the credential and token flows. These are
/// expected results, not faults: callers match on the kind and render
/// [`ServiceError::user_message`]. Only `Storage` and `Internal` are
/// genuine failures that propagate generically.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Email already in use")]
    EmailInUse,

    #[error("Email does not exist")]
    EmailNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Role not found")]
    RoleNotFound,

    #[error("Menu not found")]
    MenuNotFound,

    #[error("Menu cannot be nested under itself")]
    MenuCycle,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Session error: {0}")]
    Session(SessionError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    /// Short message safe to show to the end user. Internal error text
    /// never leaks here; only the kind drives the wording.
    pub fn user_message(&self) -> &'static str {
        match self {
            ServiceError::EmailInUse => "Email already in use!",
            ServiceError::EmailNotFound => "Email does not exist",
            ServiceError::InvalidCredentials => "Invalid credentials",
            ServiceError::InvalidToken => {
                "Invalid token, please use the link sent to your email to open."
            }
            ServiceError::TokenExpired => "Token has expired!",
            ServiceError::RoleNotFound => "Role does not exist",
            ServiceError::MenuNotFound => "Menu does not exist",
            ServiceError::MenuCycle => "A menu cannot be nested under itself",
            ServiceError::Email(_) => "Failed to send email",
            ServiceError::Storage(_) | ServiceError::Session(_) | ServiceError::Internal(_) => {
                "An error occurred"
            }
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::EmailInUse => AppError::Conflict(anyhow::anyhow!("Email already in use")),
            ServiceError::EmailNotFound => {
                AppError::NotFound(anyhow::anyhow!("Email does not exist"))
            }
            ServiceError::InvalidCredentials => {
                AppError::Unauthorized(anyhow::anyhow!("Invalid credentials"))
            }
            ServiceError::InvalidToken => AppError::BadRequest(anyhow::anyhow!("Invalid token")),
            ServiceError::TokenExpired => AppError::BadRequest(anyhow::anyhow!("Token expired")),
            ServiceError::RoleNotFound => AppError::NotFound(anyhow::anyhow!("Role not found")),
            ServiceError::MenuNotFound => AppError::NotFound(anyhow::anyhow!("Menu not found")),
            ServiceError::MenuCycle => {
                AppError::BadRequest(anyhow::anyhow!("Menu cannot be nested under itself"))
            }
            ServiceError::Storage(e) => AppError::StorageError(anyhow::Error::new(e)),
            ServiceError::Email(e) => AppError::EmailError(e),
            ServiceError::Session(e) => AppError::Unauthorized(anyhow::Error::new(e)),
            ServiceError::Internal(e) => AppError::InternalError(e),
        }
    }
}
