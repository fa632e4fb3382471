use thiserror::Error;

/// Top-level error taxonomy shared by the admin console services.
///
/// Lower layers convert their own error enums into `AppError` at the
/// boundary. Only the error kind drives what an end user sees (see
/// [`AppError::user_message`]); the payload is for logs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(anyhow::Error),

    #[error("Conflict: {0}")]
    Conflict(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Storage error: {0}")]
    StorageError(anyhow::Error),

    #[error("Email error: {0}")]
    EmailError(String),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<lettre::error::Error> for AppError {
    fn from(err: lettre::error::Error) -> Self {
        AppError::EmailError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl AppError {
    /// Short human-readable message safe to show to an end user.
    ///
    /// Internal detail (storage error text, backtraces) stays in the
    /// logs and must never be forwarded verbatim.
    pub fn user_message(&self) -> String {
        match self {
            AppError::BadRequest(e) => e.to_string(),
            AppError::NotFound(e) => e.to_string(),
            AppError::Unauthorized(e) => e.to_string(),
            AppError::Conflict(e) => e.to_string(),
            AppError::InternalError(_) | AppError::StorageError(_) => {
                "An error occurred".to_string()
            }
            AppError::EmailError(_) => "Failed to send email".to_string(),
            AppError::ConfigError(_) => "Service misconfigured".to_string(),
        }
    }
}
