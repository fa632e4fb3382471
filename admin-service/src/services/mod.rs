//! Services layer for the admin console.
//!
//! Business logic for credential management, verification tokens,
//! auth flows, and menu authorization.

mod auth;
mod credential;
mod email;
pub mod error;
mod permission;
mod seed;
mod session;
mod token;

pub use auth::{AuthService, InvitePreview, LoginOutcome};
pub use credential::CredentialService;
pub use email::{EmailProvider, MockEmailService, SentEmail, SmtpEmailService};
pub use error::ServiceError;
pub use permission::PermissionService;
pub use seed::SeedService;
pub use session::{JwtSessionIssuer, Session, SessionClaims, SessionError, SessionIssuer};
pub use token::TokenLifecycle;
