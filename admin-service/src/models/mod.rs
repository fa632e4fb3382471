pub mod menu;
pub mod role;
pub mod token;
pub mod user;

pub use menu::{Menu, MenuKind, MenuStatus};
pub use role::{Role, UserRole};
pub use token::{TokenKind, TokenPayload, TokenSubject, VerificationToken};
pub use user::{normalize_email, User, UserResponse};
