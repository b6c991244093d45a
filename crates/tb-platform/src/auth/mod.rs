//! Authentication: password hashing, stateless token handling, and
//! credential verification.

pub mod authenticator;
pub mod password_service;
pub mod token_service;

pub use authenticator::Authenticator;
pub use password_service::{Argon2Config, PasswordService};
pub use token_service::{Principal, TokenClaims, TokenConfig, TokenService};
