//! Authenticator
//!
//! Verifies a username/password pair against the account store and produces
//! a [`Principal`] for token issuance.

use std::sync::Arc;

use tracing::debug;

use crate::auth::password_service::PasswordService;
use crate::auth::token_service::Principal;
use crate::shared::error::{PlatformError, Result};
use crate::user::repository::UserRepository;

/// Credential verification against the account store.
pub struct Authenticator {
    user_repo: Arc<UserRepository>,
    password_service: Arc<PasswordService>,
}

impl Authenticator {
    pub fn new(user_repo: Arc<UserRepository>, password_service: Arc<PasswordService>) -> Self {
        Self {
            user_repo,
            password_service,
        }
    }

    /// Authenticate a username/password pair.
    ///
    /// An unknown username and a wrong password both surface as the same
    /// `InvalidCredentials` error so callers cannot probe which accounts
    /// exist.
    ///
    /// TODO: decide whether login should reject accounts that have not been
    /// approved yet (`enabled == false`); today a pending or suspended
    /// account still receives a valid token.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Principal> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(PlatformError::InvalidCredentials)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(PlatformError::InvalidCredentials)?;

        if !self.password_service.verify_password(password, hash) {
            debug!(username, "password verification failed");
            return Err(PlatformError::InvalidCredentials);
        }

        Ok(Principal::from(&user))
    }
}
