//! Registration & Approval Workflow
//!
//! Orchestrates account creation and the administrator-gated approval
//! lifecycle: accounts register disabled (`PendingApproval`), an admin
//! enables them (`Active`), and the same mutation path suspends or
//! re-enables them later. Role changes ride the same narrow update.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::password_service::PasswordService;
use crate::auth::token_service::Principal;
use crate::shared::error::{PlatformError, Result};
use crate::user::entity::{validate_candidate, Role, User};
use crate::user::repository::UserRepository;

/// Candidate account submitted through registration.
///
/// `role` and `enabled` are intentionally absent: whatever the caller sends
/// for them is discarded and the server-side defaults apply.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Username, at most 20 characters
    pub username: String,

    /// Email address, at most 50 characters
    pub email: String,

    /// Plaintext password, hashed before storage
    pub password: String,

    /// Display name, 5 to 50 characters
    pub full_name: String,
}

/// Admin-issued account mutation: only the approval bit and the role.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    /// Target account
    pub username: String,

    /// New approval state
    pub enabled: bool,

    /// New role
    pub role: Role,
}

/// Account registration and approval operations.
pub struct UserService {
    user_repo: Arc<UserRepository>,
    password_service: Arc<PasswordService>,
}

impl UserService {
    pub fn new(user_repo: Arc<UserRepository>, password_service: Arc<PasswordService>) -> Self {
        Self {
            user_repo,
            password_service,
        }
    }

    /// Register a new account: validate, hash the password, persist with
    /// `role = USER` and `enabled = false`. A uniqueness collision on any
    /// of username/email/full name surfaces as `Duplicate`.
    pub async fn register(&self, candidate: NewUser) -> Result<User> {
        validate_candidate(
            &candidate.username,
            &candidate.email,
            &candidate.password,
            &candidate.full_name,
        )?;

        let password_hash = self.password_service.hash_password(&candidate.password)?;
        let user = User::new(
            candidate.username,
            candidate.email,
            password_hash,
            candidate.full_name,
        );

        self.user_repo.insert(&user).await?;
        info!(username = %user.username, "account registered, pending approval");

        Ok(user)
    }

    /// Accounts awaiting an approval decision, admin only.
    ///
    /// Returns every account except the requester's own, password hashes
    /// stripped. The role gate runs before any data access.
    pub async fn list_for_approval(&self, principal: &Principal) -> Result<Vec<User>> {
        ensure_admin(principal)?;

        let users = self.user_repo.find_all_except(&principal.username).await?;
        Ok(users.iter().map(User::sanitized).collect())
    }

    /// Usernames visible to the requester: an admin sees every account,
    /// anyone else only sees accounts sharing their own role.
    pub async fn list_usernames(&self, principal: &Principal) -> Result<Vec<String>> {
        let users = if principal.is_admin() {
            self.user_repo.find_all().await?
        } else {
            self.user_repo.find_by_role(principal.role).await?
        };

        Ok(users.into_iter().map(|u| u.username).collect())
    }

    /// Apply an approval/role patch to the target account. Only `enabled`
    /// and `role` change; a missing target is a silent no-op, matching the
    /// update's narrow contract.
    pub async fn update_account(&self, patch: UserPatch) -> Result<()> {
        if let Some(mut user) = self.user_repo.find_by_username(&patch.username).await? {
            user.enabled = patch.enabled;
            user.role = patch.role;
            self.user_repo.update(&user).await?;
            info!(
                username = %patch.username,
                enabled = patch.enabled,
                role = patch.role.as_str(),
                "account updated"
            );
        }
        Ok(())
    }
}

/// Admin gate for the approval listing, checked before touching the store.
fn ensure_admin(principal: &Principal) -> Result<()> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(PlatformError::unauthorized(
            "only administrators may list accounts for approval",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            username: "someone".to_string(),
            email: "someone@x.com".to_string(),
            role,
            enabled: true,
            full_name: "Some One".to_string(),
        }
    }

    #[test]
    fn test_ensure_admin_allows_admin() {
        assert!(ensure_admin(&principal(Role::Admin)).is_ok());
    }

    #[test]
    fn test_ensure_admin_rejects_user() {
        let err = ensure_admin(&principal(Role::User)).unwrap_err();
        assert!(matches!(err, PlatformError::Unauthorized { .. }));
    }

    #[test]
    fn test_new_user_ignores_role_and_enabled() {
        // NewUser has no role/enabled fields at all; extra JSON keys from a
        // caller trying to self-approve are dropped by serde.
        let json = r#"{
            "username": "roja",
            "email": "roja@x.com",
            "password": "p1",
            "fullName": "M Roja X",
            "role": "ADMIN",
            "enabled": true
        }"#;
        let candidate: NewUser = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.username, "roja");

        let user = User::new(
            candidate.username,
            candidate.email,
            "$argon2id$stub",
            candidate.full_name,
        );
        assert_eq!(user.role, Role::User);
        assert!(!user.enabled);
    }

    #[test]
    fn test_user_patch_rejects_unknown_role() {
        let json = r#"{"username":"roja","enabled":true,"role":"ROOT"}"#;
        let result: std::result::Result<UserPatch, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
