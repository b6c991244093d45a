//! User Entity
//!
//! Account record for the credential store, keyed by username. Uniqueness of
//! username (the `_id`), email, and full name is enforced by the collection's
//! unique indexes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::error::{PlatformError, Result};

/// Account role.
///
/// Deliberately a closed enumeration: unknown role strings are rejected at
/// the serde boundary instead of being stored verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Administrator: approves registrations, sees every account
    Admin,
    /// Regular user
    User,
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }
}

/// Account entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Username, unique and immutable
    #[serde(rename = "_id")]
    pub username: String,

    /// Email address (unique)
    pub email: String,

    /// Argon2id digest in PHC format; cleared before the record leaves the
    /// store in any response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    /// Account role
    #[serde(default)]
    pub role: Role,

    /// Approval state; accounts register disabled and an administrator
    /// flips this on
    #[serde(default)]
    pub enabled: bool,

    /// Display name (unique)
    pub full_name: String,
}

impl User {
    /// Create a freshly registered account: role `USER`, disabled, pending
    /// approval. Caller-supplied role/enabled values never reach this point.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: Some(password_hash.into()),
            role: Role::User,
            enabled: false,
            full_name: full_name.into(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Copy of this account with the password hash stripped, safe to embed
    /// in listings.
    pub fn sanitized(&self) -> Self {
        Self {
            password_hash: None,
            ..self.clone()
        }
    }
}

/// Field constraints for candidate accounts.
///
/// Applied before hashing or persisting anything; violations surface as
/// `Validation` errors.
pub fn validate_candidate(
    username: &str,
    email: &str,
    password: &str,
    full_name: &str,
) -> Result<()> {
    let mut errors = Vec::new();

    if username.trim().is_empty() {
        errors.push("username must not be empty".to_string());
    } else if username.len() > 20 {
        errors.push("username must be at most 20 characters".to_string());
    }

    if email.len() > 50 {
        errors.push("email must be at most 50 characters".to_string());
    } else if !is_valid_email(email) {
        errors.push("email address is not valid".to_string());
    }

    if password.is_empty() {
        errors.push("password must not be empty".to_string());
    } else if password.len() > 120 {
        errors.push("password must be at most 120 characters".to_string());
    }

    let name_len = full_name.trim().chars().count();
    if !(5..=50).contains(&name_len) {
        errors.push("full name must be between 5 and 50 characters".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(PlatformError::validation(errors.join("; ")))
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_starts_pending() {
        let user = User::new("roja", "roja@x.com", "$argon2id$stub", "M Roja X");
        assert_eq!(user.role, Role::User);
        assert!(!user.enabled);
        assert!(user.password_hash.is_some());
    }

    #[test]
    fn test_sanitized_strips_hash() {
        let user = User::new("roja", "roja@x.com", "$argon2id$stub", "M Roja X");
        let sanitized = user.sanitized();
        assert!(sanitized.password_hash.is_none());
        assert_eq!(sanitized.username, "roja");

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("passwordHash"));
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"USER\"");
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result: std::result::Result<Role, _> = serde_json::from_str("\"SUPERUSER\"");
        assert!(result.is_err());

        let result: std::result::Result<Role, _> = serde_json::from_str("\"admin\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_candidate_accepts_good_input() {
        assert!(validate_candidate("roja", "roja@x.com", "p1", "M Roja X").is_ok());
    }

    #[test]
    fn test_validate_candidate_username_rules() {
        assert!(validate_candidate("", "roja@x.com", "p1", "M Roja X").is_err());
        assert!(validate_candidate(
            "a-username-longer-than-twenty",
            "roja@x.com",
            "p1",
            "M Roja X"
        )
        .is_err());
    }

    #[test]
    fn test_validate_candidate_email_rules() {
        assert!(validate_candidate("roja", "not-an-email", "p1", "M Roja X").is_err());
        assert!(validate_candidate("roja", "@x.com", "p1", "M Roja X").is_err());
        assert!(validate_candidate("roja", "roja@", "p1", "M Roja X").is_err());
        assert!(validate_candidate("roja", "roja@nodot", "p1", "M Roja X").is_err());
    }

    #[test]
    fn test_validate_candidate_full_name_rules() {
        assert!(validate_candidate("roja", "roja@x.com", "p1", "Ro").is_err());
        assert!(validate_candidate("roja", "roja@x.com", "p1", &"x".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_candidate_password_rules() {
        assert!(validate_candidate("roja", "roja@x.com", "", "M Roja X").is_err());
        assert!(validate_candidate("roja", "roja@x.com", &"p".repeat(121), "M Roja X").is_err());
    }
}
