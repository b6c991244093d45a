//! Users API Endpoints
//!
//! - POST /users/register - Create a new account (starts disabled)
//! - POST /users/login - Password login, returns a bearer token
//! - GET /users/all - Usernames visible to the caller
//! - GET /users - Accounts awaiting approval (admin only)
//! - PUT /users - Update an account's enabled flag and role
//!
//! Every endpoint answers with the [`GenericResponse`] envelope. Workflow
//! failures are rendered into the envelope with `status = false`; in
//! particular a failed login stays HTTP 200 and signals failure only through
//! the flag, with one generic message for unknown accounts and wrong
//! passwords alike.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::auth::authenticator::Authenticator;
use crate::auth::token_service::TokenService;
use crate::shared::api_common::GenericResponse;
use crate::shared::error::PlatformError;
use crate::shared::middleware::Authenticated;
use crate::user::entity::User;
use crate::user::service::{NewUser, UserPatch, UserService};

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username
    pub username: String,

    /// Password
    pub password: String,
}

/// Account summary returned by registration and the approval listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Username
    pub username: String,
    /// Email address
    pub email: String,
    /// Account role
    pub role: crate::user::entity::Role,
    /// Approval state
    pub enabled: bool,
    /// Display name
    pub full_name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            enabled: user.enabled,
            full_name: user.full_name.clone(),
        }
    }
}

/// Users API state
#[derive(Clone)]
pub struct UsersState {
    pub user_service: Arc<UserService>,
    pub authenticator: Arc<Authenticator>,
    pub token_service: Arc<TokenService>,
}

/// Message shown for any login failure; deliberately the same for unknown
/// accounts and bad passwords.
const LOGIN_FAILED: &str = "invalid username or password";

/// Register a new account
///
/// The account is stored disabled with role USER regardless of what the
/// caller supplied, and waits for administrator approval.
#[utoipa::path(
    post,
    path = "/register",
    tag = "users",
    operation_id = "postUsersRegister",
    request_body = NewUser,
    responses(
        (status = 200, description = "Envelope with the created account, or a conflict/validation failure")
    )
)]
pub async fn register(
    State(state): State<UsersState>,
    Json(candidate): Json<NewUser>,
) -> Json<GenericResponse<UserResponse>> {
    match state.user_service.register(candidate).await {
        Ok(user) => Json(GenericResponse::ok(
            "user registered and pending approval",
            UserResponse::from(&user),
        )),
        Err(e) => {
            warn!("registration failed: {}", e);
            Json(GenericResponse::failure(user_facing_message(&e)))
        }
    }
}

/// Log in with username and password
///
/// Returns a signed bearer token in the envelope payload. Always HTTP 200;
/// failure is signalled by `status = false` and a generic message.
#[utoipa::path(
    post,
    path = "/login",
    tag = "users",
    operation_id = "postUsersLogin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Envelope with a token on success, or status=false on failure")
    )
)]
pub async fn login(
    State(state): State<UsersState>,
    Json(req): Json<LoginRequest>,
) -> Json<GenericResponse<String>> {
    let principal = match state
        .authenticator
        .authenticate(&req.username, &req.password)
        .await
    {
        Ok(principal) => principal,
        Err(e) => {
            warn!(username = %req.username, "login failed: {}", e);
            return Json(GenericResponse::failure(LOGIN_FAILED));
        }
    };

    match state.token_service.issue(&principal) {
        Ok(token) => Json(GenericResponse::ok("token issued successfully", token)),
        Err(e) => {
            warn!(username = %req.username, "token issuance failed: {}", e);
            Json(GenericResponse::failure(LOGIN_FAILED))
        }
    }
}

/// List visible usernames
///
/// Administrators see every account's username; other callers only see
/// usernames of accounts sharing their own role.
#[utoipa::path(
    get,
    path = "/all",
    tag = "users",
    operation_id = "getUsersAll",
    responses(
        (status = 200, description = "Envelope with the visible usernames"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_usernames(
    State(state): State<UsersState>,
    auth: Authenticated,
) -> Json<GenericResponse<Vec<String>>> {
    match state.user_service.list_usernames(&auth).await {
        Ok(usernames) => Json(GenericResponse::ok("users fetched successfully", usernames)),
        Err(e) => {
            warn!("username listing failed: {}", e);
            Json(GenericResponse::failure(user_facing_message(&e)))
        }
    }
}

/// List accounts awaiting approval
///
/// Admin only. Returns every account except the caller's own, with password
/// hashes stripped.
#[utoipa::path(
    get,
    path = "/",
    tag = "users",
    operation_id = "getUsersForApproval",
    responses(
        (status = 200, description = "Envelope with the accounts, or status=false when not an admin"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_for_approval(
    State(state): State<UsersState>,
    auth: Authenticated,
) -> Json<GenericResponse<Vec<UserResponse>>> {
    match state.user_service.list_for_approval(&auth).await {
        Ok(users) => Json(GenericResponse::ok(
            "users fetched successfully",
            users.iter().map(UserResponse::from).collect(),
        )),
        Err(e) => {
            warn!(username = %auth.username, "approval listing failed: {}", e);
            Json(GenericResponse::failure(user_facing_message(&e)))
        }
    }
}

/// Update an account's approval state and role
///
/// The only mutable fields are `enabled` and `role`; no other account data
/// can be changed through this endpoint.
#[utoipa::path(
    put,
    path = "/",
    tag = "users",
    operation_id = "putUsers",
    request_body = UserPatch,
    responses(
        (status = 200, description = "Envelope confirming the update"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn update_user(
    State(state): State<UsersState>,
    auth: Authenticated,
    Json(patch): Json<UserPatch>,
) -> Json<GenericResponse<()>> {
    match state.user_service.update_account(patch).await {
        Ok(()) => Json(GenericResponse::ok_empty("user updated successfully")),
        Err(e) => {
            warn!(username = %auth.username, "account update failed: {}", e);
            Json(GenericResponse::failure(user_facing_message(&e)))
        }
    }
}

/// Envelope message for a workflow failure. Validation, conflict, and
/// authorization failures explain themselves; storage and internal errors
/// collapse into a fixed message so no driver detail leaks.
fn user_facing_message(err: &PlatformError) -> String {
    match err {
        PlatformError::Validation { .. }
        | PlatformError::Duplicate { .. }
        | PlatformError::Unauthorized { .. }
        | PlatformError::NotFound { .. } => err.to_string(),
        _ => "request could not be processed".to_string(),
    }
}

/// Create the users router
pub fn users_router(state: UsersState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(register))
        .routes(routes!(login))
        .routes(routes!(list_usernames))
        .routes(routes!(list_for_approval, update_user))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::entity::Role;

    #[test]
    fn test_login_request_deserialization() {
        let json = r#"{"username":"roja","password":"p1"}"#;
        let req: LoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.username, "roja");
        assert_eq!(req.password, "p1");
    }

    #[test]
    fn test_user_response_has_no_hash_field() {
        let user = User::new("roja", "roja@x.com", "$argon2id$stub", "M Roja X");
        let json = serde_json::to_string(&UserResponse::from(&user)).unwrap();
        assert!(json.contains("\"username\":\"roja\""));
        assert!(json.contains("\"fullName\":\"M Roja X\""));
        assert!(!json.contains("passwordHash"));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn test_user_facing_message_hides_internal_detail() {
        let internal = PlatformError::internal("pool exhausted at 10.0.0.1");
        assert_eq!(user_facing_message(&internal), "request could not be processed");

        let conflict = PlatformError::duplicate("user", "email", "roja@x.com");
        assert!(user_facing_message(&conflict).contains("roja@x.com"));
    }

    #[test]
    fn test_login_failure_message_is_generic() {
        // The same constant serves both unknown-account and bad-password
        // failures; nothing account-specific can leak through it.
        assert_eq!(LOGIN_FAILED, "invalid username or password");
    }

    #[test]
    fn test_user_response_role_wire_format() {
        let user = User::new("roja", "roja@x.com", "$argon2id$stub", "M Roja X")
            .with_role(Role::Admin);
        let json = serde_json::to_string(&UserResponse::from(&user)).unwrap();
        assert!(json.contains("\"role\":\"ADMIN\""));
    }
}
