//! Token Service
//!
//! Stateless JWT issuance and validation (HS256). A token is self-contained:
//! the server keeps no record of issued tokens, so validity is purely a
//! function of the signature and the expiry claim. Any instance holding the
//! shared secret can validate tokens issued by any other instance.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::error::{PlatformError, Result};
use crate::user::entity::{Role, User};

/// Authenticated identity attached to a request.
///
/// A snapshot of the account at token-issuance time; it never carries the
/// password hash, and it is never persisted. Role or enabled changes made
/// after issuance do not retroactively invalidate a token built from an
/// earlier snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Account username
    pub username: String,

    /// Account email
    pub email: String,

    /// Role at issuance time
    pub role: Role,

    /// Approval state at issuance time
    pub enabled: bool,

    /// Display name
    pub full_name: String,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for Principal {
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

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (account username)
    pub sub: String,

    /// Sanitized account snapshot
    pub user: Principal,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Token service configuration.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Shared HMAC signing secret
    pub secret: String,

    /// Token lifetime in seconds
    pub expiry_secs: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expiry_secs: 36_000, // 10 hours
        }
    }
}

/// Issues and validates signed bearer tokens.
pub struct TokenService {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a token for an authenticated principal.
    ///
    /// The embedded snapshot is a [`Principal`], which structurally cannot
    /// carry the password hash.
    pub fn issue(&self, principal: &Principal) -> Result<String> {
        let now = Utc::now();

        let claims = TokenClaims {
            sub: principal.username.clone(),
            user: principal.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.config.expiry_secs)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| PlatformError::internal(format!("failed to encode token: {}", e)))
    }

    /// Validate a token and return its claims.
    ///
    /// Structural corruption, signature mismatch, and elapsed expiry all
    /// collapse into `TokenExpired`/`InvalidToken`; the access filter turns
    /// either into its uniform rejection.
    pub fn parse(&self, token: &str) -> Result<TokenClaims> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => PlatformError::TokenExpired,
                _ => PlatformError::InvalidToken {
                    message: e.to_string(),
                },
            })
    }
}
