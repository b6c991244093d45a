//! Platform Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::shared::api_common::ApiErrorBody;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("duplicate {entity_type}: {field} '{value}' is already taken")]
    Duplicate {
        entity_type: String,
        field: String,
        value: String,
    },

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("authentication required: {message}")]
    Unauthenticated { message: String },

    #[error("forbidden: {message}")]
    Unauthorized { message: String },

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token: {message}")]
    InvalidToken { message: String },

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl PlatformError {
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(
        entity_type: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Duplicate {
            entity_type: entity_type.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// True when a MongoDB write failed because a unique index rejected it.
/// Concurrent registrations with colliding keys funnel through here: the
/// losing writer observes error code 11000 and surfaces it as `Duplicate`.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match err.kind.as_ref() {
        ErrorKind::Write(failure) => {
            matches!(failure, WriteFailure::WriteError(we) if we.code == 11000)
        }
        ErrorKind::Command(ce) => ce.code == 11000,
        _ => false,
    }
}

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            PlatformError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            PlatformError::Duplicate { .. } => (StatusCode::CONFLICT, "DUPLICATE"),
            PlatformError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            PlatformError::Unauthenticated { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            PlatformError::Unauthorized { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            PlatformError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            PlatformError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            PlatformError::InvalidToken { .. } => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        // Storage and serialization failures stay out of response bodies.
        let message = match &self {
            PlatformError::Database(_)
            | PlatformError::Serialization(_)
            | PlatformError::Internal { .. } => "internal error".to_string(),
            other => other.to_string(),
        };

        let body = ApiErrorBody {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        let cases = vec![
            (
                PlatformError::not_found("user", "ghost"),
                StatusCode::NOT_FOUND,
            ),
            (
                PlatformError::duplicate("user", "email", "a@b.com"),
                StatusCode::CONFLICT,
            ),
            (
                PlatformError::validation("username must not be empty"),
                StatusCode::BAD_REQUEST,
            ),
            (
                PlatformError::unauthenticated("missing token"),
                StatusCode::UNAUTHORIZED,
            ),
            (
                PlatformError::unauthorized("admin only"),
                StatusCode::FORBIDDEN,
            ),
            (PlatformError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (PlatformError::TokenExpired, StatusCode::UNAUTHORIZED),
            (
                PlatformError::internal("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let err = PlatformError::internal("connection pool exhausted at 10.0.0.1");
        let response = err.into_response();
        // Body building is type-level; the display string is what would leak.
        // Internal errors render as a fixed message instead.
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_duplicate_message_names_field() {
        let err = PlatformError::duplicate("user", "fullName", "M Roja X");
        assert!(err.to_string().contains("fullName"));
        assert!(err.to_string().contains("M Roja X"));
    }
}
