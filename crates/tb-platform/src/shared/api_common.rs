//! Common API types
//!
//! The `/users` and `/tasks` surfaces answer with a uniform response
//! envelope carrying a human-readable message, a boolean status flag, and
//! an optional payload. Authentication rejections issued by the access
//! filter use the leaner [`ApiErrorBody`] instead.

use serde::Serialize;
use utoipa::ToSchema;

/// Response envelope used by every user/task endpoint.
///
/// `status` distinguishes success from failure at the application level;
/// the login endpoint in particular always answers HTTP 200 and signals
/// authentication failure only through this flag.
#[derive(Debug, Serialize, ToSchema)]
pub struct GenericResponse<T> {
    /// Human-readable outcome description
    pub message: String,

    /// True on success, false on failure
    pub status: bool,

    /// Payload, if the operation produced one
    pub payload: Option<T>,
}

impl<T> GenericResponse<T> {
    /// Successful response with a payload.
    pub fn ok(message: impl Into<String>, payload: T) -> Self {
        Self {
            message: message.into(),
            status: true,
            payload: Some(payload),
        }
    }

    /// Successful response without a payload.
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: true,
            payload: None,
        }
    }

    /// Failed response; the payload is always absent.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: false,
            payload: None,
        }
    }
}

/// Error body for filter-level rejections (401/403 responses).
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorBody {
    pub error: String,
    pub message: String,
}
