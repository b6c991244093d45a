//! Shared infrastructure: errors, response envelope, access filter,
//! index initialization, and the health endpoint.

pub mod api_common;
pub mod error;
pub mod health_api;
pub mod indexes;
pub mod middleware;
