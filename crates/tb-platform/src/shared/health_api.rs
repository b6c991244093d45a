//! Health Endpoint
//!
//! Simple liveness check; part of the public path set.

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};

async fn health() -> Json<Value> {
    Json(json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Create the health router.
pub fn health_router() -> Router {
    Router::new().route("/health", get(health))
}
