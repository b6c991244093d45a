//! Taskboard Platform
//!
//! Core platform library for the Taskboard backend:
//! - Account management with an admin-gated approval workflow
//! - Stateless JWT authentication and role-based access control
//! - Task tracking (create, list, update/close)
//! - Development data seeding
//!
//! ## Module Organization (Aggregate-based)
//!
//! Each aggregate directory contains `entity`, `repository`, and `api`.
//! Cross-cutting authentication lives under `auth`, shared infrastructure
//! (errors, response envelope, access filter, index setup) under `shared`.

// Core aggregates
pub mod task;
pub mod user;

// Authentication & authorization
pub mod auth;

// Shared infrastructure
pub mod shared;

// Cross-cutting concerns
pub mod seed;

// Re-export common types from shared
pub use shared::api_common::{ApiErrorBody, GenericResponse};
pub use shared::error::{PlatformError, Result};
pub use shared::middleware::{AccessFilterLayer, AuthState, Authenticated};

// Re-export main entity types for convenience
pub use auth::authenticator::Authenticator;
pub use auth::password_service::{Argon2Config, PasswordService};
pub use auth::token_service::{Principal, TokenClaims, TokenConfig, TokenService};
pub use task::entity::{Task, TaskStatus};
pub use user::entity::{Role, User};

// Re-export repositories
pub use task::repository::TaskRepository;
pub use user::repository::UserRepository;

// Re-export services and routers
pub use seed::dev_seeder::DevDataSeeder;
pub use shared::health_api::health_router;
pub use task::api::{tasks_router, TasksState};
pub use user::api::{users_router, UsersState};
pub use user::service::UserService;
