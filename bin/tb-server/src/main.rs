//! Taskboard Server
//!
//! Production server for the Taskboard REST APIs:
//! - Account registration, login, and the approval workflow (`/users`)
//! - Task tracking (`/tasks`, behind the access filter)
//! - Health endpoint and Swagger UI
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TB_API_PORT` | `8080` | HTTP API port |
//! | `TB_MONGO_URL` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `TB_MONGO_DB` | `taskboard` | MongoDB database name |
//! | `TB_JWT_SECRET` | insecure dev default | HMAC signing secret |
//! | `TB_JWT_EXPIRY_SECS` | `36000` | Token lifetime in seconds |
//! | `TB_CORS_ORIGIN` | `http://localhost:4200` | Allowed browser origin |
//! | `TB_DEV_MODE` | - | `true`/`1` seeds development data |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use tb_platform::shared::indexes::initialize_indexes;
use tb_platform::{
    health_router, tasks_router, users_router, AccessFilterLayer, Authenticator, AuthState,
    DevDataSeeder, PasswordService, TaskRepository, TasksState, TokenConfig, TokenService,
    UserRepository, UserService, UsersState,
};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<()> {
    tb_common::logging::init_logging("tb-server");

    info!("Starting Taskboard Server");

    // Configuration from environment
    let api_port: u16 = env_or_parse("TB_API_PORT", 8080);
    let mongo_url = env_or("TB_MONGO_URL", "mongodb://localhost:27017");
    let mongo_db = env_or("TB_MONGO_DB", "taskboard");
    let jwt_secret = std::env::var("TB_JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("TB_JWT_SECRET not set; using insecure dev default");
        "taskboard-dev-secret-change-in-production".to_string()
    });
    let jwt_expiry_secs: i64 = env_or_parse("TB_JWT_EXPIRY_SECS", 36_000);
    let cors_origin = env_or("TB_CORS_ORIGIN", "http://localhost:4200");

    // Connect to MongoDB
    info!("Connecting to MongoDB: {}/{}", mongo_url, mongo_db);
    let mongo_client = mongodb::Client::with_uri_str(&mongo_url).await?;
    let db = mongo_client.database(&mongo_db);

    initialize_indexes(&db).await?;

    // Seed development data if in dev mode
    let dev_mode = std::env::var("TB_DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    if dev_mode {
        let seeder = DevDataSeeder::new(&db);
        if let Err(e) = seeder.seed().await {
            tracing::warn!("Dev data seeding skipped: {}", e);
        }
    }

    // Repositories and services
    let user_repo = Arc::new(UserRepository::new(&db));
    let task_repo = Arc::new(TaskRepository::new(&db));

    let password_service = Arc::new(PasswordService::default());
    let token_service = Arc::new(TokenService::new(TokenConfig {
        secret: jwt_secret,
        expiry_secs: jwt_expiry_secs,
    }));
    let authenticator = Arc::new(Authenticator::new(
        user_repo.clone(),
        password_service.clone(),
    ));
    let user_service = Arc::new(UserService::new(user_repo, password_service));
    info!("Services initialized");

    // API states
    let users_state = UsersState {
        user_service,
        authenticator,
        token_service: token_service.clone(),
    };
    let tasks_state = TasksState { task_repo };
    let auth_state = AuthState { token_service };

    // Build the API router with auto-collected OpenAPI paths
    let (router, mut openapi) = OpenApiRouter::new()
        .nest("/users", users_router(users_state))
        .nest("/tasks", tasks_router(tasks_state))
        .split_for_parts();

    openapi.info.title = "Taskboard API".to_string();
    openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
    openapi.info.description =
        Some("REST APIs for accounts, authentication, and task tracking".to_string());

    let app = Router::new()
        .merge(router)
        .merge(health_router())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        // Later layers wrap earlier ones: requests pass CORS, then tracing,
        // then the access filter, before reaching any handler.
        .layer(AccessFilterLayer::new(auth_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&cors_origin)?);

    // Start API server
    let api_addr = format!("0.0.0.0:{}", api_port);
    let listener = TcpListener::bind(&api_addr).await?;
    info!("API server listening on http://{}", api_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Taskboard Server shutdown complete");
    Ok(())
}

/// Fixed browser allow-list: one origin, the exact method and header sets
/// the frontend uses, credentials allowed.
fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin: HeaderValue = origin.parse()?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::HEAD,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("requestor-type"),
        ])
        .expose_headers([HeaderName::from_static("x-get-header")])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received...");
}
