//! Access Filter
//!
//! Request-interception layer enforcing authentication before any handler
//! runs. Public paths pass through untouched; every other request must carry
//! a valid bearer token, which is turned into a [`Principal`] attached to
//! the request extensions. The filter is a pure function of the request path
//! and the Authorization header plus the shared signing secret; no session
//! state exists anywhere.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use tower::{Layer, Service};

use crate::auth::token_service::{Principal, TokenService};
use crate::shared::api_common::ApiErrorBody;

/// Path prefixes forwarded without authentication.
///
/// TODO: narrow the `/users` entry to `/users/register` and `/users/login`.
/// The blanket prefix was carried over from the original filter
/// configuration and leaves the listing/approval/update endpoints outside
/// the filter; they currently rely on the `Authenticated` extractor alone.
const PUBLIC_PATH_PREFIXES: &[&str] = &[
    "/users",
    "/health",
    "/resources",
    "/static",
    "/css",
    "/js",
    "/images",
    // API docs are served as static assets
    "/swagger-ui",
    "/api-docs",
];

/// Whether a request path bypasses the access filter.
pub fn is_public_path(path: &str) -> bool {
    if path == "/" {
        return true;
    }

    if PUBLIC_PATH_PREFIXES
        .iter()
        .any(|prefix| matches_prefix(path, prefix))
    {
        return true;
    }

    // Top-level static assets: /*.js, /*.css, /*.ico
    if let Some(name) = path.strip_prefix('/') {
        if !name.contains('/')
            && (name.ends_with(".js") || name.ends_with(".css") || name.ends_with(".ico"))
        {
            return true;
        }
    }

    false
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Shared authentication state, injected into request extensions by the
/// filter so extractors can validate tokens without global lookups.
#[derive(Clone)]
pub struct AuthState {
    pub token_service: Arc<TokenService>,
}

/// Error response for authentication failures.
#[derive(Debug)]
pub struct AuthError {
    pub status: StatusCode,
    pub message: String,
}

impl AuthError {
    fn unauthenticated(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: "UNAUTHORIZED".to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Extract the token from a `Bearer` Authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Validate the bearer token in the given headers and produce a Principal.
fn bearer_principal(state: &AuthState, headers: &HeaderMap) -> Result<Principal, AuthError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or_else(|| AuthError::unauthenticated("missing authentication token"))?;

    let claims = state
        .token_service
        .parse(token)
        .map_err(|e| AuthError::unauthenticated(e.to_string()))?;

    Ok(claims.user)
}

/// Authenticated principal extractor.
///
/// Handlers on protected paths receive the Principal the filter attached.
/// Handlers that need identity but sit under a public prefix (the `/users`
/// listing and approval endpoints) get a direct bearer validation instead,
/// so a valid token works there and a missing one is a uniform 401.
pub struct Authenticated(pub Principal);

impl std::ops::Deref for Authenticated {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(Authenticated(principal.clone()));
        }

        let auth_state = parts.extensions.get::<AuthState>().ok_or_else(|| AuthError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "authentication state not configured".to_string(),
        })?;

        let principal = bearer_principal(auth_state, &parts.headers)?;
        Ok(Authenticated(principal))
    }
}

/// Layer installing the access filter on a router.
#[derive(Clone)]
pub struct AccessFilterLayer {
    state: AuthState,
}

impl AccessFilterLayer {
    pub fn new(state: AuthState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for AccessFilterLayer {
    type Service = AccessFilter<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AccessFilter {
            inner,
            state: self.state.clone(),
        }
    }
}

/// The filter itself. Runs once per request, before any handler:
/// public path -> pass through with no principal; otherwise validate the
/// bearer token and either attach the Principal or reject with the uniform
/// 401 body.
#[derive(Clone)]
pub struct AccessFilter<S> {
    inner: S,
    state: AuthState,
}

impl<S, B> Service<axum::http::Request<B>> for AccessFilter<S>
where
    S: Service<axum::http::Request<B>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        // Extractors downstream reach the token service through this.
        req.extensions_mut().insert(self.state.clone());

        if !is_public_path(req.uri().path()) {
            match bearer_principal(&self.state, req.headers()) {
                Ok(principal) => {
                    req.extensions_mut().insert(principal);
                }
                Err(rejection) => {
                    let response = rejection.into_response();
                    return Box::pin(async move { Ok(response) });
                }
            }
        }

        let future = self.inner.call(req);
        Box::pin(async move { future.await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token_service::{TokenConfig, TokenService};
    use crate::user::entity::User;
    use axum::http::Request;

    #[test]
    fn test_public_paths() {
        assert!(is_public_path("/"));
        assert!(is_public_path("/users"));
        assert!(is_public_path("/users/register"));
        assert!(is_public_path("/users/login"));
        assert!(is_public_path("/users/all"));
        assert!(is_public_path("/health"));
        assert!(is_public_path("/static/app/main.js"));
        assert!(is_public_path("/css/site.css"));
        assert!(is_public_path("/favicon.ico"));
        assert!(is_public_path("/main.js"));
    }

    #[test]
    fn test_protected_paths() {
        assert!(!is_public_path("/tasks"));
        assert!(!is_public_path("/tasks/export"));
        assert!(!is_public_path("/usersdata"));
        assert!(!is_public_path("/deep/main.js"));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), None);
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }

    #[test]
    fn test_auth_error_response_status() {
        let response = AuthError::unauthenticated("missing authentication token").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    fn auth_state(secret: &str) -> AuthState {
        AuthState {
            token_service: Arc::new(TokenService::new(TokenConfig {
                secret: secret.to_string(),
                ..TokenConfig::default()
            })),
        }
    }

    #[tokio::test]
    async fn test_authenticated_extractor_with_valid_token() {
        let state = auth_state("extractor-test-secret-with-32-characters!");
        let user = User::new("ramesh", "ramesh@x.com", "$argon2id$stub", "M Ramesh K");
        let token = state.token_service.issue(&Principal::from(&user)).unwrap();

        let request = Request::builder()
            .uri("/users")
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        parts.extensions.insert(state);

        let authenticated = Authenticated::from_request_parts(&mut parts, &())
            .await
            .expect("valid token should authenticate");
        assert_eq!(authenticated.username, "ramesh");
    }

    #[tokio::test]
    async fn test_authenticated_extractor_rejects_missing_token() {
        let state = auth_state("extractor-test-secret-with-32-characters!");

        let request = Request::builder().uri("/users").body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        parts.extensions.insert(state);

        let rejection = Authenticated::from_request_parts(&mut parts, &())
            .await
            .err()
            .expect("missing token must be rejected");
        assert_eq!(rejection.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_authenticated_extractor_rejects_tampered_token() {
        let state = auth_state("extractor-test-secret-with-32-characters!");
        let user = User::new("ramesh", "ramesh@x.com", "$argon2id$stub", "M Ramesh K");
        let token = state.token_service.issue(&Principal::from(&user)).unwrap();
        let tampered = format!("{}x", token);

        let request = Request::builder()
            .uri("/users")
            .header(AUTHORIZATION, format!("Bearer {}", tampered))
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        parts.extensions.insert(state);

        let rejection = Authenticated::from_request_parts(&mut parts, &())
            .await
            .err()
            .expect("tampered token must be rejected");
        assert_eq!(rejection.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_authenticated_extractor_prefers_attached_principal() {
        let user = User::new("roja", "roja@x.com", "$argon2id$stub", "M Roja X");

        let request = Request::builder().uri("/tasks").body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        parts.extensions.insert(Principal::from(&user));

        let authenticated = Authenticated::from_request_parts(&mut parts, &())
            .await
            .expect("attached principal should be used");
        assert_eq!(authenticated.username, "roja");
    }
}
