//! # API Route Modules
//!
//! [`register`] is the route-registration collaborator called during
//! bootstrap. It attaches every endpoint to the router it is given:
//!
//! - `todos` — Todo CRUD backed by PostgreSQL.
//! - health probes, the greeting routes, and `/openapi.json`.
//!
//! Every endpoint carries a `#[utoipa::path]`; the `routes` command lists
//! them from the assembled OpenAPI document.

pub mod todos;

use axum::extract::State;
use axum::routing::get;
use axum::Router;

use crate::error::AppError;
use crate::openapi;
use crate::state::AppState;

/// Attach all endpoints to `router`.
pub fn register(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/", get(root))
        .route("/hello", get(hello))
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .merge(todos::router())
        .merge(openapi::router())
        .fallback(not_found)
}

/// GET / — Greeting.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Greeting", body = String)),
    tag = "meta"
)]
async fn root() -> &'static str {
    "It works!"
}

/// GET /hello — Greeting.
#[utoipa::path(
    get,
    path = "/hello",
    responses((status = 200, description = "Greeting", body = String)),
    tag = "meta"
)]
async fn hello() -> &'static str {
    "Hello, world!"
}

/// Liveness probe — always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/liveness",
    responses((status = 200, description = "Process is up", body = String)),
    tag = "health"
)]
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — 200 once the database answers, 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/readiness",
    responses(
        (status = 200, description = "Ready to serve", body = String),
        (status = 503, description = "Database unreachable", body = crate::error::ErrorBody),
    ),
    tag = "health"
)]
async fn readiness(State(state): State<AppState>) -> Result<&'static str, AppError> {
    if let Err(e) = sqlx::query("SELECT 1").execute(&state.pool).await {
        tracing::warn!(error = %e, "database health check failed");
        return Err(AppError::ServiceUnavailable(format!(
            "database unreachable: {e}"
        )));
    }
    Ok("ready")
}

async fn not_found(uri: axum::http::Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}
