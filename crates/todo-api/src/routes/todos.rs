//! # Todos API
//!
//! ## Endpoints
//!
//! - `GET /todos` — list todos
//! - `POST /todos` — create a todo
//! - `GET /todos/{id}` — get a todo
//! - `DELETE /todos/{id}` — delete a todo

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use todo_core::Todo;
use utoipa::ToSchema;

use crate::db;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

// ── Request DTOs ────────────────────────────────────────────────────

/// Request to create a todo.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    /// What needs doing. Trimmed; 1 to 255 characters.
    pub title: String,
}

/// Validates to the trimmed title.
impl Validate for CreateTodoRequest {
    type Valid = String;

    fn validate(self) -> Result<String, String> {
        Todo::validate_title(&self.title).map_err(|e| e.to_string())
    }
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).delete(delete_todo))
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /todos — List all todos.
#[utoipa::path(
    get,
    path = "/todos",
    responses(
        (status = 200, description = "All todos in id order", body = Vec<Todo>),
        (status = 503, description = "Database unavailable", body = crate::error::ErrorBody),
    ),
    tag = "todos"
)]
async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    Ok(Json(db::todos::list(&state.pool).await?))
}

/// POST /todos — Create a todo.
#[utoipa::path(
    post,
    path = "/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = Todo),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "todos"
)]
async fn create_todo(
    State(state): State<AppState>,
    body: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let title = extract_validated_json(body)?;

    let todo = db::todos::insert(&state.pool, &title).await?;
    tracing::info!(todo_id = todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// GET /todos/{id} — Get a single todo.
#[utoipa::path(
    get,
    path = "/todos/{id}",
    params(("id" = i32, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo found", body = Todo),
        (status = 404, description = "Todo not found", body = crate::error::ErrorBody),
    ),
    tag = "todos"
)]
async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Todo>, AppError> {
    db::todos::get_by_id(&state.pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("todo {id} not found")))
}

/// DELETE /todos/{id} — Delete a todo.
#[utoipa::path(
    delete,
    path = "/todos/{id}",
    params(("id" = i32, Path, description = "Todo ID")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 404, description = "Todo not found", body = crate::error::ErrorBody),
    ),
    tag = "todos"
)]
async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !db::todos::delete(&state.pool, id).await? {
        return Err(AppError::NotFound(format!("todo {id} not found")));
    }
    tracing::info!(todo_id = id, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}
