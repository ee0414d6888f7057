//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document served
//! at `/openapi.json`. The same document backs [`route_table`].

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo API",
        description = "Create, list, fetch and delete todo items.",
        license(name = "MIT")
    ),
    paths(
        crate::routes::root,
        crate::routes::hello,
        crate::routes::liveness,
        crate::routes::readiness,
        crate::routes::todos::list_todos,
        crate::routes::todos::create_todo,
        crate::routes::todos::get_todo,
        crate::routes::todos::delete_todo,
        openapi_json,
    ),
    components(schemas(
        todo_core::Todo,
        crate::routes::todos::CreateTodoRequest,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "todos", description = "Todo items"),
        (name = "health", description = "Liveness and readiness probes"),
        (name = "meta", description = "Greetings and API description"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
#[utoipa::path(
    get,
    path = "/openapi.json",
    responses((status = 200, description = "OpenAPI document")),
    tag = "meta"
)]
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// `(method, path)` of every documented endpoint, ordered by path.
pub fn route_table() -> Vec<(&'static str, String)> {
    let mut table = Vec::new();
    for (path, item) in ApiDoc::openapi().paths.paths {
        let operations = [
            ("GET", item.get.is_some()),
            ("POST", item.post.is_some()),
            ("PUT", item.put.is_some()),
            ("PATCH", item.patch.is_some()),
            ("DELETE", item.delete.is_some()),
        ];
        for (method, present) in operations {
            if present {
                table.push((method, path.clone()));
            }
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_todo_paths() {
        let spec = ApiDoc::openapi();
        assert!(spec.paths.paths.contains_key("/todos"));
        assert!(spec.paths.paths.contains_key("/todos/{id}"));
    }

    #[test]
    fn spec_serializes() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();
        assert!(json.contains("Todo API"));
        assert!(json.contains("CreateTodoRequest"));
    }

    #[test]
    fn route_table_lists_every_operation() {
        let table = route_table();
        let has = |method: &str, path: &str| table.iter().any(|(m, p)| *m == method && p == path);

        assert_eq!(table.len(), 9);
        assert!(has("GET", "/"));
        assert!(has("GET", "/hello"));
        assert!(has("GET", "/health/readiness"));
        assert!(has("GET", "/openapi.json"));
        assert!(has("POST", "/todos"));
        assert!(has("DELETE", "/todos/{id}"));
        assert!(!has("PUT", "/todos"));
    }
}
