//! # Error Middleware
//!
//! Guarantees that every failed request leaves the server as a structured
//! [`ErrorBody`]:
//!
//! - [`AppError`] responses are already structured and pass through.
//! - Error statuses produced elsewhere (extractor rejections, the router's
//!   405, empty fallbacks) are rewritten into an [`ErrorBody`] with the same
//!   status.
//! - Handler panics are caught and turned into a 500.
//!
//! Server-side details never reach the client.

use std::any::Any;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::{code_for_status, AppError, ErrorBody, INTERNAL_MESSAGE};

/// Rejection bodies longer than this are not echoed back.
const MAX_ERROR_BODY: usize = 4 * 1024;

/// Rewrite unstructured error responses into [`ErrorBody`] JSON.
pub async fn error_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let text = match axum::body::to_bytes(body, MAX_ERROR_BODY).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(_) => String::new(),
    };

    if status.is_server_error() {
        tracing::error!(%method, %path, %status, detail = %text, "unstructured server error");
    } else {
        tracing::debug!(%method, %path, %status, "normalizing error response");
    }

    let message = if status.is_server_error() {
        INTERNAL_MESSAGE.to_string()
    } else if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        text
    };

    let mut normalized =
        (status, Json(ErrorBody::new(code_for_status(status), message))).into_response();
    if let Some(allow) = parts.headers.get(header::ALLOW) {
        normalized.headers_mut().insert(header::ALLOW, allow.clone());
    }
    normalized
}

/// Build the response for a handler panic.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v: &HeaderValue| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::middleware::{MiddlewareConfig, MiddlewareStage};

    fn with_error_stage(router: Router) -> Router {
        let mut middleware = MiddlewareConfig::new();
        middleware.use_stage(MiddlewareStage::Error);
        middleware.apply(router)
    }

    async fn call(app: Router, method: &str, uri: &str) -> (StatusCode, Response) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        (response.status(), response)
    }

    async fn error_body(response: Response) -> ErrorBody {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn boom() -> &'static str {
        panic!("kaboom")
    }

    async fn plain_500() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "connection reset by peer")
    }

    async fn app_error() -> Result<&'static str, AppError> {
        Err(AppError::NotFound("todo 3 not found".into()))
    }

    async fn plain_400() -> (StatusCode, &'static str) {
        (StatusCode::BAD_REQUEST, "missing field `title`")
    }

    #[tokio::test]
    async fn panic_becomes_structured_500() {
        let app = with_error_stage(Router::new().route("/boom", get(boom)));
        let (status, response) = call(app, "GET", "/boom").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = error_body(response).await;
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert!(!body.error.message.contains("kaboom"));
    }

    #[tokio::test]
    async fn plain_server_error_is_rewritten_without_detail() {
        let app = with_error_stage(Router::new().route("/fail", get(plain_500)));
        let (status, response) = call(app, "GET", "/fail").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = error_body(response).await;
        assert_eq!(body.error.message, INTERNAL_MESSAGE);
    }

    #[tokio::test]
    async fn plain_client_error_keeps_message() {
        let app = with_error_stage(Router::new().route("/bad", get(plain_400)));
        let (status, response) = call(app, "GET", "/bad").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body = error_body(response).await;
        assert_eq!(body.error.code, "BAD_REQUEST");
        assert_eq!(body.error.message, "missing field `title`");
    }

    #[tokio::test]
    async fn structured_errors_pass_through() {
        let app = with_error_stage(Router::new().route("/missing", get(app_error)));
        let (status, response) = call(app, "GET", "/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body = error_body(response).await;
        assert_eq!(body.error.code, "NOT_FOUND");
        assert!(body.error.message.contains("todo 3"));
    }

    #[tokio::test]
    async fn bare_fallback_becomes_structured_404() {
        let app = with_error_stage(
            Router::new()
                .route("/", get(|| async { "ok" }))
                .fallback(|| async { StatusCode::NOT_FOUND }),
        );
        let (status, response) = call(app, "GET", "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body = error_body(response).await;
        assert_eq!(body.error.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn method_not_allowed_keeps_allow_header() {
        let app = with_error_stage(Router::new().route("/", get(|| async { "ok" })));
        let (status, response) = call(app, "DELETE", "/").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().contains_key(header::ALLOW));
        let body = error_body(response).await;
        assert_eq!(body.error.code, "METHOD_NOT_ALLOWED");
    }

    #[tokio::test]
    async fn success_is_untouched() {
        let app = with_error_stage(Router::new().route("/", get(|| async { "ok" })));
        let (status, response) = call(app, "GET", "/").await;
        assert_eq!(status, StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"ok");
    }
}
