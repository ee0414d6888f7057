//! # Application State
//!
//! Shared state passed to route handlers via the `State` extractor. Built
//! once by [`crate::app::Application::build`] and read-only afterwards.

use sqlx::PgPool;

/// State shared by every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection pool for the primary database.
    pub pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
