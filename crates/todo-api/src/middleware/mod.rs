//! # Middleware Pipeline
//!
//! [`MiddlewareConfig`] is the ordered list of stages registered during
//! bootstrap. [`MiddlewareConfig::apply`] layers them onto a router so the
//! first stage added is the outermost.
//!
//! - [`error`]: converts handler failures and panics into structured JSON
//!   error responses.

pub mod error;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;

/// A unit of request/response processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiddlewareStage {
    /// Error-to-response conversion, see [`error`].
    Error,
}

/// Ordered middleware stages applied to every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MiddlewareConfig {
    stages: Vec<MiddlewareStage>,
}

impl MiddlewareConfig {
    /// An empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage. Stages run in the order they are added.
    pub fn use_stage(&mut self, stage: MiddlewareStage) {
        self.stages.push(stage);
    }

    pub fn stages(&self) -> &[MiddlewareStage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Layer every stage onto `router`.
    pub fn apply<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        // Each `layer` call wraps what is already there, so the last stage
        // added must be layered first.
        self.stages
            .iter()
            .rev()
            .fold(router, |router, stage| match stage {
                MiddlewareStage::Error => router
                    .layer(from_fn(error::error_middleware))
                    .layer(CatchPanicLayer::custom(error::panic_response)),
            })
    }
}
