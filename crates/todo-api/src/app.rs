//! # Application Assembly
//!
//! Turns a populated [`Services`] registry into a servable application:
//!
//! ```text
//! TraceLayer → body limit → registered middleware → routes
//! ```
//!
//! Building performs no I/O. The pool connects on first use, which is
//! normally [`Application::migrate`] at startup.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use sqlx::PgPool;
use todo_core::DatabaseId;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::bootstrap::BootstrapError;
use crate::config::AppConfig;
use crate::migrations::{self, MigrationConfig};
use crate::services::Services;
use crate::state::AppState;

/// Request bodies larger than this are rejected with 413.
const BODY_LIMIT: usize = 64 * 1024;

/// A fully wired application, ready to migrate and serve.
pub struct Application {
    router: Router,
    pool: PgPool,
    database: DatabaseId,
    migrations: MigrationConfig,
}

impl Application {
    /// Consume the registry and wire the application.
    ///
    /// Fails if any capability was never registered. Must be called from
    /// within a Tokio runtime.
    pub fn build(services: Services, config: &AppConfig) -> Result<Self, BootstrapError> {
        let registered = services.into_registered()?;

        let pool = registered
            .database_config
            .lazy_pool(config.database_acquire_timeout);
        let state = AppState::new(pool.clone());

        let router = registered
            .middleware
            .apply(registered.router)
            .layer(DefaultBodyLimit::max(BODY_LIMIT))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        tracing::debug!(
            database = %registered.database,
            middleware = registered.middleware.len(),
            migrations = registered.migrations.len(),
            "application built"
        );

        Ok(Self {
            router,
            pool,
            database: registered.database,
            migrations: registered.migrations,
        })
    }

    /// The request dispatcher, with all middleware applied.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn migrations(&self) -> &MigrationConfig {
        &self.migrations
    }

    /// Apply pending migrations. Returns how many ran.
    pub async fn migrate(&self) -> Result<usize, BootstrapError> {
        tracing::info!(database = %self.database, "running migrations");
        Ok(migrations::prepare(&self.pool, &self.migrations).await?)
    }

    /// Revert the most recently applied migration. Returns how many were undone.
    pub async fn revert(&self) -> Result<usize, BootstrapError> {
        tracing::info!(database = %self.database, "reverting last migration");
        Ok(migrations::revert(&self.pool, &self.migrations).await?)
    }

    /// Serve requests on `listener` until Ctrl-C or SIGTERM.
    pub async fn serve(self, listener: TcpListener) -> Result<(), BootstrapError> {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(%addr, "Todo API listening");
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        self.pool.close().await;
        tracing::info!("server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::configure;
    use todo_core::Environment;

    #[tokio::test]
    async fn build_from_configured_services() {
        let mut config = AppConfig::default();
        let mut services = Services::new();
        configure(&mut config, &mut Environment::Testing, &mut services).unwrap();

        let app = Application::build(services, &config).unwrap();
        assert_eq!(app.migrations().len(), 1);
        assert_eq!(app.pool().size(), 0);
    }

    #[tokio::test]
    async fn build_fails_on_incomplete_registry() {
        let err = Application::build(Services::new(), &AppConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, BootstrapError::Missing(_)));
    }
}
