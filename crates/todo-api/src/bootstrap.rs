//! # Application Bootstrap
//!
//! Populates the [`Services`] registry before the application is built.
//!
//! ## Bootstrap Sequence
//!
//! 1. **Provider** — register the PostgreSQL database driver.
//! 2. **Router** — build a router, hand it to [`routes::register`], register
//!    the result as the sole request dispatcher.
//! 3. **Middleware** — an empty pipeline plus the error stage.
//! 4. **Database config** — connection parameters for the provider's
//!    database.
//! 5. **Migrations** — the Todo migration targeting the primary database.
//!
//! Each step assumes the previous one succeeded. The first failure is
//! returned as-is; steps after it never run. No I/O happens here: the pool
//! connects and migrations run later, in [`crate::app::Application`].

use axum::Router;
use todo_core::{DatabaseId, Environment, Todo};

use crate::config::AppConfig;
use crate::db::DatabaseConfig;
use crate::middleware::{MiddlewareConfig, MiddlewareStage};
use crate::migrations::{MigrationConfig, MigrationError};
use crate::provider::{PostgresProvider, Provider};
use crate::routes;
use crate::services::Services;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// A provider could not register its capability.
    #[error("provider {name} failed: {reason}")]
    Provider { name: &'static str, reason: String },

    /// A capability was registered twice.
    #[error("{0} is already registered")]
    AlreadyRegistered(&'static str),

    /// A capability needed by a later step was never registered.
    #[error("{0} is not registered")]
    Missing(&'static str),

    /// A migration targets a database with no registered driver.
    #[error("migration {migration} targets unregistered database {database}")]
    UnknownDatabase {
        migration: &'static str,
        database: DatabaseId,
    },

    /// Applying or reverting migrations failed.
    #[error(transparent)]
    Migration(#[from] MigrationError),

    /// Binding or serving failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Register every service the application needs.
///
/// Called once at process start, before any listener is bound.
pub fn configure(
    config: &mut AppConfig,
    env: &mut Environment,
    services: &mut Services,
) -> Result<(), BootstrapError> {
    configure_with(&PostgresProvider, config, env, services)
}

/// [`configure`] with an explicit database provider.
pub fn configure_with(
    provider: &dyn Provider,
    _config: &mut AppConfig,
    env: &mut Environment,
    services: &mut Services,
) -> Result<(), BootstrapError> {
    tracing::info!(environment = %env, "configuring application");

    register_provider(provider, services)?;

    let router = routes::register(Router::new());
    services.register_router(router)?;

    let mut middleware = MiddlewareConfig::new();
    middleware.use_stage(MiddlewareStage::Error);
    services.register_middleware(middleware)?;

    // TODO: read credentials from the environment instead of literals.
    let database_config = DatabaseConfig::new("db", 5432, "postgres", "postgres", "postgres");
    services.register_database_config(database_config)?;

    let mut migrations = MigrationConfig::new();
    migrations.add_model::<Todo>(DatabaseId::Psql);
    services.register_migrations(migrations)?;

    tracing::info!("application configured");
    Ok(())
}

fn register_provider(
    provider: &dyn Provider,
    services: &mut Services,
) -> Result<(), BootstrapError> {
    let name = provider.name();
    provider.register(services).map_err(|err| {
        tracing::error!(provider = name, error = %err, "provider registration failed");
        match err {
            BootstrapError::Provider { .. } => err,
            other => BootstrapError::Provider {
                name,
                reason: other.to_string(),
            },
        }
    })?;
    tracing::debug!(provider = name, "provider registered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FaultyProvider;

    impl Provider for FaultyProvider {
        fn name(&self) -> &'static str {
            "faulty"
        }

        fn register(&self, _services: &mut Services) -> Result<(), BootstrapError> {
            Err(BootstrapError::Provider {
                name: "faulty",
                reason: "driver unavailable".to_string(),
            })
        }
    }

    /// Fails without using the `Provider` variant.
    struct ConflictingProvider;

    impl Provider for ConflictingProvider {
        fn name(&self) -> &'static str {
            "conflicting"
        }

        fn register(&self, services: &mut Services) -> Result<(), BootstrapError> {
            services.register_database(DatabaseId::Psql)?;
            services.register_database(DatabaseId::Psql)
        }
    }

    fn run(provider: &dyn Provider) -> (Result<(), BootstrapError>, Services) {
        let mut services = Services::new();
        let result = configure_with(
            provider,
            &mut AppConfig::default(),
            &mut Environment::Testing,
            &mut services,
        );
        (result, services)
    }

    #[test]
    fn configure_registers_every_service() {
        let mut services = Services::new();
        configure(
            &mut AppConfig::default(),
            &mut Environment::default(),
            &mut services,
        )
        .unwrap();

        assert_eq!(services.database(), Some(DatabaseId::Psql));
        assert!(services.router().is_some());
        assert_eq!(services.middleware().map(|m| m.len()), Some(1));
        assert!(services.database_config().is_some());
        assert_eq!(services.migrations().map(|m| m.len()), Some(1));
    }

    #[test]
    fn middleware_is_the_error_stage() {
        let (result, services) = run(&PostgresProvider);
        result.unwrap();
        assert_eq!(
            services.middleware().unwrap().stages(),
            &[MiddlewareStage::Error]
        );
    }

    #[test]
    fn database_config_literals() {
        let (result, services) = run(&PostgresProvider);
        result.unwrap();
        let config = services.database_config().unwrap();
        assert_eq!(config.hostname(), "db");
        assert_eq!(config.port(), 5432);
        assert_eq!(config.username(), "postgres");
        assert_eq!(config.database(), "postgres");
        assert_eq!(config.password(), "postgres");
    }

    #[test]
    fn todo_migration_targets_configured_database() {
        let (result, services) = run(&PostgresProvider);
        result.unwrap();
        let migrations: Vec<_> = services.migrations().unwrap().iter().collect();
        assert_eq!(migrations.len(), 1);
        assert_eq!(migrations[0].name, "Todo");
        assert_eq!(
            Some(migrations[0].database),
            services.database_config_target()
        );
    }

    #[test]
    fn faulty_provider_aborts_before_any_registration() {
        let (result, services) = run(&FaultyProvider);
        match result {
            Err(BootstrapError::Provider { name, reason }) => {
                assert_eq!(name, "faulty");
                assert!(reason.contains("driver unavailable"));
            }
            other => panic!("expected provider failure, got: {other:?}"),
        }
        assert!(services.router().is_none());
        assert!(services.middleware().is_none());
        assert!(services.database_config().is_none());
        assert!(services.migrations().is_none());
    }

    #[test]
    fn provider_errors_are_attributed_to_the_provider() {
        let (result, services) = run(&ConflictingProvider);
        match result {
            Err(BootstrapError::Provider { name, .. }) => assert_eq!(name, "conflicting"),
            other => panic!("expected provider failure, got: {other:?}"),
        }
        assert!(services.router().is_none());
    }

    #[test]
    fn configuring_twice_fails() {
        let mut services = Services::new();
        let mut config = AppConfig::default();
        let mut env = Environment::default();
        configure(&mut config, &mut env, &mut services).unwrap();
        let err = configure(&mut config, &mut env, &mut services).unwrap_err();
        assert!(matches!(err, BootstrapError::Provider { .. }));
    }
}
