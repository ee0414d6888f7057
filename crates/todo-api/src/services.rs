//! # Service Registry
//!
//! [`Services`] collects the capabilities registered during bootstrap: the
//! database driver, the router, the middleware pipeline, the database
//! connection parameters and the migration set. It is an owned value handed
//! from the entry point to [`crate::bootstrap::configure`] and then consumed
//! by [`crate::app::Application::build`]; nothing about it is global.
//!
//! Each capability can be registered once. A second registration, or a
//! registration whose prerequisite is missing, is a [`BootstrapError`].

use axum::Router;
use todo_core::DatabaseId;

use crate::bootstrap::BootstrapError;
use crate::db::DatabaseConfig;
use crate::middleware::MiddlewareConfig;
use crate::migrations::MigrationConfig;
use crate::state::AppState;

/// Capabilities registered during bootstrap.
#[derive(Default)]
pub struct Services {
    database: Option<DatabaseId>,
    router: Option<Router<AppState>>,
    middleware: Option<MiddlewareConfig>,
    database_config: Option<(DatabaseId, DatabaseConfig)>,
    migrations: Option<MigrationConfig>,
}

/// Every capability, taken out of a fully populated [`Services`].
pub(crate) struct Registered {
    pub router: Router<AppState>,
    pub middleware: MiddlewareConfig,
    pub database: DatabaseId,
    pub database_config: DatabaseConfig,
    pub migrations: MigrationConfig,
}

fn put<T>(slot: &mut Option<T>, value: T, name: &'static str) -> Result<(), BootstrapError> {
    if slot.is_some() {
        return Err(BootstrapError::AlreadyRegistered(name));
    }
    *slot = Some(value);
    tracing::debug!(service = name, "service registered");
    Ok(())
}

impl Services {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the database driver supplied by a provider.
    pub fn register_database(&mut self, id: DatabaseId) -> Result<(), BootstrapError> {
        put(&mut self.database, id, "database")
    }

    /// Register the request dispatcher.
    pub fn register_router(&mut self, router: Router<AppState>) -> Result<(), BootstrapError> {
        put(&mut self.router, router, "router")
    }

    /// Register the middleware pipeline.
    pub fn register_middleware(
        &mut self,
        middleware: MiddlewareConfig,
    ) -> Result<(), BootstrapError> {
        put(&mut self.middleware, middleware, "middleware")
    }

    /// Register connection parameters for the provider's database.
    ///
    /// Requires a database provider to have been registered first.
    pub fn register_database_config(
        &mut self,
        config: DatabaseConfig,
    ) -> Result<(), BootstrapError> {
        let id = self.database.ok_or(BootstrapError::Missing("database"))?;
        put(&mut self.database_config, (id, config), "database config")
    }

    /// Register the migration set.
    ///
    /// Every migration must target the registered database.
    pub fn register_migrations(
        &mut self,
        migrations: MigrationConfig,
    ) -> Result<(), BootstrapError> {
        let known = self.database.ok_or(BootstrapError::Missing("database"))?;
        if let Some(m) = migrations.iter().find(|m| m.database != known) {
            return Err(BootstrapError::UnknownDatabase {
                migration: m.name,
                database: m.database,
            });
        }
        put(&mut self.migrations, migrations, "migrations")
    }

    pub fn database(&self) -> Option<DatabaseId> {
        self.database
    }

    pub fn router(&self) -> Option<&Router<AppState>> {
        self.router.as_ref()
    }

    pub fn middleware(&self) -> Option<&MiddlewareConfig> {
        self.middleware.as_ref()
    }

    pub fn database_config(&self) -> Option<&DatabaseConfig> {
        self.database_config.as_ref().map(|(_, config)| config)
    }

    /// Database the registered connection parameters belong to.
    pub fn database_config_target(&self) -> Option<DatabaseId> {
        self.database_config.as_ref().map(|(id, _)| *id)
    }

    pub fn migrations(&self) -> Option<&MigrationConfig> {
        self.migrations.as_ref()
    }

    /// Take every capability out, failing on the first one missing.
    pub(crate) fn into_registered(self) -> Result<Registered, BootstrapError> {
        let database = self.database.ok_or(BootstrapError::Missing("database"))?;
        let router = self.router.ok_or(BootstrapError::Missing("router"))?;
        let middleware = self
            .middleware
            .ok_or(BootstrapError::Missing("middleware"))?;
        let (_, database_config) = self
            .database_config
            .ok_or(BootstrapError::Missing("database config"))?;
        let migrations = self
            .migrations
            .ok_or(BootstrapError::Missing("migrations"))?;

        Ok(Registered {
            router,
            middleware,
            database,
            database_config,
            migrations,
        })
    }
}
