//! # Providers
//!
//! A [`Provider`] contributes a capability to the [`Services`] registry
//! before anything else is configured. [`PostgresProvider`] supplies the
//! primary PostgreSQL database driver.

use todo_core::DatabaseId;

use crate::bootstrap::BootstrapError;
use crate::services::Services;

/// A pluggable module that registers a capability.
pub trait Provider {
    /// Name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Register this provider's capabilities.
    fn register(&self, services: &mut Services) -> Result<(), BootstrapError>;
}

/// PostgreSQL database connectivity.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresProvider;

impl Provider for PostgresProvider {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn register(&self, services: &mut Services) -> Result<(), BootstrapError> {
        services.register_database(DatabaseId::Psql)
    }
}
