//! # Database Persistence Layer
//!
//! PostgreSQL persistence via SQLx.
//!
//! [`DatabaseConfig`] holds the connection parameters registered during
//! bootstrap. The pool built from it connects lazily: nothing touches the
//! network until the migration runner or the first request acquires a
//! connection.

pub mod todos;

use std::fmt;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

/// Connection parameters for a PostgreSQL database.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    hostname: String,
    port: u16,
    username: String,
    database: String,
    password: String,
}

impl DatabaseConfig {
    pub fn new(
        hostname: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        database: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            username: username.into(),
            database: database.into(),
            password: password.into(),
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// SQLx connection options for these parameters.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.hostname)
            .port(self.port)
            .username(&self.username)
            .database(&self.database)
            .password(&self.password)
    }

    /// Build a lazily connecting pool. Performs no I/O.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn lazy_pool(&self, acquire_timeout: Duration) -> PgPool {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(acquire_timeout)
            .connect_lazy_with(self.connect_options());

        tracing::debug!(
            host = %self.hostname,
            port = self.port,
            database = %self.database,
            "database pool created"
        );

        pool
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("database", &self.database)
            .field("password", &"[redacted]")
            .finish()
    }
}
