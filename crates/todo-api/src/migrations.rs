//! # Schema Migrations
//!
//! A [`MigrationConfig`] is the ordered list of migrations registered during
//! bootstrap. Each [`Migration`] is derived from a [`Model`] and targets one
//! database by [`DatabaseId`].
//!
//! ## Runner
//!
//! Execution is delegated to sqlx's [`Migrator`]. Every registered migration
//! becomes a reversible sqlx migration whose version is its 1-based position
//! in the set, recorded in `_sqlx_migrations` with a checksum of its SQL.
//!
//! Both [`prepare`] and [`revert`] hold the sqlx advisory lock for the whole
//! run, so concurrent instances serialize instead of racing on the schema.
//! [`prepare`] applies every unrecorded migration in declared order and is a
//! no-op when the schema is current. [`revert`] undoes the most recently
//! applied migration.

use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;

use sqlx::error::BoxDynError;
use sqlx::migrate::{Migrate, MigrateError, MigrationSource, MigrationType, Migrator};
use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use todo_core::{DatabaseId, Model};

/// Errors raised while applying or reverting migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The migrator rejected or failed a migration. Covers SQL failures,
    /// checksum mismatches against already-applied versions, and versions
    /// recorded in the database that are no longer registered.
    #[error("migration failed: {0}")]
    Migrate(#[from] MigrateError),

    /// No connection could be acquired for the run.
    #[error("migration connection failed: {0}")]
    Connection(#[from] sqlx::Error),
}

/// A single schema change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub name: &'static str,
    pub database: DatabaseId,
    pub up: &'static str,
    pub down: &'static str,
}

impl Migration {
    /// Migration that creates the storage for `M`.
    pub fn for_model<M: Model>(database: DatabaseId) -> Self {
        Self {
            name: M::NAME,
            database,
            up: M::CREATE_SQL,
            down: M::DROP_SQL,
        }
    }
}

/// Ordered set of migrations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationConfig {
    migrations: Vec<Migration>,
}

impl MigrationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the migration for model `M` targeting `database`.
    pub fn add_model<M: Model>(&mut self, database: DatabaseId) {
        self.add(Migration::for_model::<M>(database));
    }

    pub fn add(&mut self, migration: Migration) {
        self.migrations.push(migration);
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Migration> {
        self.migrations.iter()
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// The set as sqlx migrations: one up/down pair per entry, versioned by
    /// declared position starting at 1.
    fn sqlx_migrations(&self) -> Vec<sqlx::migrate::Migration> {
        self.iter()
            .zip(1i64..)
            .flat_map(|(m, version)| {
                [
                    (MigrationType::ReversibleUp, m.up),
                    (MigrationType::ReversibleDown, m.down),
                ]
                .into_iter()
                .map(move |(kind, sql)| {
                    sqlx::migrate::Migration::new(
                        version,
                        Cow::Borrowed(m.name),
                        kind,
                        Cow::Borrowed(sql),
                        false,
                    )
                })
            })
            .collect()
    }

    /// Build the sqlx migrator for this set.
    ///
    /// Locking is left to the caller, which holds the advisory lock across
    /// its own bookkeeping reads as well as the migrator run.
    pub async fn migrator(&self) -> Result<Migrator, MigrationError> {
        let mut migrator = Migrator::new(self).await?;
        migrator.set_locking(false);
        Ok(migrator)
    }
}

impl<'s> MigrationSource<'s> for &'s MigrationConfig {
    fn resolve(
        self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<sqlx::migrate::Migration>, BoxDynError>> + Send + 's>>
    {
        let migrations = self.sqlx_migrations();
        Box::pin(async move { Ok(migrations) })
    }
}

/// Apply all pending migrations. Returns how many ran.
pub async fn prepare(pool: &PgPool, config: &MigrationConfig) -> Result<usize, MigrationError> {
    let migrator = config.migrator().await?;

    let mut conn = pool.acquire().await?;
    conn.lock().await?;
    let result = apply_locked(&migrator, &mut conn).await;
    conn.unlock().await?;

    let applied = result?;
    if applied == 0 {
        tracing::info!("database schema is up to date");
    } else {
        tracing::info!(applied, "migrations applied");
    }
    Ok(applied)
}

/// Revert the most recently applied migration. Returns how many were undone.
pub async fn revert(pool: &PgPool, config: &MigrationConfig) -> Result<usize, MigrationError> {
    let migrator = config.migrator().await?;

    let mut conn = pool.acquire().await?;
    conn.lock().await?;
    let result = revert_locked(&migrator, &mut conn).await;
    conn.unlock().await?;

    result
}

async fn apply_locked(migrator: &Migrator, conn: &mut PgConnection) -> Result<usize, MigrationError> {
    conn.ensure_migrations_table().await?;
    let before = conn.list_applied_migrations().await?.len();

    migrator.run(&mut *conn).await?;

    let after = conn.list_applied_migrations().await?.len();
    Ok(after.saturating_sub(before))
}

async fn revert_locked(migrator: &Migrator, conn: &mut PgConnection) -> Result<usize, MigrationError> {
    conn.ensure_migrations_table().await?;
    let latest = conn
        .list_applied_migrations()
        .await?
        .iter()
        .map(|m| m.version)
        .max();

    let Some(version) = latest else {
        tracing::info!("no migrations to revert");
        return Ok(0);
    };

    migrator.undo(&mut *conn, version - 1).await?;
    tracing::info!(version, "migration reverted");
    Ok(1)
}
