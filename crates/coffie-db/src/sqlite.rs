//! `SQLite` connection pool and schema lifecycle.
//!
//! The roster and the event log live in a single local `SQLite` file. The
//! file is created on first connect, and foreign keys are enforced on
//! every connection so an event can never point at a missing actor.
//!
//! Uses [`sqlx`] with runtime query construction (not compile-time
//! checked) to avoid requiring a live database at build time. All queries
//! are parameterized.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::DbError;

/// Default maximum number of connections in the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default connection acquire timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Tables dropped by [`SqliteDb::drop_schema`], children first.
const SCHEMA_TABLES: [&str; 3] = ["events", "actors", "_sqlx_migrations"];

/// Configuration for the `SQLite` connection pool.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path of the database file.
    pub path: PathBuf,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// How long to wait for a free connection.
    pub connect_timeout: Duration,
}

impl SqliteConfig {
    /// Create a new configuration for the database file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Set the maximum number of connections.
    #[must_use]
    pub const fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// Connection pool handle to the `SQLite` database.
///
/// Cheap to clone. Created once at process start and handed to every
/// store and request handler that needs it.
#[derive(Debug, Clone)]
pub struct SqliteDb {
    pool: SqlitePool,
}

impl SqliteDb {
    /// Open (creating if missing) the database described by `config`.
    pub async fn connect(config: &SqliteConfig) -> Result<Self, DbError> {
        if config.max_connections == 0 {
            return Err(DbError::Config(
                "max_connections must be at least 1".to_owned(),
            ));
        }

        let connect_options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(connect_options)
            .await?;

        tracing::info!(
            path = %config.path.display(),
            max_connections = config.max_connections,
            "Connected to SQLite"
        );

        Ok(Self { pool })
    }

    /// Open the database file at `path` with default pool settings.
    pub async fn connect_path(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let config = SqliteConfig::new(path);
        Self::connect(&config).await
    }

    /// Create the `actors` and `events` tables by running all pending
    /// migrations. Safe to call on an initialized database.
    pub async fn init_schema(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database schema initialized");
        Ok(())
    }

    /// Drop both tables and the migration bookkeeping, in one transaction.
    pub async fn drop_schema(&self) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;
        for table in SCHEMA_TABLES {
            sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        tracing::info!("Database schema dropped");
        Ok(())
    }

    /// Drop and recreate the schema, discarding all data.
    pub async fn reset_schema(&self) -> Result<(), DbError> {
        self.drop_schema().await?;
        self.init_schema().await
    }

    /// Return a reference to the underlying [`SqlitePool`].
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all connections in the pool gracefully.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("SQLite pool closed");
    }
}
