//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`]. Constraint violations that
//! callers are expected to react to (duplicate names, unknown ids) get
//! their own variants instead of surfacing as raw [`sqlx`] errors.

use coffie_types::ActorId;

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `SQLite` operation failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    /// A schema migration failed.
    #[error("SQLite migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// An actor with this name is already on the roster.
    #[error("an actor named {0:?} already exists")]
    DuplicateName(String),

    /// No actor has this id.
    #[error("actor {0} not found")]
    ActorNotFound(ActorId),

    /// The proposed actor name is empty or too long.
    #[error("invalid actor name: {0}")]
    InvalidName(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Whether the underlying database error is a unique-constraint hit.
    pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
        err.as_database_error()
            .is_some_and(|db| db.is_unique_violation())
    }

    /// Whether the underlying database error is a foreign-key hit.
    pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
        err.as_database_error()
            .is_some_and(|db| db.is_foreign_key_violation())
    }
}
