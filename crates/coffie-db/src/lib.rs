//! Data layer for Coffie (`SQLite`).
//!
//! Two tables back the whole system: `actors` (the roster and each
//! person's presence flag) and `events` (one row per selection). This
//! crate owns the connection pool, the schema lifecycle, and the typed
//! store operations over both tables.
//!
//! # Architecture
//!
//! ```text
//! SqliteDb (pool, migrations)
//!     |
//!     +-- RosterStore  (actors: list, add, presence)
//!     +-- EventStore   (events: append-only record, listing)
//! ```
//!
//! Every mutating store operation runs in its own transaction, committed
//! on success and rolled back on any failure.
//!
//! # Modules
//!
//! - [`sqlite`] -- Connection pool, configuration, schema init/drop/reset
//! - [`roster_store`] -- Roster queries and presence updates
//! - [`event_store`] -- Selection event recording and querying
//! - [`error`] -- Shared error types

pub mod error;
pub mod event_store;
pub mod roster_store;
pub mod sqlite;

// Re-export primary types for convenience.
pub use error::DbError;
pub use event_store::{EventQuery, EventRow, EventStore};
pub use roster_store::{ActorRow, RosterStore};
pub use sqlite::{SqliteConfig, SqliteDb};
