//! Event log operations on the `events` table.
//!
//! Every successful selection appends one immutable row naming the
//! winner. Rows are never updated or deleted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use coffie_types::{ActorId, Event, EventId};
use sqlx::SqlitePool;

use crate::error::DbError;

/// Default number of events returned by [`EventStore::list`].
pub const DEFAULT_LIST_LIMIT: u32 = 100;

/// Upper bound on the number of events returned by [`EventStore::list`].
pub const MAX_LIST_LIMIT: u32 = 1000;

/// Filter for [`EventStore::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventQuery {
    /// Only events won by this actor.
    pub actor_id: Option<ActorId>,
    /// Maximum rows to return (default 100, capped at 1000).
    pub limit: Option<u32>,
}

impl EventQuery {
    /// The effective row limit after defaults and capping.
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .min(MAX_LIST_LIMIT)
    }
}

/// Operations on the `events` table.
pub struct EventStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EventStore<'a> {
    /// Create a new event store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a selection event for `actor_id`, stamped with the current
    /// UTC time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ActorNotFound`] if the actor does not exist.
    pub async fn record(&self, actor_id: ActorId) -> Result<Event, DbError> {
        self.record_at(actor_id, Utc::now()).await
    }

    async fn record_at(
        &self,
        actor_id: ActorId,
        time: DateTime<Utc>,
    ) -> Result<Event, DbError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, EventRow>(
            r"INSERT INTO events (time, actor_id)
              VALUES (?1, ?2)
              RETURNING id, time, actor_id",
        )
        .bind(time)
        .bind(actor_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if DbError::is_foreign_key_violation(&e) {
                DbError::ActorNotFound(actor_id)
            } else {
                DbError::Sqlite(e)
            }
        })?;
        tx.commit().await?;

        tracing::debug!(event_id = row.id, actor_id = %actor_id, "Recorded selection event");
        Ok(row.into())
    }

    /// Most recent events first, optionally restricted to one actor.
    pub async fn list(&self, query: &EventQuery) -> Result<Vec<Event>, DbError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r"SELECT id, time, actor_id
              FROM events
              WHERE ?1 IS NULL OR actor_id = ?1
              ORDER BY id DESC
              LIMIT ?2",
        )
        .bind(query.actor_id.map(ActorId::into_inner))
        .bind(i64::from(query.effective_limit()))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    /// How many times each actor has been selected. Actors never picked
    /// are absent from the map.
    pub async fn counts_by_actor(&self) -> Result<BTreeMap<ActorId, i64>, DbError> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r"SELECT actor_id, COUNT(*)
              FROM events
              GROUP BY actor_id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(actor_id, count)| (ActorId(actor_id), count))
            .collect())
    }
}

/// A row from the `events` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    /// Auto-incremented event ID.
    pub id: i64,
    /// When the selection was recorded.
    pub time: DateTime<Utc>,
    /// The winning actor.
    pub actor_id: i64,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: EventId(row.id),
            time: row.time,
            actor_id: ActorId(row.actor_id),
        }
    }
}
