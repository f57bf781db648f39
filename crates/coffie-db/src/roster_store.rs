//! Roster operations on the `actors` table.
//!
//! Actors are added once and then toggled in and out of the session.
//! Rows are never deleted, and listing order is insertion (id) order,
//! which is also the slot order the lottery sees.

use coffie_types::{Actor, ActorId};
use sqlx::SqlitePool;

use crate::error::DbError;

/// Longest accepted actor name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Operations on the `actors` table.
pub struct RosterStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RosterStore<'a> {
    /// Create a new roster store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Every actor on the roster, present or not, in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Actor>, DbError> {
        let rows = sqlx::query_as::<_, ActorRow>(
            r"SELECT id, name, in_session
              FROM actors
              ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Actor::from).collect())
    }

    /// Actors currently in the session, in insertion order.
    pub async fn list_present(&self) -> Result<Vec<Actor>, DbError> {
        let rows = sqlx::query_as::<_, ActorRow>(
            r"SELECT id, name, in_session
              FROM actors
              WHERE in_session = 1
              ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Actor::from).collect())
    }

    /// Look up one actor.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ActorNotFound`] if no actor has this id.
    pub async fn get(&self, id: ActorId) -> Result<Actor, DbError> {
        let row = sqlx::query_as::<_, ActorRow>(
            r"SELECT id, name, in_session
              FROM actors
              WHERE id = ?1",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool)
        .await?;

        row.map(Actor::from).ok_or(DbError::ActorNotFound(id))
    }

    /// Add a new actor, present by default.
    ///
    /// The name is trimmed before storing.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidName`] for an empty or over-long name and
    /// [`DbError::DuplicateName`] if the name is already taken.
    pub async fn add(&self, name: &str) -> Result<Actor, DbError> {
        let name = validate_name(name)?;

        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, ActorRow>(
            r"INSERT INTO actors (name, in_session)
              VALUES (?1, 1)
              RETURNING id, name, in_session",
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if DbError::is_unique_violation(&e) {
                DbError::DuplicateName(name.to_owned())
            } else {
                DbError::Sqlite(e)
            }
        })?;
        tx.commit().await?;

        tracing::debug!(actor_id = row.id, name, "Added actor");
        Ok(row.into())
    }

    /// Mark an actor as present or absent and return the updated row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ActorNotFound`] if no actor has this id. The
    /// transaction is rolled back in that case.
    pub async fn set_presence(&self, id: ActorId, present: bool) -> Result<Actor, DbError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, ActorRow>(
            r"UPDATE actors
              SET in_session = ?1
              WHERE id = ?2
              RETURNING id, name, in_session",
        )
        .bind(present)
        .bind(id.into_inner())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DbError::ActorNotFound(id))?;
        tx.commit().await?;

        tracing::debug!(actor_id = row.id, present, "Updated presence");
        Ok(row.into())
    }
}

/// Trim `name` and check it fits the `actors.name` column.
pub fn validate_name(name: &str) -> Result<&str, DbError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DbError::InvalidName("name is empty".to_owned()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(DbError::InvalidName(format!(
            "name is longer than {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed)
}

/// A row from the `actors` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActorRow {
    /// Auto-incremented actor ID.
    pub id: i64,
    /// Unique display name.
    pub name: String,
    /// Presence flag.
    pub in_session: bool,
}

impl From<ActorRow> for Actor {
    fn from(row: ActorRow) -> Self {
        Self {
            id: ActorId(row.id),
            name: row.name,
            in_session: row.in_session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed() {
        assert_eq!(validate_name("  Ada \n").ok(), Some("Ada"));
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(matches!(validate_name(""), Err(DbError::InvalidName(_))));
        assert!(matches!(validate_name("   "), Err(DbError::InvalidName(_))));
    }

    #[test]
    fn name_length_is_counted_in_characters() {
        let max = "é".repeat(MAX_NAME_LEN);
        assert!(validate_name(&max).is_ok());
        let over = "a".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(validate_name(&over), Err(DbError::InvalidName(_))));
    }
}
