//! Core entity structs: roster actors and selection events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ActorId, EventId};

/// A person on the roster who can be entered into the lottery.
///
/// Actors are never deleted. Leaving the session only clears
/// [`Actor::in_session`], so historical events keep resolving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Surrogate row id.
    pub id: ActorId,
    /// Display name, unique across the roster.
    pub name: String,
    /// Whether the actor is currently present in the session.
    pub in_session: bool,
}

impl core::fmt::Display for Actor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

/// An immutable record that an actor won a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Surrogate row id.
    pub id: EventId,
    /// When the selection was recorded (UTC).
    pub time: DateTime<Utc>,
    /// The winning actor.
    pub actor_id: ActorId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_displays_as_name() {
        let actor = Actor {
            id: ActorId(1),
            name: String::from("Ada"),
            in_session: true,
        };
        assert_eq!(actor.to_string(), "Ada");
    }

    #[test]
    fn event_json_shape() {
        let event = Event {
            id: EventId(3),
            time: DateTime::<Utc>::UNIX_EPOCH,
            actor_id: ActorId(1),
        };
        let value = serde_json::to_value(&event).ok();
        assert_eq!(
            value.as_ref().and_then(|v| v.get("actor_id")).cloned(),
            Some(serde_json::json!(1))
        );
        assert_eq!(
            value.as_ref().and_then(|v| v.get("id")).cloned(),
            Some(serde_json::json!(3))
        );
    }
}
