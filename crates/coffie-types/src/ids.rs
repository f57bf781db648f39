//! Type-safe identifier wrappers around integer surrogate keys.
//!
//! Rows in the roster and event tables are keyed by `INTEGER PRIMARY KEY`
//! values assigned by the database. Wrapping them in distinct newtypes
//! prevents an event id from being used where an actor id is expected.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around an `i64` row id with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Return the inner row id.
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl core::str::FromStr for $name {
            type Err = core::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of an actor on the roster.
    ActorId
}

define_id! {
    /// Identifier of a recorded selection event.
    EventId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_serializes_as_bare_integer() {
        let json = serde_json::to_string(&ActorId(7)).ok();
        assert_eq!(json.as_deref(), Some("7"));

        let restored: Result<EventId, _> = serde_json::from_str("42");
        assert_eq!(restored.ok(), Some(EventId(42)));
    }

    #[test]
    fn id_parses_from_form_text() {
        assert_eq!(" 12 ".parse::<ActorId>().ok(), Some(ActorId(12)));
        assert!("twelve".parse::<ActorId>().is_err());
        assert!("".parse::<ActorId>().is_err());
    }

    #[test]
    fn id_display_matches_integer() {
        let id = ActorId(99);
        assert_eq!(id.to_string(), "99");
        assert_eq!(i64::from(id), 99);
    }
}
