//! Strongly-typed identifiers for eventease
//!
//! All identifiers are strings on the wire so that persisted snapshots and the
//! demo dataset (which use short numeric ids like `"1"`) stay readable. Newly
//! created events and bookings get UUID v4 ids, which stay unique no matter
//! how quickly they are generated.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Unique identifier for an event in the catalog
    EventId
);

string_id!(
    /// Unique identifier for a booking
    BookingId
);

string_id!(
    /// Identifier of a user in the credential directory
    UserId
);

impl EventId {
    /// Allocate a fresh, collision-free event id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl BookingId {
    /// Allocate a fresh, collision-free booking id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn event_id_equality() {
        let id1 = EventId::new("1");
        let id2 = EventId::from("1");
        let id3 = EventId::new("2");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn generated_ids_are_unique() {
        let ids: HashSet<EventId> = (0..1000).map(|_| EventId::generate()).collect();
        assert_eq!(ids.len(), 1000);

        let b1 = BookingId::generate();
        let b2 = BookingId::generate();
        assert_ne!(b1, b2);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let event_id = EventId::new("42");
        let json = serde_json::to_string(&event_id).unwrap();
        assert_eq!(json, "\"42\"");

        let parsed: UserId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(parsed.as_str(), "7");
    }
}
