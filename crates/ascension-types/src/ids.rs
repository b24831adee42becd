//! Type-safe identifier wrappers around `u64`.
//!
//! Every entity in the simulation has a strongly-typed ID to prevent
//! accidental mixing of identifiers at compile time. IDs are plain integers
//! assigned by the persistence collaborator; their numeric ordering is
//! load-bearing: characters are processed in ascending id order, events
//! are consumed in ascending id order, and every "lowest id wins" tie-break
//! in the combat engine relies on it.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around `u64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Wrap a raw integer identifier.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Return the inner integer value.
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a character (player or NPC).
    CharacterId
}

define_id! {
    /// Unique identifier for a simulated world.
    WorldId
}

define_id! {
    /// Monotonically increasing identifier of an appended world event.
    EventId
}

define_id! {
    /// Identifier of a tactical session (one encounter per session).
    SessionId
}

define_id! {
    /// Identifier of a persisted combat encounter.
    CombatId
}

define_id! {
    /// Identifier of an actor inside a tactical encounter.
    ActorId
}

define_id! {
    /// Unique identifier for a settlement.
    SettlementId
}

define_id! {
    /// Team tag used to decide combat sides and friendly fire.
    TeamId
}

impl From<CharacterId> for ActorId {
    fn from(id: CharacterId) -> Self {
        Self(id.0)
    }
}

impl EventId {
    /// Return the id that follows this one.
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_order_numerically() {
        assert!(CharacterId::new(2) < CharacterId::new(10));
        assert!(EventId::new(7) > EventId::new(3));
    }

    #[test]
    fn id_serializes_as_bare_integer() {
        let json = serde_json::to_string(&EventId::new(42)).ok();
        assert_eq!(json.as_deref(), Some("42"));
        let restored: Result<EventId, _> = serde_json::from_str("42");
        assert!(matches!(restored, Ok(id) if id == EventId::new(42)));
    }

    #[test]
    fn actor_id_from_character_keeps_value() {
        assert_eq!(ActorId::from(CharacterId::new(9)), ActorId::new(9));
    }

    #[test]
    fn event_id_next_saturates_to_none() {
        assert_eq!(EventId::new(1).next(), Some(EventId::new(2)));
        assert_eq!(EventId::new(u64::MAX).next(), None);
    }
}
