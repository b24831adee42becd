//! World events: the append-only log the goal system reacts to.
//!
//! Handlers and the daily orchestrator emit [`EventDraft`] values. The
//! event log in `ascension-core` stamps them with a monotonically
//! increasing [`EventId`], the world, and the simulated day, producing an
//! immutable [`WorldEvent`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geometry::Coord;
use crate::ids::{CharacterId, EventId, WorldId};

/// Well-known event type tags.
pub mod event_types {
    /// A tournament was announced. Payload: `x`, `y`, `held_on`, `prize`,
    /// `organizer`.
    pub const TOURNAMENT_ANNOUNCED: &str = "tournament_announced";
    /// A character registered for a tournament. Payload: `tournament_event_id`.
    pub const TOURNAMENT_REGISTERED: &str = "tournament.registered";
    /// A tournament was fought. Payload: `tournament_event_id`, `winner`, `entrants`.
    pub const TOURNAMENT_CONCLUDED: &str = "tournament.concluded";
    /// A character paid a dojo's training fee. Payload: `x`, `y`, `amount`.
    pub const DOJO_FEE_PAID: &str = "dojo.fee_paid";
    /// A character asks to become master of an unowned dojo.
    pub const DOJO_CLAIM_REQUESTED: &str = "dojo.claim_requested";
    /// A character challenges a dojo's current master.
    pub const DOJO_CHALLENGE_REQUESTED: &str = "dojo.challenge_requested";
    /// A dojo changed hands. Payload: `x`, `y`, `master`, `previous`.
    pub const DOJO_MASTER_CHANGED: &str = "dojo.master_changed";
    /// A leader asks to start a construction project.
    pub const SETTLEMENT_PROJECT_START_REQUESTED: &str = "settlement.project_start_requested";
    /// A construction project finished.
    pub const SETTLEMENT_PROJECT_COMPLETED: &str = "settlement.project_completed";
    /// A travelling character reached its target.
    pub const CHARACTER_ARRIVED: &str = "character.arrived";
    /// A current goal was completed.
    pub const GOAL_COMPLETED: &str = "goal.completed";
}

/// An immutable, numbered record of something that happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEvent {
    /// Monotonic id; the goal resolver's high-water mark compares against it.
    pub id: EventId,
    /// World the event belongs to.
    pub world_id: WorldId,
    /// Character the event is about, if any.
    pub subject: Option<CharacterId>,
    /// Namespaced type tag, e.g. `tournament_announced`.
    pub event_type: String,
    /// Simulated day the event happened on.
    pub day: u64,
    /// Arbitrary structured payload.
    pub payload: Value,
}

impl WorldEvent {
    /// Read an integer field from the payload.
    pub fn payload_u64(&self, key: &str) -> Option<u64> {
        self.payload.get(key).and_then(Value::as_u64)
    }

    /// Read a `{x, y}` location from the payload.
    pub fn payload_coord(&self) -> Option<Coord> {
        coord_from_value(&self.payload)
    }
}

/// An event emitted by a handler or the orchestrator, not yet numbered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    /// Character the event is about, if any.
    pub subject: Option<CharacterId>,
    /// Namespaced type tag.
    pub event_type: String,
    /// Arbitrary structured payload.
    pub payload: Value,
}

impl EventDraft {
    /// Draft an event about `subject`.
    pub fn about(subject: CharacterId, event_type: &str, payload: Value) -> Self {
        Self {
            subject: Some(subject),
            event_type: event_type.to_owned(),
            payload,
        }
    }

    /// Draft an event with no subject.
    pub fn global(event_type: &str, payload: Value) -> Self {
        Self {
            subject: None,
            event_type: event_type.to_owned(),
            payload,
        }
    }
}

/// Parse `{ "x": .., "y": .. }` out of a JSON object.
pub fn coord_from_value(value: &Value) -> Option<Coord> {
    let x = value.get("x").and_then(Value::as_i64)?;
    let y = value.get("y").and_then(Value::as_i64)?;
    Some(Coord::new(i32::try_from(x).ok()?, i32::try_from(y).ok()?))
}
