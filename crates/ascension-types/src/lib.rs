//! Shared type definitions for the Ascension simulation.
//!
//! This crate is the single source of truth for the value types that flow
//! between the character model, the combat engine, the goal system and the
//! daily orchestrator.
//!
//! # Modules
//!
//! - [`attributes`] -- The ten core attributes and signed deltas
//! - [`character`] -- Worlds, characters, transformation state
//! - [`error`] -- Construction errors ([`TypesError`])
//! - [`events`] -- World events and event drafts
//! - [`geometry`] -- Grid coordinates, directions, cell walks
//! - [`ids`] -- Type-safe integer identifiers
//! - [`plan`] -- The daily activity plan
//! - [`random`] -- The [`Randomizer`] trait and its implementations

pub mod attributes;
pub mod character;
pub mod error;
pub mod events;
pub mod geometry;
pub mod ids;
pub mod plan;
pub mod random;

// Re-export all public types at crate root for convenience.
pub use attributes::{ATTRIBUTE_COUNT, AttributeDelta, AttributeKind, CoreAttributes, Rounding};
pub use character::{Character, TransformationState, World};
pub use error::TypesError;
pub use events::{EventDraft, WorldEvent, coord_from_value, event_types};
pub use geometry::{Coord, Direction};
pub use ids::{
    ActorId, CharacterId, CombatId, EventId, SessionId, SettlementId, TeamId, WorldId,
};
pub use plan::{Activity, DailyPlan};
pub use random::{CHANCE_SCALE, Randomizer, ScriptedRandomizer, SeededRandomizer};
