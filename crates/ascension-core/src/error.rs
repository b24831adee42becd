//! Error types for the ascension-core crate.

use ascension_combat::CombatError;
use ascension_goals::GoalError;
use ascension_types::{CharacterId, TypesError};

/// Errors that abort a simulated day.
///
/// Soft outcomes (a goal with no target, an unaffordable fee, a tournament
/// nobody entered) are never errors; they show up as plans and events.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Training intensity must be positive and finite.
    #[error("training intensity must be positive, got {intensity}")]
    InvalidIntensity {
        /// Rejected value.
        intensity: f64,
    },

    /// The day counter would overflow.
    #[error("day counter overflow")]
    DayOverflow,

    /// The event id counter would overflow.
    #[error("event id overflow")]
    EventIdOverflow,

    /// A character, dojo or settlement sits at an invalid position.
    #[error("invalid position: {source}")]
    Position {
        /// The underlying coordinate error.
        #[from]
        source: TypesError,
    },

    /// A character referenced by an event or state is not in the world.
    #[error("unknown character {0}")]
    UnknownCharacter(CharacterId),

    /// An economy catalog entry is malformed.
    #[error("invalid building {building}: {reason}")]
    InvalidBuilding {
        /// Building code.
        building: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Goal resolution failed.
    #[error("goal error: {source}")]
    Goal {
        /// The underlying goal error.
        #[from]
        source: GoalError,
    },

    /// A fight could not be resolved.
    #[error("combat error: {source}")]
    Combat {
        /// The underlying combat error.
        #[from]
        source: CombatError,
    },
}
