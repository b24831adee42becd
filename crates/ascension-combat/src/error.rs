//! Error types for the ascension-combat crate.
//!
//! Only configuration and invalid-input failures are errors. A missed
//! technique, an out-of-range target or a character short on ki are
//! ordinary outcomes recorded in the combat log.

use ascension_characters::CharacterError;
use ascension_types::{ActorId, SessionId};

/// Errors that can occur while scheduling or resolving combat.
#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    /// A technique definition is malformed.
    #[error("invalid technique {technique}: {reason}")]
    Config {
        /// Offending technique code.
        technique: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A technique code is not in the catalog.
    #[error("unknown technique: {0}")]
    UnknownTechnique(String),

    /// The turn scheduler was given no actors.
    #[error("turn scheduler needs at least one actor")]
    EmptyActorList,

    /// An actor's speed is zero.
    #[error("actor {actor} has zero speed")]
    InvalidSpeed {
        /// The stalled actor.
        actor: ActorId,
    },

    /// The initiative threshold is zero.
    #[error("initiative threshold must be positive")]
    InvalidThreshold,

    /// An actor referenced by an action is not in the session.
    #[error("actor {actor} is not part of session {session}")]
    UnknownActor {
        /// Missing actor.
        actor: ActorId,
        /// Session searched.
        session: SessionId,
    },

    /// The persistence collaborator failed.
    #[error("combat store error: {message}")]
    Store {
        /// Description of the failure.
        message: String,
    },

    /// A character-model operation failed.
    #[error("character error: {source}")]
    Character {
        /// The underlying character error.
        #[from]
        source: CharacterError,
    },
}
