//! Error types for the ascension-goals crate.

/// Errors raised by goal catalogs, the resolver and the handlers.
///
/// Every variant indicates broken catalog data or a caller passing state
/// the catalog does not know about. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum GoalError {
    /// A life-goal code is not in the catalog.
    #[error("unknown life goal: {0}")]
    UnknownLifeGoal(String),

    /// A current-goal code is not in the catalog.
    #[error("unknown current goal: {0}")]
    UnknownCurrentGoal(String),

    /// A current goal names a handler nobody registered.
    #[error("current goal {goal} uses unregistered handler {handler}")]
    UnknownHandler {
        /// Current-goal code.
        goal: String,
        /// Handler id it asked for.
        handler: String,
    },

    /// A catalog entry references a code that does not exist.
    #[error("{location} references unknown code {code}")]
    UnknownReference {
        /// Where the reference appears.
        location: String,
        /// The dangling code.
        code: String,
    },

    /// A weighted pool entry has a zero weight.
    #[error("{location}: weight for {code} must be positive")]
    InvalidWeight {
        /// The pool.
        location: String,
        /// The entry.
        code: String,
    },

    /// A chance is outside `[0, 1]`.
    #[error("{location}: chance {chance} must be within [0, 1]")]
    InvalidChance {
        /// Where the chance appears.
        location: String,
        /// The offending value.
        chance: f64,
    },

    /// An archetype key is not in the catalog.
    #[error("unknown archetype: {0}")]
    UnknownArchetype(String),
}
