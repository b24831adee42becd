//! Error types for the ascension-characters crate.

/// Errors that can occur in character-model operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CharacterError {
    /// A transformation code is not in the catalog.
    #[error("unknown transformation: {0}")]
    UnknownTransformation(String),

    /// A catalog transformation definition is malformed.
    #[error("invalid transformation {code}: {reason}")]
    InvalidTransformation {
        /// Offending code.
        code: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The character cannot enter the transformation right now.
    #[error("cannot activate {code}: {reason}")]
    TransformationUnavailable {
        /// Requested code.
        code: String,
        /// Why activation was refused.
        reason: String,
    },
}
