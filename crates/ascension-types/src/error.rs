//! Error types for the `ascension-types` crate.

/// Errors raised while constructing shared value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypesError {
    /// World positions must be non-negative.
    #[error("negative coordinate ({x}, {y})")]
    NegativeCoordinate {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },
}
