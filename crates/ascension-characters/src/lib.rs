//! Character model logic for the Ascension simulation.
//!
//! This crate holds the pure functions that operate on character data
//! defined in `ascension-types`: derived combat numbers and the
//! transformation lifecycle.
//!
//! # Modules
//!
//! - [`error`] -- Error types ([`CharacterError`])
//! - [`power`] -- Max HP/Ki, initiative, power score
//! - [`transformation`] -- Activation, drain, exhaustion, effective attributes

pub mod error;
pub mod power;
pub mod transformation;

pub use error::CharacterError;
pub use power::{initiative_speed, ki_regen_per_turn, max_hp, max_ki, power_level};
pub use transformation::{
    EXHAUSTION_PENALTY, TransformationCatalog, TransformationDef, TransformationTick, activate,
    deactivate, effective_attributes, recover_day,
};
