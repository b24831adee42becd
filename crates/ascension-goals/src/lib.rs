//! Goal-driven behavior for the Ascension simulation.
//!
//! Every character carries a long-horizon life goal and a day-to-day
//! current goal. World events move characters between goals through
//! catalog-defined transition rules; each current goal is carried out one
//! day at a time by a handler that returns a plan and events.
//!
//! # Modules
//!
//! - [`catalog`] -- Life goals, current goals, archetype pools and
//!   transition tables, with up-front validation.
//! - [`context`] -- The read-only daily snapshot handlers see.
//! - [`error`] -- [`GoalError`].
//! - [`handlers`] -- [`GoalHandler`] trait, the built-in handlers and the
//!   [`HandlerRegistry`].
//! - [`pipeline`] -- [`GoalPipeline`]: resolve, then step.
//! - [`resolver`] -- [`GoalResolver`]: the daily transition state machine.
//! - [`state`] -- [`GoalState`] per character.
//!
//! [`GoalHandler`]: handlers::GoalHandler
//! [`HandlerRegistry`]: handlers::HandlerRegistry

pub mod catalog;
pub mod context;
pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod resolver;
pub mod state;

pub use catalog::{
    Audience, CurrentGoalDef, EventTransitions, GoalAssignment, GoalCatalog, LifeGoalDef,
    TransitionRule, WILDCARD, WeightedCode, pick_weighted,
};
pub use context::{DojoInfo, GoalContext};
pub use error::GoalError;
pub use handlers::{GoalHandler, HandlerRegistry, StepOutcome};
pub use pipeline::{GoalDay, GoalPipeline};
pub use resolver::{GoalResolver, TransitionReport, high_water_mark};
pub use state::{GoalData, GoalState};
