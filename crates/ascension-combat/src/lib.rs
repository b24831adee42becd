//! Combat engine for the Ascension simulation.
//!
//! Two resolvers share one set of building blocks. The live
//! [`CombatResolver`] applies single actions to a persisted per-session
//! [`Combat`] and rolls with hash-based seeds; the headless
//! [`SimulatedCombatResolver`] plays out a whole fight in memory with an
//! injected randomizer.
//!
//! # Modules
//!
//! - [`combatant`] -- Per-encounter HP, ki and charge state
//! - [`curve`] -- Proficiency curves and rounding helpers
//! - [`error`] -- Error types ([`CombatError`])
//! - [`live`] -- Live resolver, [`CombatStore`] trait, in-memory store
//! - [`log`] -- Combat log lines with a visibility radius
//! - [`roll`] -- SHA-256 seeded success rolls
//! - [`scheduler`] -- Integer initiative scheduler
//! - [`simulated`] -- Headless multi-round resolver
//! - [`targeting`] -- Aim modes, delivery shapes, target resolution
//! - [`technique`] -- Technique definitions, cost, success and damage

pub mod combatant;
pub mod curve;
pub mod error;
pub mod live;
pub mod log;
pub mod roll;
pub mod scheduler;
pub mod simulated;
pub mod targeting;
pub mod technique;

pub use combatant::{ChargingTechnique, Combatant};
pub use curve::{CurveSpec, ProficiencyCurve};
pub use error::CombatError;
pub use live::{
    ActionReport, Combat, CombatActor, CombatResolver, CombatRules, CombatStore, Hit,
    InMemoryCombatStore, Session,
};
pub use log::{CombatLogEntry, DEFAULT_LOG_RADIUS};
pub use roll::{RollSeed, SuccessRoll};
pub use scheduler::{DEFAULT_THRESHOLD, TurnActor, TurnScheduler};
pub use simulated::{DEFAULT_MAX_ACTIONS, SimulatedCombatResolver, SimulatedOutcome, SimulationRules};
pub use targeting::{AimMode, DeliveryShape, Piercing, Positioned, ShapeParams, TargetSpec, resolve_targets};
pub use technique::{
    AttemptOutcome, ChargeSpec, DamageFormula, TechniqueCatalog, TechniqueDefinition,
    effective_cost, melee_damage, success_probability, technique_damage,
};
