//! Simulation clock, world state and daily orchestration for Ascension.
//!
//! This crate owns the day loop that drives the simulation: aging,
//! travel and training growth, the settlement economy, the goal pass,
//! request application and tournament settlement.
//!
//! # Modules
//!
//! - [`arena`] -- One-on-one fights between characters.
//! - [`clock`] -- [`SimulationClock`]: the six-phase daily loop.
//! - [`config`] -- Run configuration and catalogs loaded from YAML.
//! - [`economy`] -- Building catalog, production, construction and wages.
//! - [`error`] -- [`ClockError`].
//! - [`event_log`] -- Append-only numbered world events.
//! - [`growth`] -- Training points and their spread over attributes.
//! - [`requests`] -- Applies fee, dojo and construction requests.
//! - [`state`] -- [`SimulationState`] with dojos and settlements.
//! - [`tournament`] -- Brackets and prizes for announced tournaments.
//! - [`travel`] -- One tile per day toward a travel target.
//!
//! [`SimulationClock`]: clock::SimulationClock
//! [`ClockError`]: error::ClockError
//! [`SimulationState`]: state::SimulationState

pub mod arena;
pub mod clock;
pub mod config;
pub mod economy;
pub mod error;
pub mod event_log;
pub mod growth;
pub mod requests;
pub mod state;
pub mod tournament;
pub mod travel;

pub use arena::Arena;
pub use clock::SimulationClock;
pub use config::{Catalogs, ConfigError, SimulationConfig};
pub use economy::{BuildingDef, EconomyCatalog, ProjectRefusal, run_economy, start_project};
pub use error::ClockError;
pub use event_log::EventLog;
pub use state::{Dojo, Project, Settlement, SimulationState};
