//! Goal step handlers and the registry that dispatches to them.
//!
//! Each current goal in the catalog names a handler id. Once a day the
//! pipeline looks the handler up and asks it for a [`StepOutcome`]: the
//! day's plan, the goal's updated data, whether the goal is done, and any
//! events to append. Handlers are pure; they never touch the world.
//!
//! A handler that finds nothing to do (no dojo, no idle settlement, a
//! tournament already over) completes the goal with a rest day and no
//! events rather than failing.
//!
//! # Handlers
//!
//! - [`routine`] -- `train` and `rest` for a number of days
//! - [`dojo`] -- `train_in_dojo` and `claim_dojo`
//! - [`travel`] -- `travel_to` a tile from the goal data
//! - [`tournament`] -- `announce_tournament` and `attend_tournament`
//! - [`settlement`] -- `start_settlement_project`

pub mod dojo;
pub mod routine;
pub mod settlement;
pub mod tournament;
pub mod travel;

use std::collections::BTreeMap;

use ascension_types::{Character, Coord, DailyPlan, EventDraft, World};
use serde_json::Value;

use crate::catalog::GoalCatalog;
use crate::context::GoalContext;
use crate::error::GoalError;
use crate::state::GoalData;

pub use dojo::{ClaimDojoHandler, TrainInDojoHandler};
pub use routine::{RestHandler, TrainHandler};
pub use settlement::StartSettlementProjectHandler;
pub use tournament::{AnnounceTournamentHandler, AttendTournamentHandler};
pub use travel::TravelToHandler;

/// Everything one handler step produces.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// What the character does today.
    pub plan: DailyPlan,
    /// The goal's data after today.
    pub data: GoalData,
    /// Whether the goal is finished.
    pub completed: bool,
    /// Events to append to the log.
    pub events: Vec<EventDraft>,
}

impl StepOutcome {
    /// The goal continues tomorrow.
    pub const fn continuing(plan: DailyPlan, data: GoalData) -> Self {
        Self {
            plan,
            data,
            completed: false,
            events: Vec::new(),
        }
    }

    /// The goal is finished after today.
    pub const fn finished(plan: DailyPlan, data: GoalData) -> Self {
        Self {
            plan,
            data,
            completed: true,
            events: Vec::new(),
        }
    }

    /// Nothing valid to do: rest, complete, emit nothing.
    pub const fn no_target(data: GoalData) -> Self {
        Self::finished(DailyPlan::rest(), data)
    }

    /// Append an event.
    #[must_use]
    pub fn with_event(mut self, event: EventDraft) -> Self {
        self.events.push(event);
        self
    }
}

/// One kind of current-goal behavior.
pub trait GoalHandler {
    /// Registry key the catalog refers to.
    fn id(&self) -> &'static str;

    /// Plan one day of the goal.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError`] only for data a catalog should never have
    /// produced; missing targets are soft outcomes.
    fn step(
        &self,
        character: &Character,
        world: &World,
        data: &GoalData,
        context: &GoalContext,
    ) -> Result<StepOutcome, GoalError>;
}

/// Handlers keyed by id.
pub struct HandlerRegistry {
    /// Registered handlers.
    handlers: BTreeMap<&'static str, Box<dyn GoalHandler>>,
}

impl core::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl HandlerRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// A registry with every built-in handler.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(TrainHandler));
        registry.register(Box::new(RestHandler));
        registry.register(Box::new(TrainInDojoHandler));
        registry.register(Box::new(ClaimDojoHandler));
        registry.register(Box::new(TravelToHandler));
        registry.register(Box::new(AnnounceTournamentHandler));
        registry.register(Box::new(AttendTournamentHandler));
        registry.register(Box::new(StartSettlementProjectHandler));
        registry
    }

    /// Add or replace a handler under its own id.
    pub fn register(&mut self, handler: Box<dyn GoalHandler>) {
        self.handlers.insert(handler.id(), handler);
    }

    /// Look a handler up by id.
    pub fn get(&self, id: &str) -> Option<&dyn GoalHandler> {
        self.handlers.get(id).map(AsRef::as_ref)
    }

    /// The handler that runs current goal `code`.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError`] if the goal or its handler is unknown.
    pub fn for_goal(&self, catalog: &GoalCatalog, code: &str) -> Result<&dyn GoalHandler, GoalError> {
        let def = catalog.current_goal(code)?;
        self.get(&def.handler).ok_or_else(|| GoalError::UnknownHandler {
            goal: code.to_owned(),
            handler: def.handler.clone(),
        })
    }

    /// Check that every current goal in `catalog` has a handler.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::UnknownHandler`] for the first one missing.
    pub fn validate_catalog(&self, catalog: &GoalCatalog) -> Result<(), GoalError> {
        for code in catalog.current_goals.keys() {
            self.for_goal(catalog, code)?;
        }
        Ok(())
    }

    /// Registered ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Integer from goal data.
pub(crate) fn data_u64(data: &GoalData, key: &str) -> Option<u64> {
    data.get(key).and_then(Value::as_u64)
}

/// Copy of `data` with `key` set.
pub(crate) fn with_value(data: &GoalData, key: &str, value: impl Into<Value>) -> GoalData {
    let mut next = data.clone();
    next.insert(key.to_owned(), value.into());
    next
}

/// A travel plan while `character` is away from `target`, `None` on arrival.
pub(crate) fn travel_until(character: &Character, target: Coord) -> Option<DailyPlan> {
    (character.position != target).then(|| DailyPlan::travel(target))
}

/// Count one more day against `target_days` (default 1).
pub(crate) fn count_day(data: &GoalData, plan: DailyPlan) -> StepOutcome {
    let target = data_u64(data, "target_days").unwrap_or(1).max(1);
    let done = data_u64(data, "days_trained").unwrap_or(0).saturating_add(1);
    let next = with_value(data, "days_trained", done);
    if done >= target {
        StepOutcome::finished(plan, next)
    } else {
        StepOutcome::continuing(plan, next)
    }
}
