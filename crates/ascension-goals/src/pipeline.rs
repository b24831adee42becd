//! One character's goal day: resolve transitions, then run the handler.

use ascension_types::{Character, DailyPlan, EventDraft, Randomizer, World, WorldEvent, event_types};
use serde_json::json;
use tracing::{debug, info};

use crate::catalog::GoalCatalog;
use crate::context::GoalContext;
use crate::error::GoalError;
use crate::handlers::HandlerRegistry;
use crate::resolver::{GoalResolver, TransitionReport};
use crate::state::GoalState;

/// What a character does today and what it announced.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalDay {
    /// Today's plan.
    pub plan: DailyPlan,
    /// Events the handler emitted, plus `goal.completed` when it finished.
    pub events: Vec<EventDraft>,
    /// What the resolver changed.
    pub report: TransitionReport,
}

/// Resolver plus handler registry.
#[derive(Debug)]
pub struct GoalPipeline<'a> {
    /// Transition state machine.
    resolver: GoalResolver<'a>,
    /// Handler dispatch.
    registry: &'a HandlerRegistry,
}

impl<'a> GoalPipeline<'a> {
    /// A pipeline over `catalog` dispatching to `registry`.
    pub const fn new(catalog: &'a GoalCatalog, registry: &'a HandlerRegistry) -> Self {
        Self {
            resolver: GoalResolver::new(catalog),
            registry,
        }
    }

    /// Run one day for `character`.
    ///
    /// A day that was already resolved yields a rest plan and no events.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError`] for unknown goal codes or handlers.
    pub fn run_day(
        &self,
        character: &Character,
        world: &World,
        state: &mut GoalState,
        events: &[WorldEvent],
        context: &GoalContext,
        rng: &mut dyn Randomizer,
    ) -> Result<GoalDay, GoalError> {
        let report = self
            .resolver
            .resolve_for_day(character, state, world.day, events, rng)?;
        if report.skipped {
            debug!(character = %character.id, day = world.day, "goal day already resolved");
            return Ok(GoalDay {
                plan: DailyPlan::rest(),
                events: Vec::new(),
                report,
            });
        }

        let Some(code) = state.current_goal.clone().filter(|_| !state.completed) else {
            return Ok(GoalDay {
                plan: DailyPlan::rest(),
                events: Vec::new(),
                report,
            });
        };

        let handler = self.registry.for_goal(self.resolver.catalog(), &code)?;
        let outcome = handler.step(character, world, &state.data, context)?;
        let mut emitted = outcome.events;
        if outcome.completed {
            info!(character = %character.id, goal = %code, day = world.day, "current goal completed");
            emitted.push(EventDraft::about(
                character.id,
                event_types::GOAL_COMPLETED,
                json!({"goal": code}),
            ));
        }
        state.record_step(outcome.data, outcome.completed);

        Ok(GoalDay {
            plan: outcome.plan,
            events: emitted,
            report,
        })
    }
}
