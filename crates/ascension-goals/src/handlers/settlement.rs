//! `start_settlement_project`: a leader walks to the nearest idle
//! settlement and requests construction there.

use ascension_types::{Activity, Character, DailyPlan, EventDraft, World, event_types};
use serde_json::{Value, json};

use super::{GoalHandler, StepOutcome, travel_until};
use crate::context::GoalContext;
use crate::error::GoalError;
use crate::state::GoalData;

/// Request a building upgrade at the nearest settlement with no project.
///
/// Builds `building` from the goal data, or the settlement's lowest-level
/// building.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartSettlementProjectHandler;

impl GoalHandler for StartSettlementProjectHandler {
    fn id(&self) -> &'static str {
        "start_settlement_project"
    }

    fn step(
        &self,
        character: &Character,
        _world: &World,
        data: &GoalData,
        context: &GoalContext,
    ) -> Result<StepOutcome, GoalError> {
        let Some(tile) = context.nearest_idle_settlement(character.position) else {
            return Ok(StepOutcome::no_target(data.clone()));
        };
        if let Some(plan) = travel_until(character, tile) {
            return Ok(StepOutcome::continuing(plan, data.clone()));
        }

        let requested = data.get("building").and_then(Value::as_str);
        let Some(building) = requested.or_else(|| context.lowest_building(tile)) else {
            return Ok(StepOutcome::no_target(data.clone()));
        };
        let settlement = context.settlements.get(&tile).copied();
        Ok(
            StepOutcome::finished(DailyPlan::doing(Activity::Work), data.clone()).with_event(
                EventDraft::about(
                    character.id,
                    event_types::SETTLEMENT_PROJECT_START_REQUESTED,
                    json!({
                        "x": tile.x,
                        "y": tile.y,
                        "settlement_id": settlement,
                        "building": building,
                    }),
                ),
            ),
        )
    }
}
