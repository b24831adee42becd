//! Tournament goals.
//!
//! A tournament is identified by the id of its `tournament_announced`
//! event. Attendees carry that id (as `event_id`, merged from the
//! announcement by the transition rule) into their registration.

use ascension_types::{Activity, Character, Coord, DailyPlan, EventDraft, World, coord_from_value, event_types};
use serde_json::{Value, json};

use super::{GoalHandler, StepOutcome, data_u64, travel_until};
use crate::context::GoalContext;
use crate::error::GoalError;
use crate::state::GoalData;

/// Days between an announcement and the fight when the data is silent.
pub const DEFAULT_DAYS_UNTIL: u64 = 7;

/// Prize when the data is silent.
pub const DEFAULT_PRIZE: u64 = 100;

/// Announce a tournament, instantaneously.
///
/// Reads `x`/`y` (default: the organizer's tile), `days_until` and
/// `prize`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnounceTournamentHandler;

impl GoalHandler for AnnounceTournamentHandler {
    fn id(&self) -> &'static str {
        "announce_tournament"
    }

    fn step(
        &self,
        character: &Character,
        world: &World,
        data: &GoalData,
        _context: &GoalContext,
    ) -> Result<StepOutcome, GoalError> {
        let location = coord_from_value(&Value::Object(data.clone()))
            .filter(|tile| world.contains(*tile))
            .unwrap_or(character.position);
        let days_until = data_u64(data, "days_until").unwrap_or(DEFAULT_DAYS_UNTIL).max(1);
        let held_on = world.day.saturating_add(days_until);
        let prize = data_u64(data, "prize").unwrap_or(DEFAULT_PRIZE);

        Ok(
            StepOutcome::finished(DailyPlan::doing(Activity::Work), data.clone()).with_event(
                EventDraft::about(
                    character.id,
                    event_types::TOURNAMENT_ANNOUNCED,
                    json!({
                        "x": location.x,
                        "y": location.y,
                        "held_on": held_on,
                        "prize": prize,
                        "organizer": character.id,
                    }),
                ),
            ),
        )
    }
}

/// Travel to an announced tournament and register on arrival.
///
/// Gives up once `held_on` has passed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttendTournamentHandler;

impl AttendTournamentHandler {
    fn target(data: &GoalData) -> Option<(Coord, u64, u64)> {
        let location = coord_from_value(&Value::Object(data.clone()))?;
        let tournament = data_u64(data, "event_id")?;
        let held_on = data_u64(data, "held_on")?;
        Some((location, tournament, held_on))
    }
}

impl GoalHandler for AttendTournamentHandler {
    fn id(&self) -> &'static str {
        "attend_tournament"
    }

    fn step(
        &self,
        character: &Character,
        world: &World,
        data: &GoalData,
        _context: &GoalContext,
    ) -> Result<StepOutcome, GoalError> {
        let Some((location, tournament, held_on)) = Self::target(data) else {
            return Ok(StepOutcome::no_target(data.clone()));
        };
        if world.day > held_on {
            return Ok(StepOutcome::no_target(data.clone()));
        }
        if let Some(plan) = travel_until(character, location) {
            return Ok(StepOutcome::continuing(plan, data.clone()));
        }
        Ok(
            StepOutcome::finished(DailyPlan::doing(Activity::Compete), data.clone()).with_event(
                EventDraft::about(
                    character.id,
                    event_types::TOURNAMENT_REGISTERED,
                    json!({"tournament_event_id": tournament}),
                ),
            ),
        )
    }
}
