//! `travel_to`: walk to the `{x, y}` tile in the goal data.

use ascension_types::{Character, DailyPlan, World, coord_from_value};
use serde_json::Value;

use super::{GoalHandler, StepOutcome, travel_until};
use crate::context::GoalContext;
use crate::error::GoalError;
use crate::state::GoalData;

/// Travel to a tile; completes on arrival.
#[derive(Debug, Clone, Copy, Default)]
pub struct TravelToHandler;

impl GoalHandler for TravelToHandler {
    fn id(&self) -> &'static str {
        "travel_to"
    }

    fn step(
        &self,
        character: &Character,
        world: &World,
        data: &GoalData,
        _context: &GoalContext,
    ) -> Result<StepOutcome, GoalError> {
        let target = coord_from_value(&Value::Object(data.clone()))
            .filter(|target| world.contains(*target));
        let Some(target) = target else {
            return Ok(StepOutcome::no_target(data.clone()));
        };
        Ok(match travel_until(character, target) {
            Some(plan) => StepOutcome::continuing(plan, data.clone()),
            None => StepOutcome::finished(DailyPlan::rest(), data.clone()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascension_types::Coord;
    use serde_json::json;

    use super::*;
    use crate::handlers::fixtures::{character_at, world};

    fn data(x: i64, y: i64) -> GoalData {
        let mut map = GoalData::new();
        map.insert(String::from("x"), json!(x));
        map.insert(String::from("y"), json!(y));
        map
    }

    #[test]
    fn travels_then_completes_on_arrival() {
        let context = GoalContext::default();
        let away = TravelToHandler
            .step(&character_at(Coord::new(0, 0)), &world(1), &data(3, 4), &context)
            .unwrap();
        assert_eq!(away.plan, DailyPlan::travel(Coord::new(3, 4)));
        assert!(!away.completed);

        let there = TravelToHandler
            .step(&character_at(Coord::new(3, 4)), &world(2), &data(3, 4), &context)
            .unwrap();
        assert!(there.completed);
        assert_eq!(there.plan, DailyPlan::rest());
    }

    #[test]
    fn missing_or_off_map_target_is_soft() {
        let context = GoalContext::default();
        let hero = character_at(Coord::new(0, 0));
        let missing = TravelToHandler
            .step(&hero, &world(1), &GoalData::new(), &context)
            .unwrap();
        assert!(missing.completed);
        assert!(missing.events.is_empty());
        let off_map = TravelToHandler
            .step(&hero, &world(1), &data(-1, 99), &context)
            .unwrap();
        assert_eq!(off_map.plan, DailyPlan::rest());
        assert!(off_map.completed);
    }
}
