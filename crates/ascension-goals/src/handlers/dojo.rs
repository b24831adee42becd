//! Dojo goals: training at the nearest dojo, and claiming or challenging
//! for its mastery.

use ascension_types::{Activity, Character, DailyPlan, EventDraft, World, event_types};
use serde_json::json;
use tracing::debug;

use super::{GoalHandler, StepOutcome, count_day, travel_until, with_value};
use crate::context::GoalContext;
use crate::error::GoalError;
use crate::state::GoalData;

/// Travel to the nearest dojo and train there for `target_days` days.
///
/// The fee is paid once, on the first day at the dojo, and recorded as
/// `fee_paid` in the goal data. A character who cannot afford it gives up.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainInDojoHandler;

impl GoalHandler for TrainInDojoHandler {
    fn id(&self) -> &'static str {
        "train_in_dojo"
    }

    fn step(
        &self,
        character: &Character,
        _world: &World,
        data: &GoalData,
        context: &GoalContext,
    ) -> Result<StepOutcome, GoalError> {
        let Some(tile) = context.nearest_dojo(character.position) else {
            return Ok(StepOutcome::no_target(data.clone()));
        };
        if let Some(plan) = travel_until(character, tile) {
            return Ok(StepOutcome::continuing(plan, data.clone()));
        }

        let already_paid = data.get("fee_paid").and_then(serde_json::Value::as_bool) == Some(true);
        if already_paid {
            return Ok(count_day(data, DailyPlan::train()));
        }

        let fee = context.dojos.get(&tile).map_or(0, |dojo| dojo.fee);
        if character.money < fee {
            debug!(character = %character.id, fee, money = character.money, "cannot afford dojo fee");
            return Ok(StepOutcome::no_target(data.clone()));
        }
        let outcome = count_day(&with_value(data, "fee_paid", true), DailyPlan::train());
        if fee == 0 {
            return Ok(outcome);
        }
        Ok(outcome.with_event(EventDraft::about(
            character.id,
            event_types::DOJO_FEE_PAID,
            json!({"x": tile.x, "y": tile.y, "amount": fee}),
        )))
    }
}

/// Travel to the nearest dojo and ask to become its master.
///
/// An unowned dojo gets a claim request; one held by someone else gets a
/// challenge. A character who already holds it has nothing to do.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimDojoHandler;

impl GoalHandler for ClaimDojoHandler {
    fn id(&self) -> &'static str {
        "claim_dojo"
    }

    fn step(
        &self,
        character: &Character,
        _world: &World,
        data: &GoalData,
        context: &GoalContext,
    ) -> Result<StepOutcome, GoalError> {
        let Some(tile) = context.nearest_dojo(character.position) else {
            return Ok(StepOutcome::no_target(data.clone()));
        };
        if let Some(plan) = travel_until(character, tile) {
            return Ok(StepOutcome::continuing(plan, data.clone()));
        }

        let master = context.dojos.get(&tile).and_then(|dojo| dojo.master);
        let outcome = match master {
            None => StepOutcome::finished(DailyPlan::doing(Activity::Work), data.clone())
                .with_event(EventDraft::about(
                    character.id,
                    event_types::DOJO_CLAIM_REQUESTED,
                    json!({"x": tile.x, "y": tile.y}),
                )),
            Some(holder) if holder == character.id => StepOutcome::no_target(data.clone()),
            Some(holder) => StepOutcome::finished(DailyPlan::doing(Activity::Compete), data.clone())
                .with_event(EventDraft::about(
                    character.id,
                    event_types::DOJO_CHALLENGE_REQUESTED,
                    json!({"x": tile.x, "y": tile.y, "master": holder}),
                )),
        };
        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use ascension_types::{CharacterId, Coord};

    use super::*;
    use crate::context::DojoInfo;
    use crate::handlers::fixtures::{character_at, world};

    fn context(master: Option<CharacterId>) -> GoalContext {
        let mut context = GoalContext::default();
        context.dojos.insert(
            Coord::new(4, 0),
            DojoInfo {
                multiplier: 2.0,
                fee: 10,
                master,
            },
        );
        context.dojos.insert(
            Coord::new(0, 9),
            DojoInfo {
                multiplier: 1.5,
                fee: 0,
                master: None,
            },
        );
        context
    }

    #[test]
    fn travels_to_nearest_dojo_first() {
        let hero = character_at(Coord::new(1, 0));
        let outcome = TrainInDojoHandler
            .step(&hero, &world(1), &GoalData::new(), &context(None))
            .unwrap();
        assert_eq!(outcome.plan, DailyPlan::travel(Coord::new(4, 0)));
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn pays_fee_once_on_arrival() {
        let mut hero = character_at(Coord::new(4, 0));
        hero.money = 25;
        let context = context(None);
        let mut data = GoalData::new();
        data.insert(String::from("target_days"), serde_json::json!(2));

        let first = TrainInDojoHandler.step(&hero, &world(1), &data, &context).unwrap();
        assert_eq!(first.plan, DailyPlan::train());
        assert_eq!(first.events.len(), 1);
        assert_eq!(first.events[0].event_type, event_types::DOJO_FEE_PAID);
        assert_eq!(first.events[0].payload["amount"], 10);
        assert!(!first.completed);

        let second = TrainInDojoHandler
            .step(&hero, &world(2), &first.data, &context)
            .unwrap();
        assert!(second.events.is_empty());
        assert!(second.completed);
    }

    #[test]
    fn broke_student_gives_up() {
        let hero = character_at(Coord::new(4, 0));
        let outcome = TrainInDojoHandler
            .step(&hero, &world(1), &GoalData::new(), &context(None))
            .unwrap();
        assert_eq!(outcome.plan, DailyPlan::rest());
        assert!(outcome.completed);
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn no_dojo_is_a_soft_outcome() {
        let hero = character_at(Coord::new(4, 0));
        let outcome = TrainInDojoHandler
            .step(&hero, &world(1), &GoalData::new(), &GoalContext::default())
            .unwrap();
        assert_eq!(outcome, StepOutcome::no_target(GoalData::new()));
    }

    #[test]
    fn claim_or_challenge_depends_on_master() {
        let hero = character_at(Coord::new(4, 0));
        let claim = ClaimDojoHandler
            .step(&hero, &world(1), &GoalData::new(), &context(None))
            .unwrap();
        assert_eq!(claim.events[0].event_type, event_types::DOJO_CLAIM_REQUESTED);

        let challenge = ClaimDojoHandler
            .step(&hero, &world(1), &GoalData::new(), &context(Some(CharacterId::new(9))))
            .unwrap();
        assert_eq!(challenge.events[0].event_type, event_types::DOJO_CHALLENGE_REQUESTED);
        assert_eq!(challenge.events[0].payload["master"], 9);
        assert_eq!(challenge.plan.activity, Activity::Compete);

        let own = ClaimDojoHandler
            .step(&hero, &world(1), &GoalData::new(), &context(Some(hero.id)))
            .unwrap();
        assert!(own.events.is_empty());
        assert!(own.completed);
    }
}
