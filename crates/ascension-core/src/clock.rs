//! Simulation clock: the daily loop that drives the Ascension simulation.
//!
//! Each simulated day runs through these phases:
//!
//! 1. **Dawn** -- advance the world day.
//! 2. **Aging** -- every character ages a day and recovers one day of
//!    transformation exhaustion.
//! 3. **Movement and training** -- per character in ascending id, a
//!    traveller takes one step toward its target (emitting
//!    `character.arrived` on arrival); anyone who planned to train
//!    yesterday gains attribute points, scaled by the dojo on their tile.
//! 4. **Economy** -- settlement production, construction and wages, when a
//!    building catalog is loaded and the economy is enabled.
//! 5. **Goals** -- per character in ascending id, resolve goal transitions
//!    and step the current goal's handler. Travel plans take effect for
//!    tomorrow. Requests the handlers emitted (fees, dojo claims and
//!    challenges, construction) are then applied.
//! 6. **Tournaments** -- bracket fights for tournaments held today.
//!
//! Every event appended during the day is returned. Given the same state,
//! catalogs and randomizer sequence a day is fully deterministic.

use ascension_characters::recover_day;
use ascension_combat::SimulationRules;
use ascension_goals::{GoalPipeline, GoalState, HandlerRegistry};
use ascension_types::{
    Activity, CharacterId, Coord, DailyPlan, EventDraft, Randomizer, WorldEvent, event_types,
};
use serde_json::json;
use tracing::{debug, info};

use crate::arena::Arena;
use crate::config::{Catalogs, SimulationConfig};
use crate::economy::run_economy;
use crate::error::ClockError;
use crate::growth::{dojo_multiplier, train, training_points, validate_intensity};
use crate::requests::apply_requests;
use crate::state::SimulationState;
use crate::tournament::settle_tournaments;
use crate::travel::{self, TravelStep};

/// Drives a [`SimulationState`] forward one day at a time.
#[derive(Debug)]
pub struct SimulationClock<'a> {
    /// Immutable catalogs for the run.
    catalogs: &'a Catalogs,
    /// Goal handler dispatch.
    registry: &'a HandlerRegistry,
    /// Attribute points per training day.
    points_per_day: u32,
    /// Global training intensity (validated positive).
    intensity: f64,
    /// Headless fight rules for tournaments and challenges.
    rules: SimulationRules,
    /// Whether the economy pass runs.
    economy_enabled: bool,
}

impl<'a> SimulationClock<'a> {
    /// Build a clock from catalogs and configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidIntensity`] for a non-positive or
    /// non-finite training intensity.
    pub fn new(
        catalogs: &'a Catalogs,
        registry: &'a HandlerRegistry,
        config: &SimulationConfig,
    ) -> Result<Self, ClockError> {
        Ok(Self {
            catalogs,
            registry,
            points_per_day: config.training.points_per_day,
            intensity: validate_intensity(config.training.intensity)?,
            rules: config.combat.simulation_rules(),
            economy_enabled: config.economy.enabled,
        })
    }

    /// Run `days` days and return every event they produced.
    ///
    /// # Errors
    ///
    /// Stops at the first failing day; days already run stay applied.
    pub fn advance_days(
        &self,
        state: &mut SimulationState,
        days: u64,
        rng: &mut dyn Randomizer,
    ) -> Result<Vec<WorldEvent>, ClockError> {
        let mut events = Vec::new();
        for _ in 0..days {
            events.extend(self.advance_day(state, rng)?);
        }
        Ok(events)
    }

    /// Run one day and return the events it produced.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Position`] when a character, dojo or settlement
    /// has a negative coordinate, and [`ClockError`] for counter overflow,
    /// malformed goal data, or a fight that cannot be resolved.
    pub fn advance_day(
        &self,
        state: &mut SimulationState,
        rng: &mut dyn Randomizer,
    ) -> Result<Vec<WorldEvent>, ClockError> {
        check_positions(state)?;
        let before = state.events.last_id();

        // --- Phase 1: Dawn ---
        state.world.day = state.world.day.checked_add(1).ok_or(ClockError::DayOverflow)?;
        let day = state.world.day;
        info!(day, world = %state.world.id, characters = state.characters.len(), "Day started");

        // --- Phase 2: Aging ---
        for character in state.characters.values_mut() {
            character.age_days = character.age_days.saturating_add(1);
            character.transformation = recover_day(&character.transformation);
        }

        // --- Phase 3: Movement and training ---
        let movement = self.phase_movement(state);
        state.events.append_all(day, movement)?;

        // --- Phase 4: Economy ---
        let economy = self.catalogs.economy.as_ref().filter(|_| self.economy_enabled);
        if let Some(catalog) = economy {
            let produced = run_economy(state, catalog);
            state.events.append_all(day, produced)?;
        }

        // --- Phase 5: Goals ---
        let arena = Arena {
            techniques: &self.catalogs.techniques,
            transformations: &self.catalogs.transformations,
            rules: self.rules,
        };
        let goals_start = state.events.last_id();
        self.phase_goals(state, rng)?;
        let requests = state.events.since(goals_start).to_vec();
        let caused = apply_requests(state, &requests, &arena, economy, rng)?;
        state.events.append_all(day, caused)?;

        // --- Phase 6: Tournaments ---
        let concluded = settle_tournaments(state, &arena, rng)?;
        state.events.append_all(day, concluded)?;

        let emitted = state.events.since(before).to_vec();
        info!(day, events = emitted.len(), "Day finished");
        Ok(emitted)
    }

    /// Travel one step or train, per character in ascending id.
    fn phase_movement(&self, state: &mut SimulationState) -> Vec<EventDraft> {
        let day = state.world.day;
        let mut drafts = Vec::new();
        for character in state.characters.values_mut() {
            match travel::advance(character) {
                TravelStep::Arrived(tile) => {
                    debug!(character = %character.id, %tile, "arrived");
                    drafts.push(EventDraft::about(
                        character.id,
                        event_types::CHARACTER_ARRIVED,
                        json!({"x": tile.x, "y": tile.y}),
                    ));
                    continue;
                }
                TravelStep::Moved(_) => continue,
                TravelStep::Idle => {}
            }

            let trained = state
                .plans
                .get(&character.id)
                .is_some_and(|plan| plan.activity == Activity::Train);
            if !trained {
                continue;
            }
            let multiplier = state
                .dojos
                .get(&character.position)
                .map_or(1.0, |dojo| dojo_multiplier(dojo.multiplier, dojo.level));
            let points = training_points(
                self.points_per_day,
                self.intensity,
                multiplier,
                character.transformation.is_exhausted(),
            );
            character.attributes = train(&character.attributes, points, day, character.id);
            debug!(character = %character.id, points, multiplier, "trained");
        }
        drafts
    }

    /// Resolve and step every character's goals.
    fn phase_goals(&self, state: &mut SimulationState, rng: &mut dyn Randomizer) -> Result<(), ClockError> {
        let day = state.world.day;
        let context = state.goal_context();
        let pipeline = GoalPipeline::new(&self.catalogs.goals, self.registry);
        let ids: Vec<CharacterId> = state.characters.keys().copied().collect();

        for id in ids {
            if !state.goals.contains_key(&id) {
                let Some(life_goal) = self.initial_life_goal(state, id, rng)? else {
                    state.plans.insert(id, DailyPlan::rest());
                    continue;
                };
                state.goals.insert(id, GoalState::new(id, life_goal));
            }
            let (Some(character), Some(goal_state)) = (state.characters.get(&id), state.goals.get_mut(&id))
            else {
                continue;
            };
            let unseen = state.events.since(goal_state.last_processed_event_id);
            let outcome = pipeline.run_day(character, &state.world, goal_state, unseen, &context, rng)?;
            if let Some(change) = &outcome.report.life_goal_change {
                info!(character = %id, from = %change.0, to = %change.1, day, "life goal changed");
            }

            let plan = outcome.plan;
            // Only today's plan keeps a trip going; anything else stops it.
            if let Some(traveller) = state.characters.get_mut(&id) {
                traveller.travel_target = plan.travel_target.filter(|tile| state.world.contains(*tile));
            }
            state.plans.insert(id, plan);
            state.events.append_all(day, outcome.events)?;
        }
        Ok(())
    }

    /// Draw a life goal for a character with no goal state yet.
    fn initial_life_goal(
        &self,
        state: &SimulationState,
        id: CharacterId,
        rng: &mut dyn Randomizer,
    ) -> Result<Option<String>, ClockError> {
        let archetype = state
            .characters
            .get(&id)
            .and_then(|character| character.archetype.as_deref());
        let Some(archetype) = archetype else {
            debug!(character = %id, "no archetype, no goals");
            return Ok(None);
        };
        Ok(self.catalogs.goals.initial_life_goal(archetype, rng)?)
    }
}

/// Reject negative world positions before anything moves.
fn check_positions(state: &SimulationState) -> Result<(), ClockError> {
    let characters = state.characters.values().map(|character| character.position);
    let dojos = state.dojos.values().map(|dojo| dojo.position);
    let settlements = state.settlements.values().map(|settlement| settlement.position);
    for position in characters.chain(dojos).chain(settlements) {
        Coord::try_new(position.x, position.y)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use ascension_types::{Character, CoreAttributes, ScriptedRandomizer, TypesError, World, WorldId};

    use super::*;
    use crate::state::Dojo;

    const CATALOGS: &str = r"
goals:
  archetypes:
    fighter:
      - { code: fighter.become_strongest, weight: 1 }
  life_goals:
    fighter.become_strongest:
      current_goals:
        - { code: goal.train_in_dojo, weight: 1 }
  current_goals:
    goal.train_in_dojo:
      handler: train_in_dojo
      defaults: { target_days: 2 }
";

    fn world() -> SimulationState {
        let mut state = SimulationState::new(World {
            id: WorldId::new(1),
            name: String::from("Earth"),
            day: 0,
            width: 10,
            height: 10,
        });
        let mut goku = Character::new(
            CharacterId::new(1),
            WorldId::new(1),
            "Goku",
            Coord::new(0, 0),
            CoreAttributes::uniform(5),
        );
        goku.archetype = Some(String::from("fighter"));
        state.add_character(goku);
        state.add_character(Character::new(
            CharacterId::new(2),
            WorldId::new(1),
            "Bulma",
            Coord::new(9, 9),
            CoreAttributes::uniform(1),
        ));
        state.add_dojo(Dojo {
            position: Coord::new(2, 0),
            multiplier: 2.0,
            fee: 0,
            level: 0,
            master: None,
        });
        state
    }

    #[test]
    fn travels_then_trains_at_the_dojo() {
        let catalogs = Catalogs::parse(CATALOGS).unwrap();
        let registry = HandlerRegistry::with_defaults();
        catalogs.validate(&registry).unwrap();
        let clock = SimulationClock::new(&catalogs, &registry, &SimulationConfig::default()).unwrap();
        let mut state = world();
        let mut rng = ScriptedRandomizer::new(vec![1]);
        let id = CharacterId::new(1);

        // Day 1 plans the trip, day 2 walks, day 3 arrives and plans training.
        let events = clock.advance_days(&mut state, 3, &mut rng).unwrap();
        assert_eq!(state.world.day, 3);
        assert_eq!(state.characters[&id].position, Coord::new(2, 0));
        assert_eq!(state.characters[&id].attributes.total(), 50);
        let arrived: Vec<_> = events
            .iter()
            .filter(|event| event.event_type == event_types::CHARACTER_ARRIVED)
            .collect();
        assert_eq!(arrived.len(), 1);
        assert_eq!(arrived[0].day, 3);
        assert_eq!(state.plans[&id].activity, Activity::Train);

        // Yesterday's plan pays out today: 3 points at a 2x dojo.
        let events = clock.advance_day(&mut state, &mut rng).unwrap();
        assert_eq!(state.characters[&id].attributes.total(), 56);
        assert!(
            events
                .iter()
                .any(|event| event.event_type == event_types::GOAL_COMPLETED)
        );
        assert_eq!(state.characters[&id].age_days, 4);
    }

    #[test]
    fn new_goal_mid_trip_stops_the_walk() {
        let catalogs = Catalogs::parse(
            r"
goals:
  archetypes:
    wanderer:
      - { code: wanderer.see_the_world, weight: 1 }
  life_goals:
    wanderer.see_the_world:
      current_goals:
        - { code: goal.travel, weight: 1 }
  current_goals:
    goal.travel:
      handler: travel_to
      interruptible: true
      defaults: { x: 9, y: 0 }
    goal.train:
      handler: train
      defaults: { target_days: 30 }
  transitions:
    summoned:
      from:
        '*':
          current_goal: { code: goal.train }
",
        )
        .unwrap();
        let registry = HandlerRegistry::with_defaults();
        catalogs.validate(&registry).unwrap();
        let clock = SimulationClock::new(&catalogs, &registry, &SimulationConfig::default()).unwrap();
        let mut state = world();
        let id = CharacterId::new(1);
        state.characters.get_mut(&id).unwrap().archetype = Some(String::from("wanderer"));
        let mut rng = ScriptedRandomizer::new(vec![1]);

        clock.advance_day(&mut state, &mut rng).unwrap();
        assert_eq!(state.characters[&id].travel_target, Some(Coord::new(9, 0)));
        state
            .events
            .append(1, EventDraft::global("summoned", serde_json::Value::Null))
            .unwrap();

        // Day 2 takes one more step, then the summons switches to training.
        clock.advance_day(&mut state, &mut rng).unwrap();
        assert_eq!(state.goals[&id].current_goal.as_deref(), Some("goal.train"));
        assert_eq!(state.plans[&id].activity, Activity::Train);
        assert_eq!(state.characters[&id].position, Coord::new(1, 0));
        assert_eq!(state.characters[&id].travel_target, None);

        // The character stays put and grows instead of walking on.
        let before = state.characters[&id].attributes.total();
        clock.advance_days(&mut state, 2, &mut rng).unwrap();
        assert_eq!(state.characters[&id].position, Coord::new(1, 0));
        assert_eq!(state.characters[&id].attributes.total(), before + 6);
    }

    #[test]
    fn character_without_archetype_rests() {
        let catalogs = Catalogs::parse(CATALOGS).unwrap();
        let registry = HandlerRegistry::with_defaults();
        let clock = SimulationClock::new(&catalogs, &registry, &SimulationConfig::default()).unwrap();
        let mut state = world();
        clock
            .advance_day(&mut state, &mut ScriptedRandomizer::new(vec![1]))
            .unwrap();
        let bulma = CharacterId::new(2);
        assert!(!state.goals.contains_key(&bulma));
        assert_eq!(state.plans[&bulma], DailyPlan::rest());
    }

    #[test]
    fn negative_positions_abort_the_day() {
        let catalogs = Catalogs::parse(CATALOGS).unwrap();
        let registry = HandlerRegistry::with_defaults();
        let clock = SimulationClock::new(&catalogs, &registry, &SimulationConfig::default()).unwrap();
        let mut state = world();
        state.characters.get_mut(&CharacterId::new(2)).unwrap().position = Coord::new(-3, -3);

        let result = clock.advance_day(&mut state, &mut ScriptedRandomizer::new(vec![1]));
        assert!(matches!(
            result,
            Err(ClockError::Position {
                source: TypesError::NegativeCoordinate { x: -3, y: -3 }
            })
        ));
        assert_eq!(state.world.day, 0);

        let mut state = world();
        state.add_dojo(Dojo {
            position: Coord::new(4, -1),
            multiplier: 1.5,
            fee: 0,
            level: 0,
            master: None,
        });
        let result = clock.advance_day(&mut state, &mut ScriptedRandomizer::new(vec![1]));
        assert!(matches!(result, Err(ClockError::Position { .. })));
    }

    #[test]
    fn rejects_non_positive_intensity() {
        let catalogs = Catalogs::default();
        let registry = HandlerRegistry::with_defaults();
        let mut config = SimulationConfig::default();
        config.training.intensity = 0.0;
        assert!(matches!(
            SimulationClock::new(&catalogs, &registry, &config),
            Err(ClockError::InvalidIntensity { .. })
        ));
    }
}
