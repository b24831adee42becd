//! The daily goal state machine.
//!
//! Once per simulated day each character's [`GoalState`] is advanced
//! against the world events it has not yet seen:
//!
//! 1. Events on or after the current day are ineligible (one-day latency).
//!    Eligible events with an id above the high-water mark are processed in
//!    ascending id order.
//! 2. Each event looks up its transition table and, within it, the row for
//!    the character's current life goal (or the `*` row). A rule may switch
//!    life goal with `life_goal_chance`, and may assign a current goal with
//!    its own `chance` when the existing one is absent, completed or
//!    interruptible.
//! 3. At most one life-goal change and one current-goal reassignment apply
//!    per day; later qualifying events are still consumed.
//! 4. When a rule switches life goal, the current-goal half of the event is
//!    looked up again under the new life goal.
//! 5. With no reassignment today and no active current goal, a new one is
//!    drawn from the leadership pool (leaders, when the catalog has one) or
//!    the life goal's pool.
//!
//! A second call for a day already resolved is a no-op.

use ascension_types::{Character, EventId, Randomizer, WorldEvent};
use serde_json::Value;
use tracing::debug;

use crate::catalog::{GoalAssignment, GoalCatalog, WeightedCode, pick_weighted};
use crate::error::GoalError;
use crate::state::{GoalData, GoalState};

/// What one day of resolution changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransitionReport {
    /// The day was already resolved; nothing happened.
    pub skipped: bool,
    /// `(from, to)` when the life goal changed.
    pub life_goal_change: Option<(String, String)>,
    /// Current goal assigned today, if any.
    pub assigned_goal: Option<String>,
    /// Whether the assignment came from a pool refill rather than an event.
    pub refilled: bool,
    /// Eligible events consumed.
    pub events_consumed: usize,
}

/// Advances goal states against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct GoalResolver<'a> {
    /// Goal configuration.
    catalog: &'a GoalCatalog,
}

impl<'a> GoalResolver<'a> {
    /// A resolver over `catalog`.
    pub const fn new(catalog: &'a GoalCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog this resolver reads.
    pub const fn catalog(&self) -> &'a GoalCatalog {
        self.catalog
    }

    /// Resolve `day` for `character`, returning the next state.
    ///
    /// `events` may contain anything; ordering, latency and the high-water
    /// mark are applied here.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError`] if the state names a life or current goal the
    /// catalog does not know.
    pub fn resolve_day(
        &self,
        character: &Character,
        state: &GoalState,
        day: u64,
        events: &[WorldEvent],
        rng: &mut dyn Randomizer,
    ) -> Result<(GoalState, TransitionReport), GoalError> {
        if state.last_resolved_day == Some(day) {
            return Ok((
                state.clone(),
                TransitionReport {
                    skipped: true,
                    ..TransitionReport::default()
                },
            ));
        }
        self.catalog.life_goal(&state.life_goal)?;

        let mut next = state.clone();
        let mut report = TransitionReport::default();
        let mut eligible: Vec<&WorldEvent> = events
            .iter()
            .filter(|event| event.day < day && event.id > state.last_processed_event_id)
            .collect();
        eligible.sort_by_key(|event| event.id);

        for event in eligible {
            next.last_processed_event_id = next.last_processed_event_id.max(event.id);
            report.events_consumed = report.events_consumed.saturating_add(1);
            self.apply_event(character, &mut next, event, &mut report, rng)?;
        }

        if report.assigned_goal.is_none() && !next.has_active_goal() {
            let pool = self.refill_pool(character, &next)?;
            if let Some(code) = pick_weighted(pool, rng) {
                let data = self.starting_data(code, None, None)?;
                debug!(character = %character.id, goal = code, "current goal drawn from pool");
                next.assign(code, data);
                report.assigned_goal = Some(code.to_owned());
                report.refilled = true;
            }
        }

        next.last_resolved_day = Some(day);
        Ok((next, report))
    }

    /// Resolve `day`, updating `state` in place.
    ///
    /// # Errors
    ///
    /// As for [`resolve_day`](Self::resolve_day); `state` is untouched on
    /// error.
    pub fn resolve_for_day(
        &self,
        character: &Character,
        state: &mut GoalState,
        day: u64,
        events: &[WorldEvent],
        rng: &mut dyn Randomizer,
    ) -> Result<TransitionReport, GoalError> {
        let (next, report) = self.resolve_day(character, state, day, events, rng)?;
        *state = next;
        Ok(report)
    }

    fn apply_event(
        &self,
        character: &Character,
        next: &mut GoalState,
        event: &WorldEvent,
        report: &mut TransitionReport,
        rng: &mut dyn Randomizer,
    ) -> Result<(), GoalError> {
        let Some(table) = self.catalog.transitions.get(&event.event_type) else {
            return Ok(());
        };
        if table.audience == crate::catalog::Audience::Subject && event.subject != Some(character.id) {
            return Ok(());
        }
        let Some(mut rule) = table.rule_for(&next.life_goal) else {
            return Ok(());
        };

        if report.life_goal_change.is_none()
            && !rule.life_goals.is_empty()
            && rng.chance(rule.life_goal_chance)
        {
            if let Some(code) = pick_weighted(&rule.life_goals, rng) {
                if code != next.life_goal {
                    let from = next.life_goal.clone();
                    debug!(
                        character = %character.id,
                        from = %from,
                        to = code,
                        event = %event.id,
                        "life goal changed"
                    );
                    next.change_life_goal(code);
                    report.life_goal_change = Some((from, code.to_owned()));
                    match table.rule_for(&next.life_goal) {
                        Some(follow_up) => rule = follow_up,
                        None => return Ok(()),
                    }
                }
            }
        }

        let Some(assignment) = &rule.current_goal else {
            return Ok(());
        };
        if report.assigned_goal.is_some() || !self.replaceable(next)? {
            return Ok(());
        }
        if !rng.chance(assignment.chance) {
            return Ok(());
        }
        let data = self.starting_data(&assignment.code, Some(assignment), Some(event))?;
        debug!(
            character = %character.id,
            goal = %assignment.code,
            event = %event.id,
            "current goal assigned by event"
        );
        next.assign(assignment.code.clone(), data);
        report.assigned_goal = Some(assignment.code.clone());
        Ok(())
    }

    /// Whether an event rule may replace the current goal.
    fn replaceable(&self, state: &GoalState) -> Result<bool, GoalError> {
        match &state.current_goal {
            None => Ok(true),
            Some(_) if state.completed => Ok(true),
            Some(code) => Ok(self.catalog.current_goal(code)?.interruptible),
        }
    }

    fn refill_pool(&self, character: &Character, state: &GoalState) -> Result<&'a [WeightedCode], GoalError> {
        if character.leader && !self.catalog.leadership_pool.is_empty() {
            return Ok(&self.catalog.leadership_pool);
        }
        Ok(&self.catalog.life_goal(&state.life_goal)?.current_goals)
    }

    /// Defaults, then rule data, then the event payload and id.
    fn starting_data(
        &self,
        code: &str,
        assignment: Option<&GoalAssignment>,
        event: Option<&WorldEvent>,
    ) -> Result<GoalData, GoalError> {
        let mut data = self.catalog.current_goal(code)?.defaults.clone();
        if let Some(assignment) = assignment {
            data.extend(assignment.data.clone());
            if assignment.include_payload {
                if let Some(event) = event {
                    if let Value::Object(payload) = &event.payload {
                        data.extend(payload.clone());
                    }
                    data.insert(String::from("event_id"), Value::from(event.id.into_inner()));
                }
            }
        }
        Ok(data)
    }
}

/// Highest event id in `events`, 0 for an empty slice.
pub fn high_water_mark(events: &[WorldEvent]) -> EventId {
    events.iter().map(|event| event.id).max().unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascension_types::{CharacterId, Coord, CoreAttributes, ScriptedRandomizer, WorldId};
    use serde_json::json;

    use super::*;

    const YAML: &str = r#"
life_goals:
  fighter.become_strongest:
    current_goals:
      - { code: goal.train, weight: 1 }
  merchant.get_rich:
    current_goals:
      - { code: goal.rest, weight: 1 }
current_goals:
  goal.train:
    handler: train
    interruptible: true
    defaults: { target_days: 3 }
  goal.train_in_dojo:
    handler: train_in_dojo
    interruptible: false
  goal.rest:
    handler: rest
    interruptible: true
  goal.attend_tournament:
    handler: attend_tournament
    interruptible: true
  goal.start_settlement_project:
    handler: start_settlement_project
transitions:
  tournament_announced:
    from:
      fighter.become_strongest:
        current_goal: { code: goal.attend_tournament, include_payload: true }
  market_crash:
    from:
      "*":
        life_goal_chance: 1.0
        life_goals:
          - { code: merchant.get_rich, weight: 1 }
      merchant.get_rich:
        current_goal: { code: goal.rest, data: { target_days: 1 } }
  insulted:
    audience: subject
    from:
      "*":
        current_goal: { code: goal.train }
leadership_pool:
  - { code: goal.start_settlement_project, weight: 1 }
"#;

    fn catalog() -> GoalCatalog {
        let catalog: GoalCatalog = serde_yml::from_str(YAML).unwrap();
        catalog.validate().unwrap();
        catalog
    }

    fn character() -> Character {
        Character::new(
            CharacterId::new(7),
            WorldId::new(1),
            "Krillin",
            Coord::new(0, 0),
            CoreAttributes::uniform(5),
        )
    }

    fn event(id: u64, day: u64, event_type: &str) -> WorldEvent {
        WorldEvent {
            id: EventId::new(id),
            world_id: WorldId::new(1),
            subject: None,
            event_type: event_type.to_owned(),
            day,
            payload: json!({"x": 4, "y": 4, "held_on": 12}),
        }
    }

    fn state_with(goal: &str) -> GoalState {
        let mut state = GoalState::new(CharacterId::new(7), "fighter.become_strongest");
        state.assign(goal, GoalData::new());
        state
    }

    #[test]
    fn same_day_events_wait_a_day() {
        let catalog = catalog();
        let resolver = GoalResolver::new(&catalog);
        let mut state = state_with("goal.train");
        let events = [event(1, 5, "tournament_announced")];
        let mut rng = ScriptedRandomizer::new(vec![1]);

        let report = resolver
            .resolve_for_day(&character(), &mut state, 5, &events, &mut rng)
            .unwrap();
        assert_eq!(report.events_consumed, 0);
        assert_eq!(state.current_goal.as_deref(), Some("goal.train"));
        assert_eq!(state.last_processed_event_id, EventId::new(0));

        let report = resolver
            .resolve_for_day(&character(), &mut state, 6, &events, &mut rng)
            .unwrap();
        assert_eq!(report.events_consumed, 1);
        assert_eq!(state.current_goal.as_deref(), Some("goal.attend_tournament"));
        assert_eq!(state.data_u64("held_on"), Some(12));
        assert_eq!(state.data_u64("event_id"), Some(1));
        assert_eq!(state.last_processed_event_id, EventId::new(1));
    }

    #[test]
    fn resolving_twice_is_a_no_op() {
        let catalog = catalog();
        let resolver = GoalResolver::new(&catalog);
        let mut state = state_with("goal.train");
        let events = [event(1, 1, "tournament_announced")];
        let mut rng = ScriptedRandomizer::new(vec![1]);

        resolver
            .resolve_for_day(&character(), &mut state, 2, &events, &mut rng)
            .unwrap();
        let snapshot = state.clone();
        let report = resolver
            .resolve_for_day(&character(), &mut state, 2, &events, &mut rng)
            .unwrap();
        assert!(report.skipped);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn one_reassignment_per_day() {
        let catalog = catalog();
        let resolver = GoalResolver::new(&catalog);
        let mut state = state_with("goal.train");
        let events = [
            event(3, 1, "tournament_announced"),
            event(4, 1, "tournament_announced"),
            event(5, 1, "tournament_announced"),
        ];
        let mut rng = ScriptedRandomizer::new(vec![1]);
        let report = resolver
            .resolve_for_day(&character(), &mut state, 2, &events, &mut rng)
            .unwrap();
        assert_eq!(report.events_consumed, 3);
        assert_eq!(state.version, 2);
        assert_eq!(state.data_u64("event_id"), Some(3));
        assert_eq!(state.last_processed_event_id, EventId::new(5));
    }

    #[test]
    fn non_interruptible_goal_is_kept() {
        let catalog = catalog();
        let resolver = GoalResolver::new(&catalog);
        let mut state = state_with("goal.train_in_dojo");
        let events = [event(1, 1, "tournament_announced")];
        let mut rng = ScriptedRandomizer::new(vec![1]);
        let report = resolver
            .resolve_for_day(&character(), &mut state, 2, &events, &mut rng)
            .unwrap();
        assert!(report.assigned_goal.is_none());
        assert_eq!(state.current_goal.as_deref(), Some("goal.train_in_dojo"));
    }

    #[test]
    fn life_goal_change_reevaluates_current_goal_under_new_goal() {
        let catalog = catalog();
        let resolver = GoalResolver::new(&catalog);
        let mut state = state_with("goal.train");
        let events = [event(1, 1, "market_crash"), event(2, 1, "market_crash")];
        let mut rng = ScriptedRandomizer::new(vec![1]);
        let report = resolver
            .resolve_for_day(&character(), &mut state, 2, &events, &mut rng)
            .unwrap();
        assert_eq!(
            report.life_goal_change,
            Some((String::from("fighter.become_strongest"), String::from("merchant.get_rich")))
        );
        assert_eq!(state.life_goal, "merchant.get_rich");
        assert_eq!(state.current_goal.as_deref(), Some("goal.rest"));
        assert_eq!(state.data_u64("target_days"), Some(1));
    }

    #[test]
    fn subject_audience_ignores_other_characters() {
        let catalog = catalog();
        let resolver = GoalResolver::new(&catalog);
        let mut state = state_with("goal.rest");
        let mut about_someone_else = event(1, 1, "insulted");
        about_someone_else.subject = Some(CharacterId::new(99));
        let mut about_me = event(2, 2, "insulted");
        about_me.subject = Some(CharacterId::new(7));
        let mut rng = ScriptedRandomizer::new(vec![1]);

        resolver
            .resolve_for_day(&character(), &mut state, 2, &[about_someone_else.clone()], &mut rng)
            .unwrap();
        assert_eq!(state.current_goal.as_deref(), Some("goal.rest"));

        resolver
            .resolve_for_day(&character(), &mut state, 3, &[about_someone_else, about_me], &mut rng)
            .unwrap();
        assert_eq!(state.current_goal.as_deref(), Some("goal.train"));
    }

    #[test]
    fn completed_goal_is_refilled_from_pool() {
        let catalog = catalog();
        let resolver = GoalResolver::new(&catalog);
        let mut state = state_with("goal.train");
        state.completed = true;
        let mut rng = ScriptedRandomizer::new(vec![1]);
        let report = resolver
            .resolve_for_day(&character(), &mut state, 1, &[], &mut rng)
            .unwrap();
        assert!(report.refilled);
        assert!(state.has_active_goal());
        assert_eq!(state.data_u64("target_days"), Some(3));
    }

    #[test]
    fn leaders_draw_from_leadership_pool() {
        let catalog = catalog();
        let resolver = GoalResolver::new(&catalog);
        let mut leader = character();
        leader.leader = true;
        let mut state = GoalState::new(CharacterId::new(7), "fighter.become_strongest");
        let mut rng = ScriptedRandomizer::new(vec![1]);
        resolver
            .resolve_for_day(&leader, &mut state, 1, &[], &mut rng)
            .unwrap();
        assert_eq!(state.current_goal.as_deref(), Some("goal.start_settlement_project"));
        assert_eq!(state.life_goal, "fighter.become_strongest");
    }

    #[test]
    fn unknown_life_goal_is_an_error() {
        let catalog = catalog();
        let resolver = GoalResolver::new(&catalog);
        let mut state = GoalState::new(CharacterId::new(7), "nobody.knows");
        let mut rng = ScriptedRandomizer::new(vec![1]);
        assert!(matches!(
            resolver.resolve_for_day(&character(), &mut state, 1, &[], &mut rng),
            Err(GoalError::UnknownLifeGoal(_))
        ));
        assert!(state.last_resolved_day.is_none());
    }

    #[test]
    fn high_water_mark_of_empty_log_is_zero() {
        assert_eq!(high_water_mark(&[]), EventId::new(0));
        assert_eq!(high_water_mark(&[event(9, 0, "x"), event(4, 0, "y")]), EventId::new(9));
    }
}
