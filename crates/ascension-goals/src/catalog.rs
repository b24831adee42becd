//! The goal catalog: pools, current-goal definitions and transition rules.
//!
//! A catalog is loaded once per run and never mutated. Its YAML shape:
//!
//! ```yaml
//! life_goals:
//!   fighter.become_strongest:
//!     current_goals:
//!       - { code: goal.train_in_dojo, weight: 3 }
//! current_goals:
//!   goal.train_in_dojo:
//!     handler: train_in_dojo
//!     interruptible: false
//!     defaults: { target_days: 5 }
//! archetypes:
//!   brawler:
//!     - { code: fighter.become_strongest, weight: 1 }
//! transitions:
//!   tournament_announced:
//!     audience: all
//!     from:
//!       "*":
//!         current_goal: { code: goal.attend_tournament, chance: 0.5, include_payload: true }
//! leadership_pool:
//!   - { code: goal.start_settlement_project, weight: 1 }
//! ```
//!
//! [`GoalCatalog::validate`] checks every cross-reference, weight and
//! chance up front so the resolver can treat the data as trusted.

use std::collections::BTreeMap;

use ascension_types::Randomizer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GoalError;

/// Row key matching any life goal in a transition table.
pub const WILDCARD: &str = "*";

/// A code with a selection weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedCode {
    /// Life-goal or current-goal code.
    pub code: String,
    /// Relative weight. Must be positive.
    pub weight: u32,
}

impl WeightedCode {
    /// Build an entry.
    pub fn new(code: impl Into<String>, weight: u32) -> Self {
        Self {
            code: code.into(),
            weight,
        }
    }
}

/// A life goal and the current goals it draws from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LifeGoalDef {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Weighted pool of current goals.
    #[serde(default)]
    pub current_goals: Vec<WeightedCode>,
}

/// A current goal: which handler runs it and its starting data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentGoalDef {
    /// Handler id in the registry.
    pub handler: String,
    /// Whether event rules may replace the goal before it completes.
    #[serde(default)]
    pub interruptible: bool,
    /// Data the goal starts with.
    #[serde(default)]
    pub defaults: Map<String, Value>,
}

/// Whose events a transition table listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    /// Every event of the type, whoever it is about.
    #[default]
    All,
    /// Only events whose subject is the resolving character.
    Subject,
}

const fn certain() -> f64 {
    1.0
}

/// A current-goal assignment triggered by an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalAssignment {
    /// Current goal to assign.
    pub code: String,
    /// Probability the assignment happens.
    #[serde(default = "certain")]
    pub chance: f64,
    /// Data merged over the goal's defaults.
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Also merge the event payload (and its id as `event_id`).
    #[serde(default)]
    pub include_payload: bool,
}

/// What an event does to a character on a given life goal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransitionRule {
    /// Probability of switching life goal.
    #[serde(default)]
    pub life_goal_chance: f64,
    /// Weighted pool of new life goals.
    #[serde(default)]
    pub life_goals: Vec<WeightedCode>,
    /// Current-goal assignment, if any.
    #[serde(default)]
    pub current_goal: Option<GoalAssignment>,
}

/// All rules for one event type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventTransitions {
    /// Whose events count.
    #[serde(default)]
    pub audience: Audience,
    /// Rules keyed by the character's current life goal, or [`WILDCARD`].
    #[serde(default)]
    pub from: BTreeMap<String, TransitionRule>,
}

impl EventTransitions {
    /// The rule for `life_goal`, falling back to the wildcard row.
    pub fn rule_for(&self, life_goal: &str) -> Option<&TransitionRule> {
        self.from.get(life_goal).or_else(|| self.from.get(WILDCARD))
    }
}

/// Immutable goal configuration for a run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GoalCatalog {
    /// Life goals by code.
    #[serde(default)]
    pub life_goals: BTreeMap<String, LifeGoalDef>,
    /// Current goals by code.
    #[serde(default)]
    pub current_goals: BTreeMap<String, CurrentGoalDef>,
    /// Archetype to weighted life-goal pool.
    #[serde(default)]
    pub archetypes: BTreeMap<String, Vec<WeightedCode>>,
    /// Event type to transition table.
    #[serde(default)]
    pub transitions: BTreeMap<String, EventTransitions>,
    /// Current goals leaders draw from instead of their life-goal pool.
    #[serde(default)]
    pub leadership_pool: Vec<WeightedCode>,
}

impl GoalCatalog {
    /// Check every reference, weight and chance.
    ///
    /// # Errors
    ///
    /// Returns the first [`GoalError`] found.
    pub fn validate(&self) -> Result<(), GoalError> {
        for (code, life) in &self.life_goals {
            self.check_current_pool(&format!("life goal {code}"), &life.current_goals)?;
        }
        for (archetype, pool) in &self.archetypes {
            self.check_life_pool(&format!("archetype {archetype}"), pool)?;
        }
        self.check_current_pool("leadership pool", &self.leadership_pool)?;

        for (event_type, table) in &self.transitions {
            for (from, rule) in &table.from {
                let location = format!("transition {event_type} from {from}");
                if from != WILDCARD && !self.life_goals.contains_key(from) {
                    return Err(GoalError::UnknownReference {
                        location,
                        code: from.clone(),
                    });
                }
                check_chance(&location, rule.life_goal_chance)?;
                self.check_life_pool(&location, &rule.life_goals)?;
                if let Some(assignment) = &rule.current_goal {
                    check_chance(&location, assignment.chance)?;
                    if !self.current_goals.contains_key(&assignment.code) {
                        return Err(GoalError::UnknownReference {
                            location,
                            code: assignment.code.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Look up a life goal.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::UnknownLifeGoal`] for an unknown code.
    pub fn life_goal(&self, code: &str) -> Result<&LifeGoalDef, GoalError> {
        self.life_goals
            .get(code)
            .ok_or_else(|| GoalError::UnknownLifeGoal(code.to_owned()))
    }

    /// Look up a current goal.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::UnknownCurrentGoal`] for an unknown code.
    pub fn current_goal(&self, code: &str) -> Result<&CurrentGoalDef, GoalError> {
        self.current_goals
            .get(code)
            .ok_or_else(|| GoalError::UnknownCurrentGoal(code.to_owned()))
    }

    /// Draw a starting life goal for an archetype.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::UnknownArchetype`] for an unknown archetype.
    pub fn initial_life_goal(
        &self,
        archetype: &str,
        rng: &mut dyn Randomizer,
    ) -> Result<Option<String>, GoalError> {
        let pool = self
            .archetypes
            .get(archetype)
            .ok_or_else(|| GoalError::UnknownArchetype(archetype.to_owned()))?;
        Ok(pick_weighted(pool, rng).map(str::to_owned))
    }

    fn check_current_pool(&self, location: &str, pool: &[WeightedCode]) -> Result<(), GoalError> {
        for entry in pool {
            check_weight(location, entry)?;
            if !self.current_goals.contains_key(&entry.code) {
                return Err(GoalError::UnknownReference {
                    location: location.to_owned(),
                    code: entry.code.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_life_pool(&self, location: &str, pool: &[WeightedCode]) -> Result<(), GoalError> {
        for entry in pool {
            check_weight(location, entry)?;
            if !self.life_goals.contains_key(&entry.code) {
                return Err(GoalError::UnknownReference {
                    location: location.to_owned(),
                    code: entry.code.clone(),
                });
            }
        }
        Ok(())
    }
}

fn check_weight(location: &str, entry: &WeightedCode) -> Result<(), GoalError> {
    if entry.weight == 0 {
        return Err(GoalError::InvalidWeight {
            location: location.to_owned(),
            code: entry.code.clone(),
        });
    }
    Ok(())
}

fn check_chance(location: &str, chance: f64) -> Result<(), GoalError> {
    if !(0.0..=1.0).contains(&chance) {
        return Err(GoalError::InvalidChance {
            location: location.to_owned(),
            chance,
        });
    }
    Ok(())
}

/// Pick a code from a weighted pool with one draw of `1..=total`.
///
/// Returns `None` for an empty pool without drawing.
pub fn pick_weighted<'p>(pool: &'p [WeightedCode], rng: &mut dyn Randomizer) -> Option<&'p str> {
    let total: u64 = pool.iter().map(|entry| u64::from(entry.weight)).sum();
    if total == 0 {
        return None;
    }
    let roll = rng.next_int(1, i64::try_from(total).unwrap_or(i64::MAX));
    let mut cumulative = 0_i64;
    for entry in pool {
        cumulative = cumulative.saturating_add(i64::from(entry.weight));
        if roll <= cumulative {
            return Some(entry.code.as_str());
        }
    }
    pool.last().map(|entry| entry.code.as_str())
}
