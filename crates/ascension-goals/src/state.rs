//! Per-character goal state.

use ascension_types::{CharacterId, EventId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form data owned by the active current goal's handler.
pub type GoalData = Map<String, Value>;

/// A character's life goal, current goal and resolver bookkeeping.
///
/// Updated as a value: the resolver returns a new state and bumps
/// [`version`](Self::version) for every transition it applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalState {
    /// Owner.
    pub character_id: CharacterId,
    /// Long-horizon aspiration.
    pub life_goal: String,
    /// Active day-to-day objective.
    #[serde(default)]
    pub current_goal: Option<String>,
    /// Handler data for the current goal.
    #[serde(default)]
    pub data: GoalData,
    /// Whether the current goal has been completed.
    #[serde(default)]
    pub completed: bool,
    /// Highest event id considered so far (0 before any).
    #[serde(default)]
    pub last_processed_event_id: EventId,
    /// Last day the resolver ran for this character.
    #[serde(default)]
    pub last_resolved_day: Option<u64>,
    /// Number of transitions applied.
    #[serde(default)]
    pub version: u64,
}

impl GoalState {
    /// A fresh state with no current goal.
    pub fn new(character_id: CharacterId, life_goal: impl Into<String>) -> Self {
        Self {
            character_id,
            life_goal: life_goal.into(),
            current_goal: None,
            data: GoalData::new(),
            completed: false,
            last_processed_event_id: EventId::default(),
            last_resolved_day: None,
            version: 0,
        }
    }

    /// Replace the current goal, resetting completion.
    pub fn assign(&mut self, code: impl Into<String>, data: GoalData) {
        self.current_goal = Some(code.into());
        self.data = data;
        self.completed = false;
        self.version = self.version.saturating_add(1);
    }

    /// Switch life goal.
    pub fn change_life_goal(&mut self, code: impl Into<String>) {
        self.life_goal = code.into();
        self.version = self.version.saturating_add(1);
    }

    /// Record a handler step: new data, and completion if it finished.
    pub fn record_step(&mut self, data: GoalData, completed: bool) {
        self.data = data;
        if completed && !self.completed {
            self.completed = true;
            self.version = self.version.saturating_add(1);
        }
    }

    /// Whether there is an active, unfinished current goal.
    pub const fn has_active_goal(&self) -> bool {
        self.current_goal.is_some() && !self.completed
    }

    /// Read an integer from the goal data.
    pub fn data_u64(&self, key: &str) -> Option<u64> {
        self.data.get(key).and_then(Value::as_u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn assignment_resets_completion_and_bumps_version() {
        let mut state = GoalState::new(CharacterId::new(1), "fighter.become_strongest");
        state.completed = true;
        let mut data = GoalData::new();
        data.insert(String::from("target_days"), json!(4));
        state.assign("goal.train", data);
        assert!(state.has_active_goal());
        assert_eq!(state.version, 1);
        assert_eq!(state.data_u64("target_days"), Some(4));
        state.change_life_goal("merchant.get_rich");
        assert_eq!(state.version, 2);
        state.record_step(GoalData::new(), false);
        assert_eq!(state.version, 2);
        state.record_step(GoalData::new(), true);
        assert!(!state.has_active_goal());
        assert_eq!(state.version, 3);
    }

    #[test]
    fn deserializes_with_defaults() {
        let state: GoalState =
            serde_json::from_value(json!({"character_id": 3, "life_goal": "x"})).unwrap();
        assert_eq!(state.character_id, CharacterId::new(3));
        assert_eq!(state.last_processed_event_id, EventId::new(0));
        assert!(state.last_resolved_day.is_none());
    }
}
