//! The single activity a character performs on one simulated day.

use serde::{Deserialize, Serialize};

use crate::geometry::Coord;

/// What a character spends the day doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// Recover.
    Rest,
    /// Train attributes.
    Train,
    /// Walk toward a target tile.
    Travel,
    /// Work in a settlement.
    Work,
    /// Meditate.
    Meditate,
    /// Fight in a tournament or challenge.
    Compete,
}

/// A day's plan. Never persisted beyond the day it was produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPlan {
    /// The activity.
    pub activity: Activity,
    /// Target tile when travelling.
    pub travel_target: Option<Coord>,
}

impl DailyPlan {
    /// A plan for `activity` with no travel target.
    pub const fn doing(activity: Activity) -> Self {
        Self {
            activity,
            travel_target: None,
        }
    }

    /// Rest for the day.
    pub const fn rest() -> Self {
        Self::doing(Activity::Rest)
    }

    /// Train for the day.
    pub const fn train() -> Self {
        Self::doing(Activity::Train)
    }

    /// Travel toward `target`.
    pub const fn travel(target: Coord) -> Self {
        Self {
            activity: Activity::Travel,
            travel_target: Some(target),
        }
    }
}

impl Default for DailyPlan {
    fn default() -> Self {
        Self::rest()
    }
}
