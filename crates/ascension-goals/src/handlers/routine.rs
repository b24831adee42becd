//! Day-counting goals: `train` and `rest`.

use ascension_types::{Character, DailyPlan, World};

use super::{GoalHandler, StepOutcome, count_day};
use crate::context::GoalContext;
use crate::error::GoalError;
use crate::state::GoalData;

/// Train in place for `target_days` days.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainHandler;

impl GoalHandler for TrainHandler {
    fn id(&self) -> &'static str {
        "train"
    }

    fn step(
        &self,
        _character: &Character,
        _world: &World,
        data: &GoalData,
        _context: &GoalContext,
    ) -> Result<StepOutcome, GoalError> {
        Ok(count_day(data, DailyPlan::train()))
    }
}

/// Rest for `target_days` days.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestHandler;

impl GoalHandler for RestHandler {
    fn id(&self) -> &'static str {
        "rest"
    }

    fn step(
        &self,
        _character: &Character,
        _world: &World,
        data: &GoalData,
        _context: &GoalContext,
    ) -> Result<StepOutcome, GoalError> {
        Ok(count_day(data, DailyPlan::rest()))
    }
}
