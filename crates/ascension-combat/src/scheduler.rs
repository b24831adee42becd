//! Integer initiative scheduler.
//!
//! Every actor carries a meter that fills by its speed each tick. A pick
//! fast-forwards all meters by the fewest ticks any actor needs to reach the
//! threshold, hands the turn to the fullest meter at or above the threshold
//! (lowest id on ties) and drains the threshold from the winner. No
//! floating point is involved, so two runs over the same actors always
//! produce the same turn order.

use ascension_types::ActorId;

use crate::error::CombatError;

/// Meter level that grants a turn.
pub const DEFAULT_THRESHOLD: u32 = 100;

/// One participant in the turn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnActor {
    /// Actor identifier.
    pub id: ActorId,
    /// Meter gained per tick. Must be positive.
    pub speed: u32,
    /// Current meter.
    pub meter: u32,
}

impl TurnActor {
    /// An actor with an empty meter.
    pub const fn new(id: ActorId, speed: u32) -> Self {
        Self { id, speed, meter: 0 }
    }
}

/// Picks actors in initiative order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnScheduler {
    /// Meter level that grants a turn.
    threshold: u32,
}

impl Default for TurnScheduler {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl TurnScheduler {
    /// A scheduler with a custom threshold.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::InvalidThreshold`] for a zero threshold.
    pub const fn new(threshold: u32) -> Result<Self, CombatError> {
        if threshold == 0 {
            return Err(CombatError::InvalidThreshold);
        }
        Ok(Self { threshold })
    }

    /// The configured threshold.
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Advance meters and return the id of the actor whose turn it is.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::EmptyActorList`] for an empty slice and
    /// [`CombatError::InvalidSpeed`] if any actor has zero speed.
    pub fn pick_next_actor_id(&self, actors: &mut [TurnActor]) -> Result<ActorId, CombatError> {
        let mut wait = u32::MAX;
        for actor in actors.iter() {
            if actor.speed == 0 {
                return Err(CombatError::InvalidSpeed { actor: actor.id });
            }
            let deficit = self.threshold.saturating_sub(actor.meter);
            wait = wait.min(deficit.div_ceil(actor.speed));
        }
        if actors.is_empty() {
            return Err(CombatError::EmptyActorList);
        }

        for actor in actors.iter_mut() {
            actor.meter = actor.meter.saturating_add(actor.speed.saturating_mul(wait));
        }

        let mut winner: Option<&mut TurnActor> = None;
        for actor in actors.iter_mut() {
            if actor.meter < self.threshold {
                continue;
            }
            let better = winner.as_ref().is_none_or(|best| {
                actor.meter > best.meter || (actor.meter == best.meter && actor.id < best.id)
            });
            if better {
                winner = Some(actor);
            }
        }

        let winner = winner.ok_or(CombatError::EmptyActorList)?;
        winner.meter = winner.meter.saturating_sub(self.threshold);
        Ok(winner.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn id(raw: u64) -> ActorId {
        ActorId::new(raw)
    }

    #[test]
    fn faster_actor_acts_three_times_as_often() {
        let scheduler = TurnScheduler::default();
        let mut actors = [TurnActor::new(id(1), 10), TurnActor::new(id(2), 30)];
        let mut slow = 0_u32;
        let mut fast = 0_u32;
        for _ in 0..60 {
            match scheduler.pick_next_actor_id(&mut actors).unwrap().into_inner() {
                1 => slow += 1,
                _ => fast += 1,
            }
        }
        assert_eq!(slow + fast, 60);
        assert!((14..=16).contains(&slow), "slow acted {slow} times");
        assert!((44..=46).contains(&fast), "fast acted {fast} times");
    }

    #[test]
    fn equal_speed_lower_id_first() {
        let scheduler = TurnScheduler::default();
        let mut actors = [TurnActor::new(id(9), 20), TurnActor::new(id(4), 20)];
        assert_eq!(scheduler.pick_next_actor_id(&mut actors).unwrap(), id(4));
        assert_eq!(scheduler.pick_next_actor_id(&mut actors).unwrap(), id(9));
        assert_eq!(scheduler.pick_next_actor_id(&mut actors).unwrap(), id(4));
    }

    #[test]
    fn winner_is_drained_by_threshold() {
        let scheduler = TurnScheduler::new(50).unwrap();
        let mut actors = [TurnActor::new(id(1), 30)];
        scheduler.pick_next_actor_id(&mut actors).unwrap();
        assert_eq!(actors[0].meter, 10);
    }

    #[test]
    fn full_meter_acts_without_waiting() {
        let scheduler = TurnScheduler::default();
        let mut actors = [
            TurnActor { id: id(1), speed: 1, meter: 150 },
            TurnActor::new(id(2), 99),
        ];
        assert_eq!(scheduler.pick_next_actor_id(&mut actors).unwrap(), id(1));
        assert_eq!(actors[1].meter, 0);
    }

    #[test]
    fn invalid_inputs() {
        let scheduler = TurnScheduler::default();
        assert!(matches!(
            scheduler.pick_next_actor_id(&mut []),
            Err(CombatError::EmptyActorList)
        ));
        let mut stalled = [TurnActor::new(id(3), 0)];
        assert!(matches!(
            scheduler.pick_next_actor_id(&mut stalled),
            Err(CombatError::InvalidSpeed { .. })
        ));
        assert!(matches!(TurnScheduler::new(0), Err(CombatError::InvalidThreshold)));
    }
}
