//! Deterministic success rolls.
//!
//! The live resolver never draws from a stateful generator. Instead it
//! hashes a composite seed of `(session, tick, attacker, technique)` with
//! SHA-256, takes the first four digest bytes as a big-endian `u32` and
//! divides by 2^32. The same seed always yields the same value in `[0, 1)`,
//! so any live fight can be replayed exactly.
//!
//! The headless resolver swaps this for an injected [`Randomizer`] through
//! [`SuccessRoll::Randomizer`].

use ascension_types::{ActorId, Randomizer, SessionId};
use sha2::{Digest, Sha256};

/// Divisor mapping a `u32` onto `[0, 1)`.
const UNIT_DIVISOR: f64 = 4_294_967_296.0;

/// The inputs to a deterministic roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollSeed<'a> {
    /// Tactical session.
    pub session: SessionId,
    /// Session tick the action happens on.
    pub tick: u64,
    /// Acting actor.
    pub attacker: ActorId,
    /// Technique code.
    pub technique: &'a str,
}

impl RollSeed<'_> {
    /// The composite seed string fed to the hash.
    pub fn composite(&self) -> String {
        format!("{}|{}|{}|{}", self.session, self.tick, self.attacker, self.technique)
    }

    /// The pseudo-uniform value in `[0, 1)` for this seed.
    pub fn unit(&self) -> f64 {
        unit_from_seed(&self.composite())
    }
}

/// Hash `seed` to a pseudo-uniform value in `[0, 1)`.
pub fn unit_from_seed(seed: &str) -> f64 {
    let digest = Sha256::digest(seed.as_bytes());
    let head = digest
        .as_slice()
        .first_chunk::<4>()
        .map_or(0, |bytes| u32::from_be_bytes(*bytes));
    f64::from(head) / UNIT_DIVISOR
}

/// How a technique's success is decided.
pub enum SuccessRoll<'a> {
    /// Hash-based roll (live combat).
    Seeded(RollSeed<'a>),
    /// Draw from an injected randomizer (headless combat, tests).
    Randomizer(&'a mut dyn Randomizer),
}

impl SuccessRoll<'_> {
    /// Whether an action with success probability `probability` succeeds.
    pub fn succeeds(self, probability: f64) -> bool {
        match self {
            Self::Seeded(seed) => seed.unit() < probability,
            Self::Randomizer(rng) => rng.chance(probability),
        }
    }
}

impl core::fmt::Debug for SuccessRoll<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Seeded(seed) => f.debug_tuple("Seeded").field(seed).finish(),
            Self::Randomizer(_) => f.write_str("Randomizer(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use ascension_types::ScriptedRandomizer;

    use super::*;

    fn seed(tick: u64) -> RollSeed<'static> {
        RollSeed {
            session: SessionId::new(7),
            tick,
            attacker: ActorId::new(3),
            technique: "ki_blast",
        }
    }

    #[test]
    fn composite_seed_layout() {
        assert_eq!(seed(12).composite(), "7|12|3|ki_blast");
    }

    #[test]
    fn unit_is_stable_and_in_range() {
        let a = seed(1).unit();
        let b = seed(1).unit();
        assert!(a.to_bits() == b.to_bits());
        for tick in 0..64 {
            let value = seed(tick).unit();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn different_ticks_spread_out() {
        let values: Vec<u64> = (0..32).map(|t| seed(t).unit().to_bits()).collect();
        let mut unique = values.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), values.len());
    }

    #[test]
    fn certain_and_impossible_rolls() {
        assert!(SuccessRoll::Seeded(seed(4)).succeeds(1.0));
        assert!(!SuccessRoll::Seeded(seed(4)).succeeds(0.0));
    }

    #[test]
    fn randomizer_path_uses_chance() {
        let mut rng = ScriptedRandomizer::new(vec![9_999]);
        assert!(!SuccessRoll::Randomizer(&mut rng).succeeds(0.5));
        let mut rng = ScriptedRandomizer::new(vec![0]);
        assert!(SuccessRoll::Randomizer(&mut rng).succeeds(0.5));
    }
}
