//! Deterministic randomizer abstraction.
//!
//! Everything probabilistic in the goal system and the headless combat
//! resolver draws from a [`Randomizer`]. Production wires a
//! [`SeededRandomizer`]; tests wire a [`ScriptedRandomizer`] that replays a
//! fixed integer sequence, which makes every branch reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Resolution of [`Randomizer::chance`]: probabilities are compared in
/// ten-thousandths.
pub const CHANCE_SCALE: i64 = 10_000;

/// Source of integers and yes/no rolls.
pub trait Randomizer {
    /// Return an integer in the inclusive range `min..=max`.
    ///
    /// Implementations swap the bounds when `min > max`.
    fn next_int(&mut self, min: i64, max: i64) -> i64;

    /// Return `true` with probability `probability`.
    ///
    /// Probabilities at or below zero (or NaN) never succeed and those at or
    /// above one always succeed; neither consumes a draw. Anything else
    /// draws once from `0..CHANCE_SCALE`.
    fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() || probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        let threshold = scaled_threshold(probability);
        self.next_int(0, CHANCE_SCALE.saturating_sub(1)) < threshold
    }
}

/// Convert a probability in `(0, 1)` into a threshold on `0..CHANCE_SCALE`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn scaled_threshold(probability: f64) -> i64 {
    // probability is strictly inside (0, 1), so the product fits easily
    (probability * CHANCE_SCALE as f64).round() as i64
}

/// Production randomizer backed by [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededRandomizer {
    /// Underlying generator.
    rng: StdRng,
}

impl SeededRandomizer {
    /// A generator seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// A generator seeded from a fixed value (reproducible runs).
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Randomizer for SeededRandomizer {
    fn next_int(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = ordered(min, max);
        self.rng.random_range(lo..=hi)
    }
}

/// Replays a fixed integer sequence.
///
/// Each draw takes the next scripted value and clamps it into the
/// requested range. Once the script runs out the last value repeats; an
/// empty script behaves as if it were `[min]` for every draw.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandomizer {
    /// The scripted values.
    values: Vec<i64>,
    /// Index of the next value to hand out.
    cursor: usize,
}

impl ScriptedRandomizer {
    /// A randomizer replaying `values`.
    pub fn new(values: impl Into<Vec<i64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Number of draws made so far.
    pub const fn draws(&self) -> usize {
        self.cursor
    }
}

impl Randomizer for ScriptedRandomizer {
    fn next_int(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = ordered(min, max);
        let raw = self
            .values
            .get(self.cursor)
            .or_else(|| self.values.last())
            .copied()
            .unwrap_or(lo);
        self.cursor = self.cursor.saturating_add(1);
        raw.clamp(lo, hi)
    }
}

/// Return `(min, max)` with the smaller value first.
const fn ordered(a: i64, b: i64) -> (i64, i64) {
    if a <= b { (a, b) } else { (b, a) }
}
