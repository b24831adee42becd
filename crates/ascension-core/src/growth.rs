//! Daily training growth.
//!
//! # Formula
//!
//! A training day yields `floor(points_per_day * intensity * multiplier)`
//! attribute points, where the multiplier is the tile's dojo multiplier
//! scaled by `1 + 0.1 * level` of the dojo building, or 1 off a dojo.
//! Exhausted characters gain half (floored).
//!
//! Points are handed out round-robin over the ten attributes, starting at
//! index `(day + character id) mod 10` so that growth is deterministic but
//! spread out across characters and days.

use ascension_types::{ATTRIBUTE_COUNT, AttributeDelta, AttributeKind, CharacterId, CoreAttributes};

use crate::error::ClockError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Multiplier gained per dojo building level.
pub const DOJO_LEVEL_BONUS: f64 = 0.1;

/// Points per training day when configuration is silent.
pub const DEFAULT_POINTS_PER_DAY: u32 = 3;

// ---------------------------------------------------------------------------
// Multipliers
// ---------------------------------------------------------------------------

/// Training multiplier for a dojo with `base` multiplier at building `level`.
pub fn dojo_multiplier(base: f64, level: u32) -> f64 {
    base * DOJO_LEVEL_BONUS.mul_add(f64::from(level), 1.0)
}

/// Check an intensity before a run.
///
/// # Errors
///
/// Returns [`ClockError::InvalidIntensity`] unless `intensity` is finite
/// and positive.
pub fn validate_intensity(intensity: f64) -> Result<f64, ClockError> {
    if intensity.is_finite() && intensity > 0.0 {
        Ok(intensity)
    } else {
        Err(ClockError::InvalidIntensity { intensity })
    }
}

/// Points earned for one training day.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn training_points(points_per_day: u32, intensity: f64, multiplier: f64, exhausted: bool) -> u32 {
    let raw = (f64::from(points_per_day) * intensity * multiplier).floor();
    let points = if !raw.is_finite() || raw <= 0.0 {
        0
    } else if raw >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        // raw is finite and within [0, u32::MAX) here
        raw as u32
    };
    if exhausted { points / 2 } else { points }
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

/// Spread `points` round-robin over the attributes.
///
/// Every attribute gets `points / 10`; the `points % 10` attributes from the
/// rotating start index get one more.
pub fn distribute(points: u32, day: u64, character: CharacterId) -> AttributeDelta {
    let count = u32::try_from(ATTRIBUTE_COUNT).unwrap_or(1);
    let start = day
        .wrapping_add(character.into_inner())
        .checked_rem(u64::from(count))
        .and_then(|start| usize::try_from(start).ok())
        .unwrap_or(0);
    let base = i64::from(points.checked_div(count).unwrap_or(0));
    let extra = usize::try_from(points.checked_rem(count).unwrap_or(0)).unwrap_or(0);

    let mut delta = AttributeDelta::default();
    for (offset, kind) in AttributeKind::ALL.iter().cycle().skip(start).take(ATTRIBUTE_COUNT).enumerate() {
        let bonus = i64::from(offset < extra);
        delta = delta.with(*kind, base.saturating_add(bonus));
    }
    delta
}

/// Attributes after one training day.
pub fn train(
    attributes: &CoreAttributes,
    points: u32,
    day: u64,
    character: CharacterId,
) -> CoreAttributes {
    attributes.apply_delta(&distribute(points, day, character))
}
