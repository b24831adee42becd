//! Derived combat numbers and power scores.
//!
//! All functions here are pure and take effective attributes (after
//! transformation scaling). Arithmetic saturates; an absurdly strong
//! character caps at `u32::MAX` rather than wrapping.
//!
//! | Quantity       | Formula                                 |
//! |----------------|-----------------------------------------|
//! | max HP         | `50 + 10 * endurance + 5 * durability`  |
//! | max Ki         | `20 + 10 * ki_capacity`                 |
//! | initiative     | `max(1, speed)`                         |
//! | Ki regen/turn  | `ki_recovery / 2`                       |

use ascension_types::{AttributeKind, CoreAttributes};

/// HP every character has before attributes are added.
pub const BASE_HP: u32 = 50;

/// Ki every character has before attributes are added.
pub const BASE_KI: u32 = 20;

/// Per-attribute weights of the power score, in [`AttributeKind::ALL`] order.
const POWER_WEIGHTS: [u64; 10] = [3, 2, 2, 2, 2, 3, 1, 1, 1, 1];

/// Maximum hit points for a set of effective attributes.
pub const fn max_hp(attrs: &CoreAttributes) -> u32 {
    BASE_HP
        .saturating_add(attrs.endurance.saturating_mul(10))
        .saturating_add(attrs.durability.saturating_mul(5))
}

/// Maximum ki for a set of effective attributes.
pub const fn max_ki(attrs: &CoreAttributes) -> u32 {
    BASE_KI.saturating_add(attrs.ki_capacity.saturating_mul(10))
}

/// Initiative speed used by the turn scheduler. Never zero.
pub const fn initiative_speed(attrs: &CoreAttributes) -> u32 {
    if attrs.speed == 0 { 1 } else { attrs.speed }
}

/// Ki regained at the start of each of the character's turns.
pub const fn ki_regen_per_turn(attrs: &CoreAttributes) -> u32 {
    attrs.ki_recovery / 2
}

/// Weighted power score used for rankings, seeding and logging.
pub fn power_level(attrs: &CoreAttributes) -> u64 {
    AttributeKind::ALL
        .iter()
        .zip(POWER_WEIGHTS)
        .map(|(kind, weight)| u64::from(attrs.get(*kind)).saturating_mul(weight))
        .fold(0_u64, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_pools() {
        let attrs = CoreAttributes {
            endurance: 4,
            durability: 2,
            ki_capacity: 3,
            ..CoreAttributes::default()
        };
        assert_eq!(max_hp(&attrs), 50 + 40 + 10);
        assert_eq!(max_ki(&attrs), 20 + 30);
    }

    #[test]
    fn initiative_is_never_zero() {
        assert_eq!(initiative_speed(&CoreAttributes::default()), 1);
        assert_eq!(initiative_speed(&CoreAttributes::uniform(30)), 30);
    }

    #[test]
    fn power_level_weights() {
        assert_eq!(power_level(&CoreAttributes::uniform(1)), 18);
        let strong = CoreAttributes {
            strength: 10,
            ..CoreAttributes::default()
        };
        assert_eq!(power_level(&strong), 30);
    }

    #[test]
    fn pools_saturate() {
        let huge = CoreAttributes::uniform(u32::MAX);
        assert_eq!(max_hp(&huge), u32::MAX);
        assert_eq!(max_ki(&huge), u32::MAX);
    }
}
