//! The ten core attributes every character carries.
//!
//! [`CoreAttributes`] is an immutable value: growth produces a new vector
//! by adding an [`AttributeDelta`], and transformations produce a scaled
//! copy via [`CoreAttributes::scaled`]. No operation can drive a component
//! below zero.

use serde::{Deserialize, Serialize};

/// Number of attributes in a [`CoreAttributes`] vector.
pub const ATTRIBUTE_COUNT: usize = 10;

/// Names one of the ten core attributes.
///
/// Catalogs use this to say which stat feeds a damage formula or which
/// stat mitigates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// Raw physical power.
    Strength,
    /// Movement and initiative.
    Speed,
    /// Stamina; feeds maximum HP.
    Endurance,
    /// Toughness; feeds maximum HP and melee mitigation.
    Durability,
    /// Size of the ki pool.
    KiCapacity,
    /// Precision of ki techniques.
    KiControl,
    /// Ki regained per turn.
    KiRecovery,
    /// Concentration.
    Focus,
    /// Training consistency.
    Discipline,
    /// Learning speed.
    Adaptability,
}

impl AttributeKind {
    /// All kinds in canonical order.
    pub const ALL: [Self; ATTRIBUTE_COUNT] = [
        Self::Strength,
        Self::Speed,
        Self::Endurance,
        Self::Durability,
        Self::KiCapacity,
        Self::KiControl,
        Self::KiRecovery,
        Self::Focus,
        Self::Discipline,
        Self::Adaptability,
    ];
}

/// How a scaled attribute value is rounded back to an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round toward negative infinity.
    Floor,
    /// Round toward positive infinity.
    Ceil,
}

/// A character's ten non-negative attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CoreAttributes {
    /// Raw physical power.
    pub strength: u32,
    /// Movement and initiative.
    pub speed: u32,
    /// Stamina.
    pub endurance: u32,
    /// Toughness.
    pub durability: u32,
    /// Size of the ki pool.
    pub ki_capacity: u32,
    /// Precision of ki techniques.
    pub ki_control: u32,
    /// Ki regained per turn.
    pub ki_recovery: u32,
    /// Concentration.
    pub focus: u32,
    /// Training consistency.
    pub discipline: u32,
    /// Learning speed.
    pub adaptability: u32,
}

/// A signed change to apply to [`CoreAttributes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttributeDelta {
    /// Change to strength.
    #[serde(default)]
    pub strength: i64,
    /// Change to speed.
    #[serde(default)]
    pub speed: i64,
    /// Change to endurance.
    #[serde(default)]
    pub endurance: i64,
    /// Change to durability.
    #[serde(default)]
    pub durability: i64,
    /// Change to ki capacity.
    #[serde(default)]
    pub ki_capacity: i64,
    /// Change to ki control.
    #[serde(default)]
    pub ki_control: i64,
    /// Change to ki recovery.
    #[serde(default)]
    pub ki_recovery: i64,
    /// Change to focus.
    #[serde(default)]
    pub focus: i64,
    /// Change to discipline.
    #[serde(default)]
    pub discipline: i64,
    /// Change to adaptability.
    #[serde(default)]
    pub adaptability: i64,
}

impl AttributeDelta {
    /// Return this delta with `amount` added to one attribute.
    pub const fn with(mut self, kind: AttributeKind, amount: i64) -> Self {
        let slot = match kind {
            AttributeKind::Strength => &mut self.strength,
            AttributeKind::Speed => &mut self.speed,
            AttributeKind::Endurance => &mut self.endurance,
            AttributeKind::Durability => &mut self.durability,
            AttributeKind::KiCapacity => &mut self.ki_capacity,
            AttributeKind::KiControl => &mut self.ki_control,
            AttributeKind::KiRecovery => &mut self.ki_recovery,
            AttributeKind::Focus => &mut self.focus,
            AttributeKind::Discipline => &mut self.discipline,
            AttributeKind::Adaptability => &mut self.adaptability,
        };
        *slot = slot.saturating_add(amount);
        self
    }

    /// Whether every component is zero.
    pub const fn is_zero(&self) -> bool {
        self.strength == 0
            && self.speed == 0
            && self.endurance == 0
            && self.durability == 0
            && self.ki_capacity == 0
            && self.ki_control == 0
            && self.ki_recovery == 0
            && self.focus == 0
            && self.discipline == 0
            && self.adaptability == 0
    }
}

impl CoreAttributes {
    /// Every attribute set to `value`.
    pub const fn uniform(value: u32) -> Self {
        Self {
            strength: value,
            speed: value,
            endurance: value,
            durability: value,
            ki_capacity: value,
            ki_control: value,
            ki_recovery: value,
            focus: value,
            discipline: value,
            adaptability: value,
        }
    }

    /// Read one attribute by kind.
    pub const fn get(&self, kind: AttributeKind) -> u32 {
        match kind {
            AttributeKind::Strength => self.strength,
            AttributeKind::Speed => self.speed,
            AttributeKind::Endurance => self.endurance,
            AttributeKind::Durability => self.durability,
            AttributeKind::KiCapacity => self.ki_capacity,
            AttributeKind::KiControl => self.ki_control,
            AttributeKind::KiRecovery => self.ki_recovery,
            AttributeKind::Focus => self.focus,
            AttributeKind::Discipline => self.discipline,
            AttributeKind::Adaptability => self.adaptability,
        }
    }

    /// Sum of all ten attributes.
    pub fn total(&self) -> u64 {
        AttributeKind::ALL
            .iter()
            .map(|kind| u64::from(self.get(*kind)))
            .fold(0_u64, u64::saturating_add)
    }

    /// Return a new vector with `delta` added, clamping each component to
    /// `0..=u32::MAX`.
    pub fn apply_delta(&self, delta: &AttributeDelta) -> Self {
        Self {
            strength: add_clamped(self.strength, delta.strength),
            speed: add_clamped(self.speed, delta.speed),
            endurance: add_clamped(self.endurance, delta.endurance),
            durability: add_clamped(self.durability, delta.durability),
            ki_capacity: add_clamped(self.ki_capacity, delta.ki_capacity),
            ki_control: add_clamped(self.ki_control, delta.ki_control),
            ki_recovery: add_clamped(self.ki_recovery, delta.ki_recovery),
            focus: add_clamped(self.focus, delta.focus),
            discipline: add_clamped(self.discipline, delta.discipline),
            adaptability: add_clamped(self.adaptability, delta.adaptability),
        }
    }

    /// Return a new vector with every component multiplied by `factor`.
    ///
    /// Non-finite or negative factors scale to zero.
    pub fn scaled(&self, factor: f64, rounding: Rounding) -> Self {
        let scale = |value: u32| scale_component(value, factor, rounding);
        Self {
            strength: scale(self.strength),
            speed: scale(self.speed),
            endurance: scale(self.endurance),
            durability: scale(self.durability),
            ki_capacity: scale(self.ki_capacity),
            ki_control: scale(self.ki_control),
            ki_recovery: scale(self.ki_recovery),
            focus: scale(self.focus),
            discipline: scale(self.discipline),
            adaptability: scale(self.adaptability),
        }
    }
}

/// Add a signed amount to an unsigned attribute, clamping into range.
fn add_clamped(value: u32, delta: i64) -> u32 {
    let sum = i64::from(value).saturating_add(delta);
    u32::try_from(sum.max(0)).unwrap_or(u32::MAX)
}

/// Multiply one component, rounding and clamping into `u32`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_component(value: u32, factor: f64, rounding: Rounding) -> u32 {
    if !factor.is_finite() || factor <= 0.0 {
        return 0;
    }
    let raw = f64::from(value) * factor;
    let rounded = match rounding {
        Rounding::Floor => raw.floor(),
        Rounding::Ceil => raw.ceil(),
    };
    if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        // rounded is finite and within [0, u32::MAX) here
        rounded as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_never_drives_below_zero() {
        let base = CoreAttributes::uniform(5);
        let delta = AttributeDelta::default()
            .with(AttributeKind::Strength, -20)
            .with(AttributeKind::Speed, 3);
        let next = base.apply_delta(&delta);
        assert_eq!(next.strength, 0);
        assert_eq!(next.speed, 8);
        assert_eq!(next.focus, 5);
        // the original value is untouched
        assert_eq!(base.strength, 5);
    }

    #[test]
    fn scaling_floors_and_ceils() {
        let base = CoreAttributes::uniform(5);
        assert_eq!(base.scaled(1.5, Rounding::Floor).strength, 7);
        assert_eq!(base.scaled(1.5, Rounding::Ceil).strength, 8);
        assert_eq!(base.scaled(0.8, Rounding::Floor).speed, 4);
    }

    #[test]
    fn scaling_by_invalid_factor_is_zero() {
        let base = CoreAttributes::uniform(10);
        assert_eq!(base.scaled(-1.0, Rounding::Floor), CoreAttributes::uniform(0));
        assert_eq!(base.scaled(f64::NAN, Rounding::Ceil), CoreAttributes::uniform(0));
    }

    #[test]
    fn get_matches_fields() {
        let attrs = CoreAttributes {
            strength: 1,
            speed: 2,
            endurance: 3,
            durability: 4,
            ki_capacity: 5,
            ki_control: 6,
            ki_recovery: 7,
            focus: 8,
            discipline: 9,
            adaptability: 10,
        };
        let values: Vec<u32> = AttributeKind::ALL.iter().map(|k| attrs.get(*k)).collect();
        assert_eq!(values, (1..=10).collect::<Vec<u32>>());
        assert_eq!(attrs.total(), 55);
    }

    #[test]
    fn delta_deserializes_with_missing_fields() {
        let delta: AttributeDelta = serde_json::from_str(r#"{"focus": 2}"#).unwrap_or_default();
        assert_eq!(delta.focus, 2);
        assert_eq!(delta.strength, 0);
        assert!(!delta.is_zero());
    }
}
