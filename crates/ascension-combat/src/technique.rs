//! Technique definitions and the execution math.
//!
//! Techniques are pure data: aim modes, delivery shape, cost, damage
//! coefficients and proficiency curves. The functions here turn a definition
//! plus the user's proficiency into concrete numbers:
//!
//! - effective ki cost = `ceil(base_cost * cost_curve(prof))`
//! - success probability = `success_curve(prof)`, clamped to `[0, 1]`
//! - failure spends `floor(cost * failure_cost_multiplier)`
//! - damage = `max(min_damage, floor((base + floor(stat * mult)) *
//!   damage_curve(prof)) - floor(mitigation / divisor))`
//!
//! Charged techniques pay their cost on activation and deal damage when
//! released some ticks later (see [`ChargeSpec`]).

use std::collections::BTreeMap;

use ascension_types::{AttributeKind, CoreAttributes};
use serde::{Deserialize, Serialize};

use crate::curve::{CurveSpec, ProficiencyCurve, ceil_scaled, floor_scaled};
use crate::error::CombatError;
use crate::roll::SuccessRoll;
use crate::targeting::{AimMode, DeliveryShape, Piercing, ShapeParams};

/// Share of the cost spent when a technique fails, if the catalog is silent.
pub const DEFAULT_FAILURE_COST_MULTIPLIER: f64 = 0.5;

const fn default_failure_cost_multiplier() -> f64 {
    DEFAULT_FAILURE_COST_MULTIPLIER
}

const fn default_stat_multiplier() -> f64 {
    1.0
}

const fn default_mitigation_stat() -> AttributeKind {
    AttributeKind::Durability
}

const fn default_mitigation_divisor() -> u32 {
    2
}

/// How a successful technique computes damage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageFormula {
    /// Flat base damage.
    #[serde(default)]
    pub base: u32,
    /// Attacker attribute added to the base.
    pub stat: AttributeKind,
    /// Scale applied to the attacker attribute before flooring.
    #[serde(default = "default_stat_multiplier")]
    pub stat_multiplier: f64,
    /// Defender attribute that mitigates damage.
    #[serde(default = "default_mitigation_stat")]
    pub mitigation_stat: AttributeKind,
    /// Divisor applied to the mitigation attribute. Must be positive.
    #[serde(default = "default_mitigation_divisor")]
    pub mitigation_divisor: u32,
    /// Floor on the final damage.
    #[serde(default)]
    pub min_damage: u32,
    /// Damage scale by proficiency.
    #[serde(default)]
    pub curve: Option<CurveSpec>,
}

/// Charge behaviour of a technique that resolves after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeSpec {
    /// Ticks between activation and release.
    pub charge_ticks: u32,
    /// Ki paid for every tick the charge is held.
    #[serde(default)]
    pub hold_cost: u32,
    /// Whether the user may keep moving while the charge is held.
    #[serde(default)]
    pub move_while_prepared: bool,
}

/// One technique as written in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechniqueDefinition {
    /// Unique code, e.g. `ki_blast`.
    pub code: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Allowed aim modes. Never empty.
    pub aim_modes: Vec<AimMode>,
    /// Delivery geometry.
    pub delivery: DeliveryShape,
    /// Range in cells.
    #[serde(default)]
    pub range: u32,
    /// Burst radius for area techniques.
    #[serde(default)]
    pub aoe_radius: u32,
    /// Ray piercing.
    #[serde(default)]
    pub piercing: Piercing,
    /// Ki cost before the proficiency curve.
    pub base_cost: u32,
    /// Cost scale by proficiency.
    #[serde(default)]
    pub cost_curve: Option<CurveSpec>,
    /// Success probability by proficiency.
    #[serde(default)]
    pub success_curve: Option<CurveSpec>,
    /// Share of the cost spent on failure, in `[0, 1]`.
    #[serde(default = "default_failure_cost_multiplier")]
    pub failure_cost_multiplier: f64,
    /// Damage formula.
    pub damage: DamageFormula,
    /// Present for charged techniques.
    #[serde(default)]
    pub charge: Option<ChargeSpec>,
}

impl TechniqueDefinition {
    /// Geometry parameters for the targeting resolver.
    pub const fn shape(&self) -> ShapeParams {
        ShapeParams {
            range: self.range,
            aoe_radius: self.aoe_radius,
            piercing: self.piercing,
        }
    }

    /// Whether `mode` is an allowed aim.
    pub fn allows(&self, mode: AimMode) -> bool {
        self.aim_modes.contains(&mode)
    }

    /// Check the definition for configuration errors.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::Config`] for a broken curve, an empty aim
    /// list, a zero mitigation divisor, a failure multiplier outside
    /// `[0, 1]`, a non-finite stat multiplier or a zero charge time.
    pub fn validate(&self) -> Result<(), CombatError> {
        let config = |reason: &str| CombatError::Config {
            technique: self.code.clone(),
            reason: reason.to_owned(),
        };
        ProficiencyCurve::resolve(self.cost_curve.as_ref(), &self.code, "cost")?;
        ProficiencyCurve::resolve(self.success_curve.as_ref(), &self.code, "success")?;
        ProficiencyCurve::resolve(self.damage.curve.as_ref(), &self.code, "damage")?;
        if self.aim_modes.is_empty() {
            return Err(config("no aim modes"));
        }
        if self.damage.mitigation_divisor == 0 {
            return Err(config("mitigation divisor must be positive"));
        }
        if !(0.0..=1.0).contains(&self.failure_cost_multiplier) {
            return Err(config("failure cost multiplier must be within [0, 1]"));
        }
        if !self.damage.stat_multiplier.is_finite() || self.damage.stat_multiplier < 0.0 {
            return Err(config("stat multiplier must be finite and non-negative"));
        }
        if self.charge.is_some_and(|charge| charge.charge_ticks == 0) {
            return Err(config("charge time must be positive"));
        }
        Ok(())
    }
}

/// Immutable set of techniques keyed by code.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Vec<TechniqueDefinition>")]
pub struct TechniqueCatalog {
    /// Definitions by code.
    defs: BTreeMap<String, TechniqueDefinition>,
}

impl TechniqueCatalog {
    /// Build a catalog, validating every definition.
    ///
    /// # Errors
    ///
    /// Returns the first [`CombatError::Config`] found.
    pub fn new(defs: impl IntoIterator<Item = TechniqueDefinition>) -> Result<Self, CombatError> {
        let defs: BTreeMap<String, TechniqueDefinition> =
            defs.into_iter().map(|def| (def.code.clone(), def)).collect();
        for def in defs.values() {
            def.validate()?;
        }
        Ok(Self { defs })
    }

    /// Look up a technique.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::UnknownTechnique`] for an unknown code.
    pub fn get(&self, code: &str) -> Result<&TechniqueDefinition, CombatError> {
        self.defs
            .get(code)
            .ok_or_else(|| CombatError::UnknownTechnique(code.to_owned()))
    }

    /// All definitions in code order.
    pub fn iter(&self) -> impl Iterator<Item = &TechniqueDefinition> {
        self.defs.values()
    }

    /// Number of techniques.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl TryFrom<Vec<TechniqueDefinition>> for TechniqueCatalog {
    type Error = CombatError;

    fn try_from(defs: Vec<TechniqueDefinition>) -> Result<Self, Self::Error> {
        Self::new(defs)
    }
}

/// What happened when a technique was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Not enough ki; nothing was spent.
    InsufficientKi {
        /// Ki the user has.
        available: u32,
        /// Ki the technique needs.
        required: u32,
    },
    /// The roll failed; part of the cost was spent.
    Failed {
        /// Ki spent.
        ki_spent: u32,
    },
    /// The technique landed; resolve targets and apply damage.
    Succeeded {
        /// Ki spent.
        ki_spent: u32,
    },
    /// A charged technique began charging; full cost spent.
    ChargeStarted {
        /// Ki spent.
        ki_spent: u32,
        /// Ticks until release.
        ticks: u32,
    },
}

impl AttemptOutcome {
    /// Ki consumed by this outcome.
    pub const fn ki_spent(&self) -> u32 {
        match *self {
            Self::InsufficientKi { .. } => 0,
            Self::Failed { ki_spent }
            | Self::Succeeded { ki_spent }
            | Self::ChargeStarted { ki_spent, .. } => ki_spent,
        }
    }
}

/// Ki cost at `proficiency`.
///
/// # Errors
///
/// Returns [`CombatError::Config`] for a broken cost curve.
pub fn effective_cost(def: &TechniqueDefinition, proficiency: u8) -> Result<u32, CombatError> {
    let curve = ProficiencyCurve::resolve(def.cost_curve.as_ref(), &def.code, "cost")?;
    Ok(ceil_scaled(def.base_cost, curve.value_at(proficiency)))
}

/// Success probability at `proficiency`, clamped to `[0, 1]`.
///
/// # Errors
///
/// Returns [`CombatError::Config`] for a broken success curve.
pub fn success_probability(def: &TechniqueDefinition, proficiency: u8) -> Result<f64, CombatError> {
    let curve = ProficiencyCurve::resolve(def.success_curve.as_ref(), &def.code, "success")?;
    Ok(curve.value_at(proficiency).clamp(0.0, 1.0))
}

/// Ki spent when a technique costing `cost` fails.
pub fn failure_cost(def: &TechniqueDefinition, cost: u32) -> u32 {
    floor_scaled(cost, def.failure_cost_multiplier)
}

/// Attempt a technique with `available_ki`.
///
/// Charged techniques skip the roll here; it happens on release through
/// [`release_succeeds`].
///
/// # Errors
///
/// Returns [`CombatError::Config`] for a broken curve.
pub fn attempt(
    def: &TechniqueDefinition,
    proficiency: u8,
    available_ki: u32,
    roll: SuccessRoll<'_>,
) -> Result<AttemptOutcome, CombatError> {
    let cost = effective_cost(def, proficiency)?;
    if available_ki < cost {
        return Ok(AttemptOutcome::InsufficientKi {
            available: available_ki,
            required: cost,
        });
    }
    if let Some(charge) = def.charge {
        return Ok(AttemptOutcome::ChargeStarted {
            ki_spent: cost,
            ticks: charge.charge_ticks,
        });
    }
    if roll.succeeds(success_probability(def, proficiency)?) {
        Ok(AttemptOutcome::Succeeded { ki_spent: cost })
    } else {
        Ok(AttemptOutcome::Failed {
            ki_spent: failure_cost(def, cost),
        })
    }
}

/// Roll for a charged technique reaching release.
///
/// # Errors
///
/// Returns [`CombatError::Config`] for a broken success curve.
pub fn release_succeeds(
    def: &TechniqueDefinition,
    proficiency: u8,
    roll: SuccessRoll<'_>,
) -> Result<bool, CombatError> {
    Ok(roll.succeeds(success_probability(def, proficiency)?))
}

/// Damage a successful technique deals to one defender.
///
/// # Errors
///
/// Returns [`CombatError::Config`] for a broken damage curve or a zero
/// mitigation divisor.
pub fn technique_damage(
    def: &TechniqueDefinition,
    proficiency: u8,
    attacker: &CoreAttributes,
    defender: &CoreAttributes,
) -> Result<u32, CombatError> {
    let formula = &def.damage;
    let curve = ProficiencyCurve::resolve(formula.curve.as_ref(), &def.code, "damage")?;
    let scaled_stat = floor_scaled(attacker.get(formula.stat), formula.stat_multiplier);
    let raw = floor_scaled(formula.base.saturating_add(scaled_stat), curve.value_at(proficiency));
    let mitigation = defender
        .get(formula.mitigation_stat)
        .checked_div(formula.mitigation_divisor)
        .ok_or_else(|| CombatError::Config {
            technique: def.code.clone(),
            reason: String::from("mitigation divisor must be positive"),
        })?;
    Ok(raw.saturating_sub(mitigation).max(formula.min_damage))
}

/// Unarmed strike damage: `max(1, str + speed/2 - dur/2)`.
pub const fn melee_damage(attacker: &CoreAttributes, defender: &CoreAttributes) -> u32 {
    let offense = attacker.strength.saturating_add(attacker.speed / 2);
    let damage = offense.saturating_sub(defender.durability / 2);
    if damage == 0 { 1 } else { damage }
}
