//! Proficiency curves: linear interpolation between mastery 0 and 100.
//!
//! Catalogs describe a curve with an `at0` and an `at100` coefficient.
//! Both endpoints are required; a curve that names only one is a broken
//! deployment and fails at the point of use. A technique that omits a
//! curve altogether gets the identity curve (1.0 at every proficiency).

use serde::{Deserialize, Serialize};

use crate::error::CombatError;

/// Highest proficiency value.
pub const MAX_PROFICIENCY: u8 = 100;

/// Curve endpoints as written in a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurveSpec {
    /// Coefficient at proficiency 0.
    #[serde(default)]
    pub at0: Option<f64>,
    /// Coefficient at proficiency 100.
    #[serde(default)]
    pub at100: Option<f64>,
}

impl CurveSpec {
    /// A fully specified curve.
    pub const fn linear(at0: f64, at100: f64) -> Self {
        Self {
            at0: Some(at0),
            at100: Some(at100),
        }
    }
}

/// A validated curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProficiencyCurve {
    /// Coefficient at proficiency 0.
    at0: f64,
    /// Coefficient at proficiency 100.
    at100: f64,
}

impl ProficiencyCurve {
    /// The curve that is 1.0 everywhere.
    pub const IDENTITY: Self = Self {
        at0: 1.0,
        at100: 1.0,
    };

    /// Validate an optional catalog curve for `technique`.
    ///
    /// `None` yields [`ProficiencyCurve::IDENTITY`].
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::Config`] when an endpoint is missing or not
    /// finite.
    pub fn resolve(
        spec: Option<&CurveSpec>,
        technique: &str,
        curve_name: &str,
    ) -> Result<Self, CombatError> {
        let Some(spec) = spec else {
            return Ok(Self::IDENTITY);
        };
        let (Some(at0), Some(at100)) = (spec.at0, spec.at100) else {
            return Err(CombatError::Config {
                technique: technique.to_owned(),
                reason: format!("{curve_name} curve is missing an endpoint"),
            });
        };
        if !at0.is_finite() || !at100.is_finite() {
            return Err(CombatError::Config {
                technique: technique.to_owned(),
                reason: format!("{curve_name} curve endpoints must be finite"),
            });
        }
        Ok(Self { at0, at100 })
    }

    /// Coefficient at `proficiency` (values above 100 count as 100).
    pub fn value_at(&self, proficiency: u8) -> f64 {
        let p = f64::from(proficiency.min(MAX_PROFICIENCY)) / f64::from(MAX_PROFICIENCY);
        (self.at100 - self.at0).mul_add(p, self.at0)
    }
}

/// `ceil(value * factor)` clamped to `u32`, zero for non-positive products.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn ceil_scaled(value: u32, factor: f64) -> u32 {
    let product = (f64::from(value) * factor).ceil();
    if product.is_nan() || product <= 0.0 {
        0
    } else if product >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        product as u32
    }
}

/// `floor(value * factor)` clamped to `u32`, zero for non-positive products.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn floor_scaled(value: u32, factor: f64) -> u32 {
    let product = (f64::from(value) * factor).floor();
    if product.is_nan() || product <= 0.0 {
        0
    } else if product >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        product as u32
    }
}
