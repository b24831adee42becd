//! Transformation lifecycle: activation, drain, exhaustion, recovery.
//!
//! ```text
//! none --activate--> active --deactivate--> exhausted --recover_day (xN)--> none
//! ```
//!
//! Every transition is a pure function from one [`TransformationState`] to
//! the next; callers store the returned value. The invariant that a
//! character is never both transformed and exhausted is upheld by
//! construction: [`activate`] refuses while exhausted, and [`deactivate`]
//! clears the active code before setting exhaustion.

use std::collections::BTreeMap;

use ascension_types::{CoreAttributes, Rounding, TransformationState};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CharacterError;

/// Attribute multiplier applied while a character is exhausted.
pub const EXHAUSTION_PENALTY: f64 = 0.8;

/// Catalog entry describing one transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationDef {
    /// Unique code, e.g. `kaioken`.
    pub code: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Attribute multiplier while active. Must be finite and positive.
    pub multiplier: f64,
    /// Ki drained every combat tick while active.
    #[serde(default)]
    pub ki_drain_per_tick: u32,
    /// Ticks after which the form drops on its own.
    #[serde(default)]
    pub max_ticks: Option<u32>,
    /// Days of exhaustion after the form ends.
    #[serde(default)]
    pub exhaustion_days: u32,
}

/// Immutable set of transformation definitions keyed by code.
///
/// Deserializes from a list of definitions and validates on the way in.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Vec<TransformationDef>")]
pub struct TransformationCatalog {
    /// Definitions by code.
    defs: BTreeMap<String, TransformationDef>,
}

impl TransformationCatalog {
    /// Build a catalog, validating every definition.
    ///
    /// # Errors
    ///
    /// Returns [`CharacterError::InvalidTransformation`] if a multiplier is
    /// not a positive finite number.
    pub fn new(defs: impl IntoIterator<Item = TransformationDef>) -> Result<Self, CharacterError> {
        let catalog = Self {
            defs: defs.into_iter().map(|def| (def.code.clone(), def)).collect(),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check every definition.
    ///
    /// # Errors
    ///
    /// Returns [`CharacterError::InvalidTransformation`] on the first bad
    /// multiplier.
    pub fn validate(&self) -> Result<(), CharacterError> {
        for def in self.defs.values() {
            if !def.multiplier.is_finite() || def.multiplier <= 0.0 {
                return Err(CharacterError::InvalidTransformation {
                    code: def.code.clone(),
                    reason: format!("multiplier {} must be positive", def.multiplier),
                });
            }
        }
        Ok(())
    }

    /// Look up a definition.
    ///
    /// # Errors
    ///
    /// Returns [`CharacterError::UnknownTransformation`] for an unknown code.
    pub fn get(&self, code: &str) -> Result<&TransformationDef, CharacterError> {
        self.defs
            .get(code)
            .ok_or_else(|| CharacterError::UnknownTransformation(code.to_owned()))
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl TryFrom<Vec<TransformationDef>> for TransformationCatalog {
    type Error = CharacterError;

    fn try_from(defs: Vec<TransformationDef>) -> Result<Self, Self::Error> {
        Self::new(defs)
    }
}

/// Result of advancing an active transformation by one combat tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationTick {
    /// State after the tick.
    pub state: TransformationState,
    /// Ki to drain from the character's pool this tick.
    pub ki_drain: u32,
    /// Whether the form dropped because `max_ticks` was reached.
    pub expired: bool,
}

/// Enter a transformation.
///
/// # Errors
///
/// Returns [`CharacterError::TransformationUnavailable`] if a form is
/// already active or the character is still exhausted.
pub fn activate(
    state: &TransformationState,
    def: &TransformationDef,
) -> Result<TransformationState, CharacterError> {
    if let Some(active) = &state.active {
        return Err(CharacterError::TransformationUnavailable {
            code: def.code.clone(),
            reason: format!("{active} is already active"),
        });
    }
    if state.is_exhausted() {
        return Err(CharacterError::TransformationUnavailable {
            code: def.code.clone(),
            reason: format!("exhausted for {} more day(s)", state.exhaustion_days_remaining),
        });
    }
    debug!(code = %def.code, "transformation activated");
    Ok(TransformationState {
        active: Some(def.code.clone()),
        ticks_since_activation: 0,
        exhaustion_days_remaining: 0,
    })
}

/// Leave the active transformation, entering exhaustion.
///
/// A state with no active form is returned unchanged.
///
/// # Errors
///
/// Returns [`CharacterError::UnknownTransformation`] if the active code is
/// not in the catalog.
pub fn deactivate(
    state: &TransformationState,
    catalog: &TransformationCatalog,
) -> Result<TransformationState, CharacterError> {
    let Some(active) = &state.active else {
        return Ok(state.clone());
    };
    let def = catalog.get(active)?;
    debug!(code = %def.code, exhaustion_days = def.exhaustion_days, "transformation ended");
    Ok(TransformationState {
        active: None,
        ticks_since_activation: 0,
        exhaustion_days_remaining: def.exhaustion_days,
    })
}

/// Advance an active transformation by one combat tick.
///
/// Inactive states pass through untouched with zero drain.
///
/// # Errors
///
/// Returns [`CharacterError::UnknownTransformation`] if the active code is
/// not in the catalog.
pub fn tick(
    state: &TransformationState,
    catalog: &TransformationCatalog,
) -> Result<TransformationTick, CharacterError> {
    let Some(active) = &state.active else {
        return Ok(TransformationTick {
            state: state.clone(),
            ki_drain: 0,
            expired: false,
        });
    };
    let def = catalog.get(active)?;
    let ticks = state.ticks_since_activation.saturating_add(1);

    if def.max_ticks.is_some_and(|max| ticks >= max) {
        let ended = deactivate(state, catalog)?;
        return Ok(TransformationTick {
            state: ended,
            ki_drain: def.ki_drain_per_tick,
            expired: true,
        });
    }

    Ok(TransformationTick {
        state: TransformationState {
            active: Some(active.clone()),
            ticks_since_activation: ticks,
            exhaustion_days_remaining: 0,
        },
        ki_drain: def.ki_drain_per_tick,
        expired: false,
    })
}

/// Apply one day of recovery.
pub fn recover_day(state: &TransformationState) -> TransformationState {
    TransformationState {
        active: state.active.clone(),
        ticks_since_activation: state.ticks_since_activation,
        exhaustion_days_remaining: state.exhaustion_days_remaining.saturating_sub(1),
    }
}

/// Attributes after transformation or exhaustion scaling.
///
/// # Errors
///
/// Returns [`CharacterError::UnknownTransformation`] if the active code is
/// not in the catalog.
pub fn effective_attributes(
    base: &CoreAttributes,
    state: &TransformationState,
    catalog: &TransformationCatalog,
) -> Result<CoreAttributes, CharacterError> {
    if let Some(active) = &state.active {
        let def = catalog.get(active)?;
        return Ok(base.scaled(def.multiplier, Rounding::Floor));
    }
    if state.is_exhausted() {
        return Ok(base.scaled(EXHAUSTION_PENALTY, Rounding::Floor));
    }
    Ok(*base)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn kaioken() -> TransformationDef {
        TransformationDef {
            code: String::from("kaioken"),
            name: String::from("Kaioken"),
            multiplier: 2.0,
            ki_drain_per_tick: 3,
            max_ticks: Some(3),
            exhaustion_days: 2,
        }
    }

    fn catalog() -> TransformationCatalog {
        TransformationCatalog::new([kaioken()]).unwrap()
    }

    #[test]
    fn full_lifecycle() {
        let catalog = catalog();
        let none = TransformationState::default();

        let active = activate(&none, &kaioken()).unwrap();
        assert!(active.is_active());
        assert!(!active.is_exhausted());

        let exhausted = deactivate(&active, &catalog).unwrap();
        assert!(!exhausted.is_active());
        assert_eq!(exhausted.exhaustion_days_remaining, 2);

        let day1 = recover_day(&exhausted);
        assert!(day1.is_exhausted());
        let day2 = recover_day(&day1);
        assert_eq!(day2, TransformationState::default());
    }

    #[test]
    fn cannot_activate_while_exhausted_or_active() {
        let exhausted = TransformationState {
            active: None,
            ticks_since_activation: 0,
            exhaustion_days_remaining: 1,
        };
        assert!(activate(&exhausted, &kaioken()).is_err());

        let active = activate(&TransformationState::default(), &kaioken()).unwrap();
        assert!(activate(&active, &kaioken()).is_err());
    }

    #[test]
    fn tick_drains_and_expires() {
        let catalog = catalog();
        let mut state = activate(&TransformationState::default(), &kaioken()).unwrap();

        let first = tick(&state, &catalog).unwrap();
        assert_eq!(first.ki_drain, 3);
        assert!(!first.expired);
        state = first.state;

        let second = tick(&state, &catalog).unwrap();
        assert!(!second.expired);
        state = second.state;

        let third = tick(&state, &catalog).unwrap();
        assert!(third.expired);
        assert!(!third.state.is_active());
        assert_eq!(third.state.exhaustion_days_remaining, 2);
    }

    #[test]
    fn effective_attributes_scale() {
        let catalog = catalog();
        let base = CoreAttributes::uniform(10);

        let plain = effective_attributes(&base, &TransformationState::default(), &catalog).unwrap();
        assert_eq!(plain, base);

        let active = activate(&TransformationState::default(), &kaioken()).unwrap();
        let boosted = effective_attributes(&base, &active, &catalog).unwrap();
        assert_eq!(boosted.strength, 20);

        let exhausted = deactivate(&active, &catalog).unwrap();
        let tired = effective_attributes(&base, &exhausted, &catalog).unwrap();
        assert_eq!(tired.strength, 8);
    }

    #[test]
    fn zero_exhaustion_returns_to_none() {
        let mut def = kaioken();
        def.exhaustion_days = 0;
        let catalog = TransformationCatalog::new([def.clone()]).unwrap();
        let active = activate(&TransformationState::default(), &def).unwrap();
        assert_eq!(
            deactivate(&active, &catalog).unwrap(),
            TransformationState::default()
        );
    }

    #[test]
    fn invalid_multiplier_rejected() {
        let mut def = kaioken();
        def.multiplier = 0.0;
        assert!(TransformationCatalog::new([def]).is_err());
    }

    #[test]
    fn catalog_deserializes_from_list() {
        let json = r#"[{"code": "kaioken", "multiplier": 1.5, "exhaustion_days": 1}]"#;
        let catalog: TransformationCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("kaioken").unwrap().exhaustion_days, 1);

        let bad = r#"[{"code": "broken", "multiplier": -1.0}]"#;
        assert!(serde_json::from_str::<TransformationCatalog>(bad).is_err());
    }

    #[test]
    fn unknown_active_code_is_config_error() {
        let state = TransformationState {
            active: Some(String::from("mystery")),
            ticks_since_activation: 0,
            exhaustion_days_remaining: 0,
        };
        let err = effective_attributes(&CoreAttributes::default(), &state, &catalog());
        assert!(matches!(err, Err(CharacterError::UnknownTransformation(_))));
    }
}
