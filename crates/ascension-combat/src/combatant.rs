//! Per-encounter fighter state.

use std::cmp::Ordering;

use ascension_characters::{max_hp, max_ki};
use ascension_types::{ActorId, CoreAttributes, TeamId, TransformationState};
use serde::{Deserialize, Serialize};

use crate::targeting::TargetSpec;

/// A charged technique waiting for release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargingTechnique {
    /// Technique code.
    pub code: String,
    /// Aim captured at activation.
    pub target: TargetSpec,
    /// Ticks left before release.
    pub ticks_remaining: u32,
}

/// One fighter's HP, ki, charge and transformation state within a combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    /// Actor this combatant belongs to.
    pub actor: ActorId,
    /// Side the actor fights on.
    pub team: TeamId,
    /// Current hit points.
    pub hp: u32,
    /// Hit points at full health.
    pub max_hp: u32,
    /// Current ki.
    pub ki: u32,
    /// Ki at full reserve.
    pub max_ki: u32,
    /// Whether HP has reached zero.
    pub defeated: bool,
    /// Charged technique in progress.
    pub charging: Option<ChargingTechnique>,
    /// Transformation state, copied back to the character after the fight.
    #[serde(default)]
    pub transformation: TransformationState,
}

impl Combatant {
    /// A fresh combatant at full HP and ki, sized from effective attributes.
    pub const fn new(actor: ActorId, team: TeamId, effective: &CoreAttributes) -> Self {
        let hp = max_hp(effective);
        let ki = max_ki(effective);
        Self {
            actor,
            team,
            hp,
            max_hp: hp,
            ki,
            max_ki: ki,
            defeated: false,
            charging: None,
            transformation: TransformationState {
                active: None,
                ticks_since_activation: 0,
                exhaustion_days_remaining: 0,
            },
        }
    }

    /// Whether the combatant can still act.
    pub const fn is_standing(&self) -> bool {
        !self.defeated
    }

    /// Apply damage. Returns `true` if this hit defeated the combatant.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.defeated {
            return false;
        }
        self.hp = self.hp.saturating_sub(amount);
        if self.hp == 0 {
            self.defeated = true;
            self.charging = None;
            return true;
        }
        false
    }

    /// Spend ki, stopping at zero.
    pub const fn spend_ki(&mut self, amount: u32) {
        self.ki = self.ki.saturating_sub(amount);
    }

    /// Regain ki up to the maximum.
    pub fn regen_ki(&mut self, amount: u32) {
        self.ki = self.ki.saturating_add(amount).min(self.max_ki);
    }

    /// Compare remaining HP fractions without floating point.
    pub fn cmp_hp_fraction(&self, other: &Self) -> Ordering {
        let mine = u64::from(self.hp).saturating_mul(u64::from(other.max_hp));
        let theirs = u64::from(other.hp).saturating_mul(u64::from(self.max_hp));
        mine.cmp(&theirs)
    }
}
