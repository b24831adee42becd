//! Core entity structs: worlds, characters, and transformation state.
//!
//! These are plain data. The logic that moves them forward lives in the
//! downstream crates (`ascension-characters` for transformations and power,
//! `ascension-core` for daily aging, growth and travel).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attributes::CoreAttributes;
use crate::geometry::Coord;
use crate::ids::{CharacterId, SettlementId, WorldId};

/// A simulated world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    /// World identifier.
    pub id: WorldId,
    /// Human-readable name.
    pub name: String,
    /// Current simulated day (0 before the first day has run).
    pub day: u64,
    /// Grid width in tiles.
    pub width: u32,
    /// Grid height in tiles.
    pub height: u32,
}

impl World {
    /// Whether `coord` lies on this world's grid.
    pub fn contains(&self, coord: Coord) -> bool {
        let inside_x = u32::try_from(coord.x).is_ok_and(|x| x < self.width);
        let inside_y = u32::try_from(coord.y).is_ok_and(|y| y < self.height);
        inside_x && inside_y
    }
}

/// Power-up lifecycle state of one character.
///
/// At most one of `active` and `exhaustion_days_remaining` is set at a
/// time: a character recovering from exhaustion cannot transform.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransformationState {
    /// Code of the active transformation, if any.
    pub active: Option<String>,
    /// Combat ticks elapsed since activation.
    pub ticks_since_activation: u32,
    /// Days of exhaustion left before the character is back to normal.
    pub exhaustion_days_remaining: u32,
}

impl TransformationState {
    /// Whether a transformation is currently active.
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Whether the character is exhausted.
    pub const fn is_exhausted(&self) -> bool {
        self.exhaustion_days_remaining > 0
    }
}

/// A character living in a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Character identifier.
    pub id: CharacterId,
    /// World the character lives in.
    pub world_id: WorldId,
    /// Display name.
    pub name: String,
    /// Age in simulated days.
    pub age_days: u32,
    /// Current tile.
    pub position: Coord,
    /// Base attributes before any transformation.
    pub attributes: CoreAttributes,
    /// Transformation lifecycle.
    #[serde(default)]
    pub transformation: TransformationState,
    /// Tile the character is walking to, if travelling.
    #[serde(default)]
    pub travel_target: Option<Coord>,
    /// NPC archetype key into the catalog's archetype pools.
    #[serde(default)]
    pub archetype: Option<String>,
    /// Whether the character holds a leadership role in its settlement.
    #[serde(default)]
    pub leader: bool,
    /// Settlement the character belongs to.
    #[serde(default)]
    pub settlement_id: Option<SettlementId>,
    /// Technique code to proficiency (0..=100).
    #[serde(default)]
    pub proficiencies: BTreeMap<String, u8>,
    /// Coins carried.
    #[serde(default)]
    pub money: u64,
}

impl Character {
    /// Create a character with default state at `position`.
    pub fn new(
        id: CharacterId,
        world_id: WorldId,
        name: impl Into<String>,
        position: Coord,
        attributes: CoreAttributes,
    ) -> Self {
        Self {
            id,
            world_id,
            name: name.into(),
            age_days: 0,
            position,
            attributes,
            transformation: TransformationState::default(),
            travel_target: None,
            archetype: None,
            leader: false,
            settlement_id: None,
            proficiencies: BTreeMap::new(),
            money: 0,
        }
    }

    /// Proficiency in a technique, 0 when unknown.
    pub fn proficiency(&self, technique: &str) -> u8 {
        self.proficiencies.get(technique).copied().unwrap_or(0)
    }

    /// Whether the character knows a technique at all.
    pub fn knows(&self, technique: &str) -> bool {
        self.proficiencies.contains_key(technique)
    }
}
