//! The mutable world the clock advances: characters, goal states, dojos,
//! settlements and the event log.
//!
//! Everything is keyed in ordered maps so that iteration order is the
//! ascending id (or coordinate) order the daily loop relies on.

use std::collections::BTreeMap;

use ascension_goals::{DojoInfo, GoalContext, GoalState};
use ascension_types::{Character, CharacterId, Coord, DailyPlan, SettlementId, World};
use serde::{Deserialize, Serialize};

use crate::event_log::EventLog;

/// A dojo on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dojo {
    /// Tile.
    pub position: Coord,
    /// Base training multiplier.
    pub multiplier: f64,
    /// One-off training fee.
    #[serde(default)]
    pub fee: u64,
    /// Dojo building level; each level adds 10% to the multiplier.
    #[serde(default)]
    pub level: u32,
    /// Current master.
    #[serde(default)]
    pub master: Option<CharacterId>,
}

/// A building under construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Building being upgraded.
    pub building: String,
    /// Days of work left.
    pub days_remaining: u32,
}

/// A settlement with a treasury and buildings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Identifier.
    pub id: SettlementId,
    /// Display name.
    pub name: String,
    /// Tile.
    pub position: Coord,
    /// Coins held.
    #[serde(default)]
    pub treasury: u64,
    /// Building code to level.
    #[serde(default)]
    pub buildings: BTreeMap<String, u32>,
    /// Construction under way, if any.
    #[serde(default)]
    pub project: Option<Project>,
}

/// Everything the clock reads and writes.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    /// The world and its current day.
    pub world: World,
    /// Characters by id.
    pub characters: BTreeMap<CharacterId, Character>,
    /// Goal state by character.
    pub goals: BTreeMap<CharacterId, GoalState>,
    /// Yesterday's plan by character; drives today's training.
    pub plans: BTreeMap<CharacterId, DailyPlan>,
    /// Dojos by tile.
    pub dojos: BTreeMap<Coord, Dojo>,
    /// Settlements by id.
    pub settlements: BTreeMap<SettlementId, Settlement>,
    /// Append-only event log.
    pub events: EventLog,
}

impl SimulationState {
    /// An empty world on day 0.
    pub fn new(world: World) -> Self {
        let events = EventLog::new(world.id);
        Self {
            world,
            characters: BTreeMap::new(),
            goals: BTreeMap::new(),
            plans: BTreeMap::new(),
            dojos: BTreeMap::new(),
            settlements: BTreeMap::new(),
            events,
        }
    }

    /// Add a character.
    pub fn add_character(&mut self, character: Character) {
        self.characters.insert(character.id, character);
    }

    /// Add a dojo.
    pub fn add_dojo(&mut self, dojo: Dojo) {
        self.dojos.insert(dojo.position, dojo);
    }

    /// Add a settlement.
    pub fn add_settlement(&mut self, settlement: Settlement) {
        self.settlements.insert(settlement.id, settlement);
    }

    /// Settlement on `tile`, if any.
    pub fn settlement_at(&self, tile: Coord) -> Option<&Settlement> {
        self.settlements.values().find(|s| s.position == tile)
    }

    /// Residents of a settlement in ascending id.
    pub fn residents(&self, settlement: SettlementId) -> Vec<CharacterId> {
        self.characters
            .values()
            .filter(|c| c.settlement_id == Some(settlement))
            .map(|c| c.id)
            .collect()
    }

    /// The read-only snapshot handed to goal handlers.
    pub fn goal_context(&self) -> GoalContext {
        let mut context = GoalContext::default();
        for dojo in self.dojos.values() {
            context.dojos.insert(
                dojo.position,
                DojoInfo {
                    multiplier: crate::growth::dojo_multiplier(dojo.multiplier, dojo.level),
                    fee: dojo.fee,
                    master: dojo.master,
                },
            );
        }
        for settlement in self.settlements.values() {
            context.settlements.insert(settlement.position, settlement.id);
            context
                .building_levels
                .insert(settlement.position, settlement.buildings.clone());
            if let Some(project) = &settlement.project {
                context
                    .active_projects
                    .insert(settlement.position, project.building.clone());
            }
        }
        context
    }
}
