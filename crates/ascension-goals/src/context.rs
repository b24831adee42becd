//! Read-only world snapshot handed to every goal handler for a day.

use std::collections::BTreeMap;

use ascension_types::{CharacterId, Coord, SettlementId};

/// What a handler knows about one dojo.
#[derive(Debug, Clone, PartialEq)]
pub struct DojoInfo {
    /// Training multiplier for students on the tile.
    pub multiplier: f64,
    /// One-off fee for training there.
    pub fee: u64,
    /// Current master, if claimed.
    pub master: Option<CharacterId>,
}

/// Snapshot of the tiles and buildings handlers care about.
///
/// Assembled once per day by the orchestrator; handlers only read it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoalContext {
    /// Dojos by tile.
    pub dojos: BTreeMap<Coord, DojoInfo>,
    /// Settlement tiles.
    pub settlements: BTreeMap<Coord, SettlementId>,
    /// Building under construction, by settlement tile.
    pub active_projects: BTreeMap<Coord, String>,
    /// Building levels by settlement tile, then building code.
    pub building_levels: BTreeMap<Coord, BTreeMap<String, u32>>,
}

impl GoalContext {
    /// The dojo closest to `from`.
    pub fn nearest_dojo(&self, from: Coord) -> Option<Coord> {
        nearest(self.dojos.keys().copied(), from)
    }

    /// The settlement closest to `from` that has no project under way.
    pub fn nearest_idle_settlement(&self, from: Coord) -> Option<Coord> {
        nearest(
            self.settlements
                .keys()
                .copied()
                .filter(|tile| !self.active_projects.contains_key(tile)),
            from,
        )
    }

    /// The lowest-level building at a settlement tile (ties by code).
    pub fn lowest_building(&self, tile: Coord) -> Option<&str> {
        self.building_levels
            .get(&tile)?
            .iter()
            .min_by_key(|(code, level)| (**level, code.as_str()))
            .map(|(code, _)| code.as_str())
    }
}

/// The tile nearest `from` by Manhattan distance, ties to lowest x then y.
pub fn nearest(tiles: impl IntoIterator<Item = Coord>, from: Coord) -> Option<Coord> {
    tiles
        .into_iter()
        .min_by_key(|tile| (from.manhattan(*tile), *tile))
}
