//! Target resolution: which actors a technique's geometry reaches.
//!
//! # Delivery shapes
//!
//! - **point** -- the single cell at a point or actor aim within range.
//! - **projectile** -- walks cells along a direction (or toward a point or
//!   actor) up to range and stops at the first occupied cell.
//! - **ray** -- same walk; [`Piercing::First`] keeps only the first hit,
//!   [`Piercing::All`] keeps every occupied cell, nearest first.
//! - **aoe** -- every candidate within Manhattan radius of a center (the
//!   attacker for self aim, otherwise a point or actor within range),
//!   ordered by distance then id.
//!
//! A target out of range, or an aim missing the parameter its mode needs,
//! resolves to an empty list. That is a miss, not an error.

use std::collections::BTreeMap;

use ascension_types::{ActorId, Coord, Direction};
use serde::{Deserialize, Serialize};

/// How a technique is pointed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AimMode {
    /// Centered on the attacker.
    #[serde(rename = "self")]
    SelfAim,
    /// At another actor.
    Actor,
    /// Along a compass direction.
    Direction,
    /// At a grid cell.
    Point,
}

/// Geometry of a technique's effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryShape {
    /// A single cell.
    Point,
    /// Stops at the first occupied cell.
    Projectile,
    /// A line that may pierce.
    Ray,
    /// A Manhattan-radius burst.
    Aoe,
}

/// Whether a ray stops at its first hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Piercing {
    /// Only the first actor hit.
    #[default]
    First,
    /// Every occupied cell on the line.
    All,
}

/// Geometry parameters taken from a technique definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShapeParams {
    /// Maximum cells travelled, or maximum distance to the aimed cell.
    pub range: u32,
    /// Burst radius for [`DeliveryShape::Aoe`].
    pub aoe_radius: u32,
    /// Ray piercing behaviour.
    pub piercing: Piercing,
}

/// A requested aim: a mode plus whichever parameter that mode needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Aim mode.
    pub mode: AimMode,
    /// Target actor for [`AimMode::Actor`].
    #[serde(default)]
    pub actor: Option<ActorId>,
    /// Heading for [`AimMode::Direction`].
    #[serde(default)]
    pub direction: Option<Direction>,
    /// Cell for [`AimMode::Point`].
    #[serde(default)]
    pub point: Option<Coord>,
}

impl TargetSpec {
    /// Aim at the attacker's own position.
    pub const fn self_centered() -> Self {
        Self {
            mode: AimMode::SelfAim,
            actor: None,
            direction: None,
            point: None,
        }
    }

    /// Aim at an actor.
    pub const fn at_actor(actor: ActorId) -> Self {
        Self {
            mode: AimMode::Actor,
            actor: Some(actor),
            direction: None,
            point: None,
        }
    }

    /// Aim along a direction.
    pub const fn toward(direction: Direction) -> Self {
        Self {
            mode: AimMode::Direction,
            actor: None,
            direction: Some(direction),
            point: None,
        }
    }

    /// Aim at a cell.
    pub const fn at_point(point: Coord) -> Self {
        Self {
            mode: AimMode::Point,
            actor: None,
            direction: None,
            point: Some(point),
        }
    }
}

/// A candidate actor and where it stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Positioned {
    /// Actor identifier.
    pub id: ActorId,
    /// Current cell.
    pub position: Coord,
}

/// Resolve the actors hit by a technique fired from `origin`.
///
/// `candidates` should exclude the attacker. The result is ordered as
/// described in the module docs.
pub fn resolve_targets(
    origin: Coord,
    candidates: &[Positioned],
    delivery: DeliveryShape,
    params: ShapeParams,
    aim: &TargetSpec,
) -> Vec<ActorId> {
    let occupants = occupancy(candidates);
    match delivery {
        DeliveryShape::Point => aimed_cell(origin, candidates, aim, params.range)
            .and_then(|cell| occupants.get(&cell).cloned())
            .unwrap_or_default(),
        DeliveryShape::Projectile => path(origin, candidates, aim, params.range)
            .into_iter()
            .find_map(|cell| occupants.get(&cell).cloned())
            .unwrap_or_default(),
        DeliveryShape::Ray => {
            let hits = path(origin, candidates, aim, params.range)
                .into_iter()
                .filter_map(|cell| occupants.get(&cell).cloned())
                .flatten();
            match params.piercing {
                Piercing::First => hits.take(1).collect(),
                Piercing::All => hits.collect(),
            }
        }
        DeliveryShape::Aoe => {
            let center = match aim.mode {
                AimMode::SelfAim => Some(origin),
                _ => aimed_cell(origin, candidates, aim, params.range),
            };
            center.map_or_else(Vec::new, |center| burst(center, candidates, params.aoe_radius))
        }
    }
}

/// Actor ids by cell, each cell's list sorted by id.
fn occupancy(candidates: &[Positioned]) -> BTreeMap<Coord, Vec<ActorId>> {
    let mut cells: BTreeMap<Coord, Vec<ActorId>> = BTreeMap::new();
    for candidate in candidates {
        cells.entry(candidate.position).or_default().push(candidate.id);
    }
    for ids in cells.values_mut() {
        ids.sort_unstable();
    }
    cells
}

/// The cell an actor or point aim designates, if within range.
fn aimed_cell(
    origin: Coord,
    candidates: &[Positioned],
    aim: &TargetSpec,
    range: u32,
) -> Option<Coord> {
    let cell = target_cell(candidates, aim)?;
    (origin.manhattan(cell) <= range).then_some(cell)
}

/// The cell an actor or point aim designates, ignoring range.
fn target_cell(candidates: &[Positioned], aim: &TargetSpec) -> Option<Coord> {
    match aim.mode {
        AimMode::Actor => {
            let actor = aim.actor?;
            candidates
                .iter()
                .find(|candidate| candidate.id == actor)
                .map(|candidate| candidate.position)
        }
        AimMode::Point => aim.point,
        AimMode::SelfAim | AimMode::Direction => None,
    }
}

/// Cells walked by a projectile or ray.
fn path(origin: Coord, candidates: &[Positioned], aim: &TargetSpec, range: u32) -> Vec<Coord> {
    match aim.mode {
        AimMode::Direction => aim
            .direction
            .map_or_else(Vec::new, |direction| origin.walk(direction, range)),
        AimMode::Actor | AimMode::Point => target_cell(candidates, aim)
            .map_or_else(Vec::new, |target| origin.line_toward(target, range)),
        AimMode::SelfAim => Vec::new(),
    }
}

/// Candidates within `radius` of `center`, nearest first, then by id.
fn burst(center: Coord, candidates: &[Positioned], radius: u32) -> Vec<ActorId> {
    let mut hits: Vec<(u32, ActorId)> = candidates
        .iter()
        .map(|candidate| (center.manhattan(candidate.position), candidate.id))
        .filter(|(distance, _)| *distance <= radius)
        .collect();
    hits.sort_unstable();
    hits.into_iter().map(|(_, id)| id).collect()
}
