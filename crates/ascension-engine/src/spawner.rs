//! Seed-world spawner.
//!
//! Builds the day-0 world from the population config: settlements first,
//! then dojos on free tiles, then characters living in the settlements
//! round-robin. The first resident of each settlement leads it. Every
//! random choice comes from the caller's generator, so a seeded run spawns
//! the same world every time.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use ascension_core::config::PopulationConfig;
use ascension_core::{Catalogs, Dojo, Settlement, SimulationConfig, SimulationState};
use ascension_types::{
    AttributeDelta, AttributeKind, Character, CharacterId, Coord, CoreAttributes, SettlementId,
    World, WorldId,
};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::error::EngineError;

// -----------------------------------------------------------------------
// Constants
// -----------------------------------------------------------------------

/// The single world a run simulates.
pub const WORLD_ID: WorldId = WorldId::new(1);

/// Extra points each attribute may roll above the configured base.
const ATTRIBUTE_SPREAD: RangeInclusive<i64> = 0..=2;

/// Dojo multipliers, drawn in tenths.
const DOJO_MULTIPLIER_TENTHS: RangeInclusive<u32> = 15..=25;

/// Dojo fees.
const DOJO_FEE: RangeInclusive<u64> = 0..=10;

/// Starting proficiency in each catalog technique.
const STARTING_PROFICIENCY: RangeInclusive<u8> = 1..=10;

/// Starting settlement treasury.
const STARTING_TREASURY: RangeInclusive<u64> = 20..=60;

/// Starting age in days (16 to 40 years).
const STARTING_AGE_DAYS: RangeInclusive<u32> = 5_840..=14_600;

/// Random draws allowed per site before the map counts as full.
const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

/// Built-in pool of character names, drawn without replacement.
const NAME_POOL: &[&str] = &[
    "Goku", "Krillin", "Yamcha", "Tien", "Chiaotzu", "Launch", "Nam", "Ranfan", "Bacterian",
    "Giran", "Jackie", "Pamput", "Videl", "Upa", "Bora", "Suno", "Eighter", "Lime", "Shu", "Mai",
    "Oolong", "Puar", "Arale", "Senbei", "Gatchan", "Hasky", "Mercenary", "Tao", "Korin", "Popo",
];

/// Built-in pool of settlement names.
const SETTLEMENT_POOL: &[&str] = &[
    "Ginger Town",
    "Pepper Town",
    "Jingle Village",
    "Aru Village",
    "Hope Town",
    "Orange Star",
    "Korin Village",
    "Papaya Island",
];

// -----------------------------------------------------------------------
// Spawning
// -----------------------------------------------------------------------

/// Build the day-0 simulation state.
///
/// # Errors
///
/// Returns [`EngineError::Spawner`] for an empty map or more settlements
/// and dojos than the map has tiles.
pub fn spawn_world<R: Rng + ?Sized>(
    config: &SimulationConfig,
    catalogs: &Catalogs,
    rng: &mut R,
) -> Result<SimulationState, EngineError> {
    let world = World {
        id: WORLD_ID,
        name: config.world.name.clone(),
        day: 0,
        width: config.world.width,
        height: config.world.height,
    };
    if world.width == 0 || world.height == 0 {
        return Err(EngineError::Spawner {
            message: format!("world is {}x{}, nothing can be placed", world.width, world.height),
        });
    }
    let population = &config.population;
    let sites = u64::from(population.settlements).saturating_add(u64::from(population.dojos));
    let area = u64::from(world.width).saturating_mul(u64::from(world.height));
    if sites > area {
        return Err(EngineError::Spawner {
            message: format!("{sites} settlements and dojos do not fit on {area} tiles"),
        });
    }

    let mut state = SimulationState::new(world);
    let mut used = BTreeSet::new();

    for index in 0..population.settlements {
        let position = free_tile(&state.world, &mut used, rng)?;
        let settlement = spawn_settlement(index, position, catalogs, rng);
        debug!(settlement = %settlement.id, name = %settlement.name, %position, "settlement placed");
        state.add_settlement(settlement);
    }

    for _ in 0..population.dojos {
        let position = free_tile(&state.world, &mut used, rng)?;
        let dojo = Dojo {
            position,
            multiplier: f64::from(rng.random_range(DOJO_MULTIPLIER_TENTHS)) / 10.0,
            fee: rng.random_range(DOJO_FEE),
            level: 0,
            master: None,
        };
        debug!(%position, multiplier = dojo.multiplier, fee = dojo.fee, "dojo placed");
        state.add_dojo(dojo);
    }

    let homes: Vec<(SettlementId, Coord)> = state
        .settlements
        .values()
        .map(|settlement| (settlement.id, settlement.position))
        .collect();
    let mut names: Vec<&str> = NAME_POOL.to_vec();
    names.shuffle(rng);
    let mut led = BTreeSet::new();
    let archetypes: Vec<String> = if population.archetypes.is_empty() {
        catalogs.goals.archetypes.keys().cloned().collect()
    } else {
        population.archetypes.clone()
    };

    for index in 0..population.characters {
        let slot = usize::try_from(index).unwrap_or(usize::MAX);
        let home = slot
            .checked_rem(homes.len())
            .and_then(|home| homes.get(home))
            .copied();
        let position = match home {
            Some((_, tile)) => tile,
            None => random_tile(&state.world, rng)?,
        };
        let name = names.get(slot).map(|name| (*name).to_owned());
        let mut character = spawn_character(index, name, position, &archetypes, population, catalogs, rng);
        character.settlement_id = home.map(|(settlement, _)| settlement);
        character.leader = home.is_some_and(|(settlement, _)| led.insert(settlement));
        debug!(
            character = %character.id,
            name = %character.name,
            archetype = ?character.archetype,
            leader = character.leader,
            "character spawned"
        );
        state.add_character(character);
    }

    info!(
        characters = state.characters.len(),
        dojos = state.dojos.len(),
        settlements = state.settlements.len(),
        "Seed world spawned"
    );
    Ok(state)
}

fn spawn_character<R: Rng + ?Sized>(
    index: u32,
    name: Option<String>,
    position: Coord,
    archetypes: &[String],
    population: &PopulationConfig,
    catalogs: &Catalogs,
    rng: &mut R,
) -> Character {
    let id = CharacterId::new(u64::from(index).saturating_add(1));
    let name = name.unwrap_or_else(|| format!("Fighter {id}"));
    let delta = AttributeKind::ALL
        .iter()
        .fold(AttributeDelta::default(), |delta, kind| {
            delta.with(*kind, rng.random_range(ATTRIBUTE_SPREAD))
        });
    let attributes = CoreAttributes::uniform(population.starting_attribute).apply_delta(&delta);

    let mut character = Character::new(id, WORLD_ID, name, position, attributes);
    character.age_days = rng.random_range(STARTING_AGE_DAYS);
    character.money = population.starting_money;
    character.archetype = usize::try_from(index)
        .ok()
        .and_then(|slot| slot.checked_rem(archetypes.len()))
        .and_then(|archetype| archetypes.get(archetype))
        .cloned();
    character.proficiencies = catalogs
        .techniques
        .iter()
        .map(|technique| (technique.code.clone(), rng.random_range(STARTING_PROFICIENCY)))
        .collect();
    character
}

fn spawn_settlement<R: Rng + ?Sized>(
    index: u32,
    position: Coord,
    catalogs: &Catalogs,
    rng: &mut R,
) -> Settlement {
    let id = SettlementId::new(u64::from(index).saturating_add(1));
    let name = usize::try_from(index)
        .ok()
        .and_then(|slot| SETTLEMENT_POOL.get(slot))
        .map_or_else(|| format!("Settlement {id}"), |name| (*name).to_owned());
    // Producing buildings start at level 1 so the treasury has income.
    let buildings: BTreeMap<String, u32> = catalogs
        .economy
        .iter()
        .flat_map(|economy| economy.buildings.iter())
        .map(|(code, def)| (code.clone(), u32::from(def.output_per_level > 0)))
        .collect();
    Settlement {
        id,
        name,
        position,
        treasury: rng.random_range(STARTING_TREASURY),
        buildings,
        project: None,
    }
}

/// A uniformly random tile on the map.
fn random_tile<R: Rng + ?Sized>(world: &World, rng: &mut R) -> Result<Coord, EngineError> {
    let x = rng.random_range(0..world.width);
    let y = rng.random_range(0..world.height);
    match (i32::try_from(x), i32::try_from(y)) {
        (Ok(x), Ok(y)) => Ok(Coord::new(x, y)),
        _ => Err(EngineError::Spawner {
            message: format!("tile ({x}, {y}) is outside the coordinate range"),
        }),
    }
}

/// A random tile nobody has claimed yet, marked as used.
fn free_tile<R: Rng + ?Sized>(
    world: &World,
    used: &mut BTreeSet<Coord>,
    rng: &mut R,
) -> Result<Coord, EngineError> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let tile = random_tile(world, rng)?;
        if used.insert(tile) {
            return Ok(tile);
        }
    }
    Err(EngineError::Spawner {
        message: format!("no free tile found after {MAX_PLACEMENT_ATTEMPTS} attempts"),
    })
}
