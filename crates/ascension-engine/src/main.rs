//! Simulation binary for Ascension.
//!
//! Wires configuration, catalogs, the seed-world spawner and the
//! simulation clock together and runs the configured number of days.
//!
//! # Usage
//!
//! ```text
//! ascension-engine [CONFIG] [CATALOGS]
//! ```
//!
//! Both paths default to `ascension-config.yaml` and
//! `ascension-catalogs.yaml` in the working directory. A missing config
//! file means defaults; a missing catalog file means the built-in catalogs.
//!
//! # Startup Sequence
//!
//! 1. Load configuration
//! 2. Initialize structured logging (tracing) from the `logging` section
//! 3. Load and validate catalogs against the handler registry
//! 4. Pick the world seed (configured, or drawn and logged)
//! 5. Spawn the seed world
//! 6. Run the day loop
//! 7. Log a summary

mod error;
mod spawner;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ascension_core::config::LoggingConfig;
use ascension_core::{Catalogs, SimulationClock, SimulationConfig, SimulationState};
use ascension_goals::HandlerRegistry;
use ascension_types::{SeededRandomizer, WorldEvent};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Config file read when no path is given.
const DEFAULT_CONFIG_PATH: &str = "ascension-config.yaml";

/// Catalog file read when no path is given.
const DEFAULT_CATALOGS_PATH: &str = "ascension-catalogs.yaml";

/// Catalogs compiled into the binary.
const BUILTIN_CATALOGS: &str = include_str!("../catalogs/default.yaml");

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any startup step or a simulated day fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let catalogs_path = args
        .next()
        .map_or_else(|| PathBuf::from(DEFAULT_CATALOGS_PATH), PathBuf::from);

    // 1. Load configuration.
    let config = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("ascension-engine starting");
    info!(
        path = %config_path.display(),
        from_file = config_path.exists(),
        world_name = %config.world.name,
        width = config.world.width,
        height = config.world.height,
        days = config.world.days,
        "Configuration loaded"
    );

    // 3. Load and validate catalogs.
    let catalogs = load_catalogs(&catalogs_path)?;
    let registry = HandlerRegistry::with_defaults();
    catalogs.validate(&registry).map_err(EngineError::from)?;
    info!(
        life_goals = catalogs.goals.life_goals.len(),
        current_goals = catalogs.goals.current_goals.len(),
        techniques = catalogs.techniques.len(),
        transformations = catalogs.transformations.len(),
        economy = catalogs.economy.is_some(),
        "Catalogs loaded"
    );

    // 4-6. Spawn and run.
    let seed = config.world.seed.unwrap_or_else(rand::random::<u64>);
    info!(seed, "World seed chosen");
    let (state, events) = run(&config, &catalogs, &registry, seed)?;

    // 7. Log results.
    log_summary(&state, &events);
    info!(day = state.world.day, events = events.len(), "ascension-engine shutdown complete");
    Ok(())
}

/// Spawn the seed world from `seed` and run the configured days.
fn run(
    config: &SimulationConfig,
    catalogs: &Catalogs,
    registry: &HandlerRegistry,
    seed: u64,
) -> Result<(SimulationState, Vec<WorldEvent>), EngineError> {
    let mut state = spawner::spawn_world(config, catalogs, &mut StdRng::seed_from_u64(seed))?;
    let clock = SimulationClock::new(catalogs, registry, config)?;
    let mut rng = SeededRandomizer::from_seed(seed);
    info!(days = config.world.days, "Seed world ready, entering day loop");
    let events = clock.advance_days(&mut state, config.world.days, &mut rng)?;
    Ok((state, events))
}

/// Initialize the tracing subscriber; `RUST_LOG` overrides the config.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load the simulation configuration, or defaults when the file is absent.
fn load_config(path: &Path) -> Result<SimulationConfig, EngineError> {
    if path.exists() {
        Ok(SimulationConfig::from_file(path)?)
    } else {
        Ok(SimulationConfig::default())
    }
}

/// Load catalogs, or the built-in set when the file is absent.
fn load_catalogs(path: &Path) -> Result<Catalogs, EngineError> {
    if path.exists() {
        Ok(Catalogs::from_file(path)?)
    } else {
        info!(path = %path.display(), "Catalog file not found, using built-in catalogs");
        Ok(Catalogs::parse(BUILTIN_CATALOGS)?)
    }
}

/// Log event counts by type and a line per character.
fn log_summary(state: &SimulationState, events: &[WorldEvent]) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for event in events {
        let count = counts.entry(event.event_type.as_str()).or_insert(0);
        *count = count.saturating_add(1);
    }
    for (event_type, count) in &counts {
        info!(event_type, count, "Events emitted");
    }

    for character in state.characters.values() {
        let goals = state.goals.get(&character.id);
        info!(
            character = %character.id,
            name = %character.name,
            position = %character.position,
            attribute_total = character.attributes.total(),
            money = character.money,
            life_goal = goals.map_or("-", |g| g.life_goal.as_str()),
            current_goal = goals.and_then(|g| g.current_goal.as_deref()).unwrap_or("-"),
            "Character summary"
        );
    }
    for settlement in state.settlements.values() {
        info!(
            settlement = %settlement.id,
            name = %settlement.name,
            treasury = settlement.treasury,
            buildings = ?settlement.buildings,
            "Settlement summary"
        );
    }
    for dojo in state.dojos.values() {
        info!(position = %dojo.position, master = ?dojo.master, "Dojo summary");
    }
}
