//! Configuration loading and typed config structures for the Ascension
//! simulation.
//!
//! Two YAML documents drive a run:
//!
//! - the simulation config ([`SimulationConfig`]): world size and seed,
//!   population, training, combat rules, economy and logging toggles;
//! - the catalogs ([`Catalogs`]): goals, techniques, transformations and
//!   buildings.
//!
//! Every field has a default so a partial (or empty) file is valid.

use std::path::Path;

use ascension_characters::TransformationCatalog;
use ascension_combat::{CombatRules, DEFAULT_LOG_RADIUS, DEFAULT_MAX_ACTIONS, DEFAULT_THRESHOLD, SimulationRules, TechniqueCatalog};
use ascension_goals::{GoalCatalog, HandlerRegistry};
use serde::Deserialize;

use crate::economy::EconomyCatalog;
use crate::error::ClockError;
use crate::growth::DEFAULT_POINTS_PER_DAY;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World name, size, seed and run length.
    #[serde(default)]
    pub world: WorldConfig,

    /// Seed-world population.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Training growth parameters.
    #[serde(default)]
    pub training: TrainingConfig,

    /// Combat rules.
    #[serde(default)]
    pub combat: CombatConfig,

    /// Economy toggle.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// Logging output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// World-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Display name.
    #[serde(default = "default_world_name")]
    pub name: String,
    /// Grid width.
    #[serde(default = "default_world_size")]
    pub width: u32,
    /// Grid height.
    #[serde(default = "default_world_size")]
    pub height: u32,
    /// Randomizer seed; `None` seeds from the operating system.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Days to simulate.
    #[serde(default = "default_days")]
    pub days: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            width: default_world_size(),
            height: default_world_size(),
            seed: None,
            days: default_days(),
        }
    }
}

/// Seed-world population.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Characters to spawn.
    #[serde(default = "default_characters")]
    pub characters: u32,
    /// Archetypes to cycle through; empty uses every catalog archetype.
    #[serde(default)]
    pub archetypes: Vec<String>,
    /// Coins each character starts with.
    #[serde(default = "default_starting_money")]
    pub starting_money: u64,
    /// Dojos to place.
    #[serde(default = "default_dojos")]
    pub dojos: u32,
    /// Settlements to found.
    #[serde(default = "default_settlements")]
    pub settlements: u32,
    /// Starting attribute value.
    #[serde(default = "default_starting_attribute")]
    pub starting_attribute: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            characters: default_characters(),
            archetypes: Vec::new(),
            starting_money: default_starting_money(),
            dojos: default_dojos(),
            settlements: default_settlements(),
            starting_attribute: default_starting_attribute(),
        }
    }
}

/// Training growth parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TrainingConfig {
    /// Attribute points per training day before multipliers.
    #[serde(default = "default_points_per_day")]
    pub points_per_day: u32,
    /// Global intensity; must be positive.
    #[serde(default = "default_intensity")]
    pub intensity: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            points_per_day: default_points_per_day(),
            intensity: default_intensity(),
        }
    }
}

/// Combat rules shared by the live and headless resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CombatConfig {
    /// Radius within which log lines are visible.
    #[serde(default = "default_log_radius")]
    pub log_radius: u32,
    /// Whether techniques hit teammates in headless fights.
    #[serde(default)]
    pub friendly_fire: bool,
    /// Turn cap for headless fights.
    #[serde(default = "default_max_actions")]
    pub max_actions: u32,
    /// Initiative threshold.
    #[serde(default = "default_threshold")]
    pub threshold: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            log_radius: default_log_radius(),
            friendly_fire: false,
            max_actions: default_max_actions(),
            threshold: default_threshold(),
        }
    }
}

impl CombatConfig {
    /// Rules for the headless resolver.
    pub const fn simulation_rules(&self) -> SimulationRules {
        SimulationRules {
            friendly_fire: self.friendly_fire,
            max_actions: self.max_actions,
            threshold: self.threshold,
        }
    }

    /// Rules for the live resolver.
    pub const fn live_rules(&self) -> CombatRules {
        CombatRules {
            log_radius: self.log_radius,
        }
    }
}

/// Economy toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EconomyConfig {
    /// Run the settlement economy pass (requires a building catalog).
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Logging output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

/// Every catalog a run consumes, loaded from one YAML document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Catalogs {
    /// Goal definitions and transitions.
    #[serde(default)]
    pub goals: GoalCatalog,
    /// Technique definitions.
    #[serde(default)]
    pub techniques: TechniqueCatalog,
    /// Transformation definitions.
    #[serde(default)]
    pub transformations: TransformationCatalog,
    /// Building economics; absent disables the economy pass.
    #[serde(default)]
    pub economy: Option<EconomyCatalog>,
}

impl Catalogs {
    /// Load catalogs from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    /// Technique and transformation definitions are validated while
    /// parsing.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse catalogs from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] for malformed YAML or a definition
    /// rejected while parsing.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Cross-check the catalogs against each other and the handlers.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError`] for the first inconsistency.
    pub fn validate(&self, registry: &HandlerRegistry) -> Result<(), ClockError> {
        self.goals.validate()?;
        registry.validate_catalog(&self.goals)?;
        if let Some(economy) = &self.economy {
            economy.validate()?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    String::from("Earth")
}

const fn default_world_size() -> u32 {
    32
}

const fn default_days() -> u64 {
    30
}

const fn default_characters() -> u32 {
    8
}

const fn default_starting_money() -> u64 {
    50
}

const fn default_dojos() -> u32 {
    2
}

const fn default_settlements() -> u32 {
    1
}

const fn default_starting_attribute() -> u32 {
    5
}

const fn default_points_per_day() -> u32 {
    DEFAULT_POINTS_PER_DAY
}

const fn default_intensity() -> f64 {
    1.0
}

const fn default_log_radius() -> u32 {
    DEFAULT_LOG_RADIUS
}

const fn default_max_actions() -> u32 {
    DEFAULT_MAX_ACTIONS
}

const fn default_threshold() -> u32 {
    DEFAULT_THRESHOLD
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = SimulationConfig::parse("").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.world.days, 30);
        assert_eq!(config.combat.threshold, 100);
        assert!(config.economy.enabled);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = SimulationConfig::parse(
            r"
world:
  seed: 42
  days: 5
training:
  intensity: 1.5
combat:
  friendly_fire: true
",
        )
        .unwrap();
        assert_eq!(config.world.seed, Some(42));
        assert_eq!(config.world.width, 32);
        assert!((config.training.intensity - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.training.points_per_day, 3);
        assert!(config.combat.simulation_rules().friendly_fire);
        assert_eq!(config.combat.live_rules().log_radius, 8);
    }

    #[test]
    fn catalogs_parse_and_validate() {
        let catalogs = Catalogs::parse(
            r"
goals:
  life_goals:
    fighter.become_strongest:
      current_goals:
        - { code: goal.train, weight: 1 }
  current_goals:
    goal.train:
      handler: train
techniques:
  - code: ki_blast
    aim_modes: [actor]
    delivery: projectile
    range: 5
    base_cost: 3
    damage: { base: 5, stat: ki_control }
transformations:
  - code: kaioken
    multiplier: 2.0
    ki_drain_per_tick: 5
    exhaustion_days: 2
economy:
  buildings:
    farm: { output_per_level: 1, unit_price: 2, build_days: 3 }
",
        )
        .unwrap();
        assert_eq!(catalogs.techniques.len(), 1);
        assert_eq!(catalogs.transformations.len(), 1);
        catalogs.validate(&HandlerRegistry::with_defaults()).unwrap();
    }

    #[test]
    fn unregistered_handler_fails_validation() {
        let catalogs = Catalogs::parse(
            r"
goals:
  current_goals:
    goal.sing:
      handler: sing
",
        )
        .unwrap();
        assert!(matches!(
            catalogs.validate(&HandlerRegistry::with_defaults()),
            Err(ClockError::Goal { .. })
        ));
    }
}
