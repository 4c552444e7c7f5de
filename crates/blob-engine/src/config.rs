//! Simulation configuration.
//!
//! The canonical configuration lives in `blob-config.yaml`. Every section and
//! every field is optional; missing values fall back to the parameters the
//! original game ran with. The `driver` section is a
//! [`blob_driver::DriverConfig`] and is validated when the controller is built.

use std::path::Path;

use blob_driver::{ConfigError, DriverConfig};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// World size, seed, and run bounds.
    #[serde(default)]
    pub world: WorldConfig,

    /// Food placement and spawning.
    #[serde(default)]
    pub food: FoodConfig,

    /// Blob physiology.
    #[serde(default)]
    pub blob: BlobConfig,

    /// Fuzzy controller configuration.
    #[serde(default)]
    pub driver: DriverConfig,
}

impl SimConfig {
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
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Check the simulation parameters.
    ///
    /// The driver section is not checked here; building the controller
    /// validates it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> Result<(), EngineError> {
        let world = &self.world;
        positive("world.width", world.width)?;
        positive("world.height", world.height)?;

        let food = &self.food;
        if food.max_count == 0 {
            return Err(invalid("food.max_count", "must be at least 1"));
        }
        if food.initial_count > food.max_count {
            return Err(invalid("food.initial_count", "must not exceed food.max_count"));
        }
        if !(0.0..=1.0).contains(&food.spawn_chance) {
            return Err(invalid("food.spawn_chance", "must be within [0, 1]"));
        }
        non_negative("food.energy", food.energy)?;

        let blob = &self.blob;
        if blob.count == 0 {
            return Err(invalid("blob.count", "must be at least 1"));
        }
        positive("blob.initial_mass", blob.initial_mass)?;
        non_negative("blob.initial_sense", blob.initial_sense)?;
        non_negative("blob.initial_speed_multiplier", blob.initial_speed_multiplier)?;
        non_negative("blob.speed_coef", blob.speed_coef)?;
        positive("blob.moving_efficiency", blob.moving_efficiency)?;
        non_negative("blob.sense_energy_multiplier", blob.sense_energy_multiplier)?;
        non_negative("blob.scaling", blob.scaling)?;
        non_negative("blob.hitbox_half_width", blob.hitbox_half_width)?;
        non_negative("blob.hitbox_half_height", blob.hitbox_half_height)?;

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> EngineError {
    EngineError::InvalidParameter {
        field,
        reason: reason.to_owned(),
    }
}

pub(crate) fn positive(field: &'static str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be finite and positive, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be finite and non-negative, got {value}")))
    }
}

/// World configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldConfig {
    /// World width.
    #[serde(default = "default_width")]
    pub width: f64,

    /// World height.
    #[serde(default = "default_height")]
    pub height: f64,

    /// Random seed for food placement and spawning.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Stop after this many ticks.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Log a progress line every this many ticks; 0 disables it.
    #[serde(default = "default_log_interval")]
    pub log_interval: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            seed: default_seed(),
            max_ticks: default_max_ticks(),
            log_interval: default_log_interval(),
        }
    }
}

/// Food configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FoodConfig {
    /// Food items placed before the first tick.
    #[serde(default = "default_food_initial_count")]
    pub initial_count: u32,

    /// Spawn probability drops to zero at this many items.
    #[serde(default = "default_food_max_count")]
    pub max_count: u32,

    /// Per-tick spawn probability with no food on the map.
    #[serde(default = "default_food_spawn_chance")]
    pub spawn_chance: f64,

    /// Mass gained per item eaten.
    #[serde(default = "default_food_energy")]
    pub energy: f64,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            initial_count: default_food_initial_count(),
            max_count: default_food_max_count(),
            spawn_chance: default_food_spawn_chance(),
            energy: default_food_energy(),
        }
    }
}

/// Blob configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlobConfig {
    /// Number of blobs.
    #[serde(default = "default_blob_count")]
    pub count: u32,

    /// Starting mass.
    #[serde(default = "default_blob_initial_mass")]
    pub initial_mass: f64,

    /// Starting sensing radius.
    #[serde(default = "default_blob_initial_sense")]
    pub initial_sense: f64,

    /// Starting speed multiplier.
    #[serde(default = "default_blob_initial_speed_multiplier")]
    pub initial_speed_multiplier: f64,

    /// Speed is `speed_coef * multiplier / mass`.
    #[serde(default = "default_blob_speed_coef")]
    pub speed_coef: f64,

    /// Movement costs `speed^2 * mass / moving_efficiency` per tick.
    #[serde(default = "default_blob_moving_efficiency")]
    pub moving_efficiency: f64,

    /// Sensing costs `sense_energy_multiplier * sense` per tick.
    #[serde(default = "default_blob_sense_energy_multiplier")]
    pub sense_energy_multiplier: f64,

    /// Body scale is `scaling * mass^(1/3)`.
    #[serde(default = "default_blob_scaling")]
    pub scaling: f64,

    /// Hitbox half-width at scale 1.
    #[serde(default = "default_blob_hitbox_half_width")]
    pub hitbox_half_width: f64,

    /// Hitbox half-height at scale 1.
    #[serde(default = "default_blob_hitbox_half_height")]
    pub hitbox_half_height: f64,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            count: default_blob_count(),
            initial_mass: default_blob_initial_mass(),
            initial_sense: default_blob_initial_sense(),
            initial_speed_multiplier: default_blob_initial_speed_multiplier(),
            speed_coef: default_blob_speed_coef(),
            moving_efficiency: default_blob_moving_efficiency(),
            sense_energy_multiplier: default_blob_sense_energy_multiplier(),
            scaling: default_blob_scaling(),
            hitbox_half_width: default_blob_hitbox_half_width(),
            hitbox_half_height: default_blob_hitbox_half_height(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_width() -> f64 {
    1080.0
}

const fn default_height() -> f64 {
    720.0
}

const fn default_seed() -> u64 {
    42
}

const fn default_max_ticks() -> u64 {
    5000
}

const fn default_log_interval() -> u64 {
    500
}

const fn default_food_initial_count() -> u32 {
    10
}

const fn default_food_max_count() -> u32 {
    100
}

const fn default_food_spawn_chance() -> f64 {
    0.012
}

const fn default_food_energy() -> f64 {
    4.0
}

const fn default_blob_count() -> u32 {
    1
}

const fn default_blob_initial_mass() -> f64 {
    20.0
}

const fn default_blob_initial_sense() -> f64 {
    150.0
}

const fn default_blob_initial_speed_multiplier() -> f64 {
    1.0
}

const fn default_blob_speed_coef() -> f64 {
    15.0
}

const fn default_blob_moving_efficiency() -> f64 {
    1000.0
}

const fn default_blob_sense_energy_multiplier() -> f64 {
    0.000_05
}

const fn default_blob_scaling() -> f64 {
    0.1
}

const fn default_blob_hitbox_half_width() -> f64 {
    200.0
}

const fn default_blob_hitbox_half_height() -> f64 {
    300.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use blob_driver::RuleSet;

    use super::*;

    #[test]
    fn empty_yaml_uses_defaults() {
        let config = SimConfig::parse("{}").unwrap();
        assert_eq!(config, SimConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn defaults_match_the_original_game() {
        let config = SimConfig::default();
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.max_ticks, 5000);
        assert_eq!(config.food.initial_count, 10);
        assert_eq!(config.food.max_count, 100);
        assert_eq!(config.blob.count, 1);
        assert!((config.world.width - 1080.0).abs() < f64::EPSILON);
        assert!((config.blob.initial_mass - 20.0).abs() < f64::EPSILON);
        assert!((config.blob.sense_energy_multiplier - 0.000_05).abs() < f64::EPSILON);
        assert_eq!(config.driver, DriverConfig::default());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
world:
  width: 400
  height: 300
  seed: 7
  max_ticks: 100
  log_interval: 0
food:
  initial_count: 3
  max_count: 20
  spawn_chance: 0.5
  energy: 2.5
blob:
  count: 4
  initial_mass: 12
driver:
  rule_set: legacy
";
        let config = SimConfig::parse(yaml).unwrap();
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.log_interval, 0);
        assert_eq!(config.food.max_count, 20);
        assert_eq!(config.blob.count, 4);
        assert!((config.blob.initial_mass - 12.0).abs() < f64::EPSILON);
        assert!((config.blob.speed_coef - 15.0).abs() < f64::EPSILON);
        assert_eq!(config.driver.rule_set, RuleSet::Legacy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(SimConfig::parse("weather: rainy").is_err());
        assert!(SimConfig::parse("blob: { colour: pink }").is_err());
    }

    #[test]
    fn validate_rejects_bad_parameters() {
        let mut config = SimConfig::default();
        config.world.width = 0.0;
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidParameter {
                field: "world.width",
                ..
            })
        ));

        let mut config = SimConfig::default();
        config.food.spawn_chance = 1.5;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.food.initial_count = 101;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.blob.count = 0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.blob.moving_efficiency = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SimConfig::from_file(Path::new("/nonexistent/blob-config.yaml"));
        assert!(matches!(err, Err(ConfigError::Io { .. })));
    }
}
