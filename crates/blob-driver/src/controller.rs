//! The steering controller facade.
//!
//! A [`Controller`] wraps one validated inference engine and turns the
//! simulation's four readings into two corrections. It keeps no state
//! between ticks, so any number of controllers may share one engine.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use blob_fuzzy::InferenceEngine;
use tracing::{debug, trace};

use crate::config::DriverConfig;
use crate::error::DriverError;
use crate::vocabulary::{BlobVocabulary, Input, Output};

/// The blob's validated engine.
pub type BlobEngine = InferenceEngine<BlobVocabulary>;

/// Corrections for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corrections {
    /// Amount to add to the speed multiplier.
    pub delta_speed_multiplier: f64,
    /// Amount to add to the sensing radius.
    pub delta_sense: f64,
}

/// Fuzzy steering controller for one blob.
#[derive(Debug, Clone)]
pub struct Controller {
    engine: Arc<BlobEngine>,
}

impl Controller {
    /// Validate `config` and build a controller with its own engine.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Engine`] if the configuration is invalid.
    pub fn new(config: &DriverConfig) -> Result<Self, DriverError> {
        let engine = config.build_engine()?;
        debug!(rule_set = ?config.rule_set, rules = engine.rules().len(), "Controller configured");
        Ok(Self::from_engine(Arc::new(engine)))
    }

    /// Build a controller around an already validated, shared engine.
    pub const fn from_engine(engine: Arc<BlobEngine>) -> Self {
        Self { engine }
    }

    /// The sample agent's controller (default [`DriverConfig`]).
    ///
    /// # Errors
    ///
    /// Same as [`Controller::new`]; the defaults are valid.
    pub fn sample() -> Result<Self, DriverError> {
        Self::new(&DriverConfig::default())
    }

    /// Load a YAML configuration file and build a controller.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Config`] if the file cannot be loaded and
    /// [`DriverError::Engine`] if its content is invalid.
    pub fn from_file(path: &Path) -> Result<Self, DriverError> {
        let config = DriverConfig::from_file(path)?;
        Self::new(&config)
    }

    /// The shared engine, for handing to further controllers.
    pub const fn engine(&self) -> &Arc<BlobEngine> {
        &self.engine
    }

    /// Compute one tick's corrections.
    ///
    /// Readings are quantized per variable (mass and sense to whole units,
    /// speed to one decimal, food count as is) before fuzzification.
    ///
    /// # Errors
    ///
    /// Only contract violations, which a controller built through
    /// [`Controller::new`] does not produce.
    pub fn tick(
        &self,
        mass: f64,
        speed: f64,
        sense: f64,
        food_count: u32,
    ) -> Result<Corrections, DriverError> {
        let readings = BTreeMap::from([
            (Input::Mass, mass),
            (Input::Speed, speed),
            (Input::Sense, sense),
            (Input::Food, f64::from(food_count)),
        ]);

        let inference = self.engine.infer(&readings)?;
        let value = |output: Output| {
            inference
                .value(output)
                .ok_or(DriverError::MissingOutput(output))
        };

        let corrections = Corrections {
            delta_speed_multiplier: value(Output::DeltaSpeed)?,
            delta_sense: value(Output::DeltaSense)?,
        };

        trace!(
            mass,
            speed,
            sense,
            food_count,
            delta_speed = corrections.delta_speed_multiplier,
            delta_sense = corrections.delta_sense,
            "Controller tick"
        );

        Ok(corrections)
    }
}
