//! Controller configuration.
//!
//! [`DriverConfig`] mirrors the `driver` section of `blob-config.yaml`:
//! one block per variable (universe, quantization, term breakpoints), one
//! block per output (universe, fallback, term breakpoints), and the rule set
//! variant. Every block defaults to the sample agent, so an empty document
//! reproduces the original controller exactly.
//!
//! Values are kept raw here and validated in [`DriverConfig::build_engine`],
//! which is where a malformed trapezoid or universe fails.
//!
//! ```yaml
//! rule_set: full
//! mass:
//!   universe: { min: 0, max: 100, step: 1 }
//!   decimals: 0
//!   terms:
//!     very_low: [0, 0, 3, 8]
//!     low: [5, 8, 10, 15]
//!     medium: [12, 16, 20, 28]
//!     high: [25, 30, 100, 100]
//! delta_speed:
//!   universe: { min: -0.1, max: 0.1, step: 0.001 }
//!   fallback: 0.0
//!   terms:
//!     minus: [-0.1, -0.1, -0.1, 0]
//!     zero: [-0.025, -0.01, 0.01, 0.025]
//!     plus: [0, 0.1, 0.1, 0.1]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use blob_fuzzy::{
    Fallback, FuzzyError, InferenceEngine, Label, LinguisticVariable, Quantization, Trapezoid,
    Universe, UniverseSpec,
};
use serde::{Deserialize, Serialize};

use crate::rules::{RuleSet, rules};
use crate::vocabulary::{Adjustment, BlobVocabulary, Input, Level, Output};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The file content is not valid YAML or does not match the schema.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML error.
        #[from]
        source: serde_yml::Error,
    },
}

/// Breakpoints `[a, b, c, d]` of one term.
pub type Breakpoints = [f64; 4];

/// One antecedent variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    /// Sampling universe.
    pub universe: UniverseSpec,

    /// Round readings to this many decimals before fuzzifying; absent means
    /// readings are used as given.
    #[serde(default)]
    pub decimals: Option<u8>,

    /// Term breakpoints.
    pub terms: BTreeMap<Level, Breakpoints>,
}

/// What an output yields when no rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FallbackSetting {
    /// A fixed value, e.g. `fallback: 0.0`.
    Constant(f64),
    /// A named policy, e.g. `fallback: midpoint`.
    Named(NamedFallback),
}

/// Named fallback policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedFallback {
    /// Midpoint of the output universe.
    Midpoint,
}

impl Default for FallbackSetting {
    fn default() -> Self {
        Self::Constant(0.0)
    }
}

impl From<FallbackSetting> for Fallback {
    fn from(setting: FallbackSetting) -> Self {
        match setting {
            FallbackSetting::Constant(v) => Self::Constant(v),
            FallbackSetting::Named(NamedFallback::Midpoint) => Self::Midpoint,
        }
    }
}

/// One consequent variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Sampling universe for centroid integration.
    pub universe: UniverseSpec,

    /// Value used when no rule fires for this output.
    #[serde(default)]
    pub fallback: FallbackSetting,

    /// Term breakpoints.
    pub terms: BTreeMap<Adjustment, Breakpoints>,
}

/// Full controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    /// Which authored rule list to load.
    #[serde(default)]
    pub rule_set: RuleSet,

    /// Blob mass.
    #[serde(default = "default_mass")]
    pub mass: InputConfig,

    /// Blob speed.
    #[serde(default = "default_speed")]
    pub speed: InputConfig,

    /// Sensing radius.
    #[serde(default = "default_sense")]
    pub sense: InputConfig,

    /// Food items in range.
    #[serde(default = "default_food")]
    pub food: InputConfig,

    /// Speed multiplier correction.
    #[serde(default = "default_delta_speed")]
    pub delta_speed: OutputConfig,

    /// Sensing radius correction.
    #[serde(default = "default_delta_sense")]
    pub delta_sense: OutputConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            rule_set: RuleSet::default(),
            mass: default_mass(),
            speed: default_speed(),
            sense: default_sense(),
            food: default_food(),
            delta_speed: default_delta_speed(),
            delta_sense: default_delta_sense(),
        }
    }
}

impl DriverConfig {
    /// Load configuration from a YAML file.
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

    /// Configuration block of one input.
    pub const fn input(&self, input: Input) -> &InputConfig {
        match input {
            Input::Mass => &self.mass,
            Input::Speed => &self.speed,
            Input::Sense => &self.sense,
            Input::Food => &self.food,
        }
    }

    /// Configuration block of one output.
    pub const fn output(&self, output: Output) -> &OutputConfig {
        match output {
            Output::DeltaSpeed => &self.delta_speed,
            Output::DeltaSense => &self.delta_sense,
        }
    }

    /// Validate every block and build the inference engine.
    ///
    /// # Errors
    ///
    /// Returns the first [`FuzzyError`] found: a malformed universe or
    /// trapezoid, a variable without terms, or a rule that references a
    /// term the configuration does not declare.
    pub fn build_engine(&self) -> Result<InferenceEngine<BlobVocabulary>, FuzzyError> {
        let mut builder = InferenceEngine::builder();

        for input in Input::ALL {
            let cfg = self.input(input);
            let quantization = cfg.decimals.map_or(Quantization::Exact, Quantization::Decimals);
            let variable = variable(input.as_str(), cfg.universe, &cfg.terms)?
                .with_quantization(quantization);
            builder = builder.input(input, variable);
        }

        for output in Output::ALL {
            let cfg = self.output(output);
            let variable = variable(output.as_str(), cfg.universe, &cfg.terms)?;
            builder = builder.output(output, variable, cfg.fallback.into());
        }

        builder.rules(rules(self.rule_set)).build()
    }
}

fn variable<T: Label>(
    name: &str,
    universe: UniverseSpec,
    terms: &BTreeMap<T, Breakpoints>,
) -> Result<LinguisticVariable<T>, FuzzyError> {
    let universe = Universe::try_from(universe)?;
    let shapes = terms
        .iter()
        .map(|(term, points)| Ok((*term, Trapezoid::try_from(*points)?)))
        .collect::<Result<Vec<_>, FuzzyError>>()?;
    LinguisticVariable::new(name, universe).with_terms(shapes)
}

// ---------------------------------------------------------------------------
// Sample agent defaults
// ---------------------------------------------------------------------------

fn levels(
    very_low: Breakpoints,
    low: Breakpoints,
    medium: Breakpoints,
    high: Breakpoints,
) -> BTreeMap<Level, Breakpoints> {
    BTreeMap::from([
        (Level::VeryLow, very_low),
        (Level::Low, low),
        (Level::Medium, medium),
        (Level::High, high),
    ])
}

fn adjustments(
    minus: Breakpoints,
    zero: Breakpoints,
    plus: Breakpoints,
) -> BTreeMap<Adjustment, Breakpoints> {
    BTreeMap::from([
        (Adjustment::Minus, minus),
        (Adjustment::Zero, zero),
        (Adjustment::Plus, plus),
    ])
}

fn default_mass() -> InputConfig {
    InputConfig {
        universe: UniverseSpec {
            min: 0.0,
            max: 100.0,
            step: 1.0,
        },
        decimals: Some(0),
        terms: levels(
            [0.0, 0.0, 3.0, 8.0],
            [5.0, 8.0, 10.0, 15.0],
            [12.0, 16.0, 20.0, 28.0],
            [25.0, 30.0, 100.0, 100.0],
        ),
    }
}

fn default_speed() -> InputConfig {
    InputConfig {
        universe: UniverseSpec {
            min: 0.0,
            max: 5.0,
            step: 0.05,
        },
        decimals: Some(1),
        terms: levels(
            [0.0, 0.0, 0.0, 0.4],
            [0.2, 0.3, 0.4, 0.9],
            [0.6, 0.9, 1.2, 2.0],
            [1.0, 1.8, 5.0, 5.0],
        ),
    }
}

fn default_sense() -> InputConfig {
    InputConfig {
        universe: UniverseSpec {
            min: 0.0,
            max: 700.0,
            step: 1.0,
        },
        decimals: Some(0),
        terms: levels(
            [0.0, 0.0, 0.0, 100.0],
            [50.0, 125.0, 125.0, 150.0],
            [100.0, 150.0, 150.0, 225.0],
            [175.0, 400.0, 700.0, 700.0],
        ),
    }
}

fn default_food() -> InputConfig {
    InputConfig {
        universe: UniverseSpec {
            min: 0.0,
            max: 499.0,
            step: 1.0,
        },
        decimals: None,
        terms: levels(
            [0.0, 0.0, 0.0, 0.0],
            [1.0, 1.0, 2.0, 2.0],
            [2.0, 3.0, 3.0, 4.0],
            [3.0, 5.0, 8.0, 400.0],
        ),
    }
}

fn default_delta_speed() -> OutputConfig {
    OutputConfig {
        universe: UniverseSpec {
            min: -0.1,
            max: 0.1,
            step: 0.001,
        },
        fallback: FallbackSetting::default(),
        terms: adjustments(
            [-0.1, -0.1, -0.1, 0.0],
            [-0.025, -0.01, 0.01, 0.025],
            [0.0, 0.1, 0.1, 0.1],
        ),
    }
}

fn default_delta_sense() -> OutputConfig {
    OutputConfig {
        universe: UniverseSpec {
            min: -2.0,
            max: 2.0,
            step: 0.05,
        },
        fallback: FallbackSetting::default(),
        terms: adjustments([-1.0, -1.0, -1.0, 0.0], [-0.2, 0.0, 0.0, 0.2], [0.0, 1.0, 1.0, 1.0]),
    }
}
