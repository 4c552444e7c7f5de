//! Fuzzy steering controller for Blob Survival agents.
//!
//! Each tick the simulation hands a [`Controller`] the blob's mass, speed,
//! sensing radius, and the number of food items in range. The controller
//! answers with a change to the speed multiplier and a change to the
//! sensing radius, computed by a Mamdani engine over the authored rules.
//!
//! # Modules
//!
//! - [`vocabulary`] -- Input, output, and term identifiers
//! - [`rules`] -- The authored rule list and its variants
//! - [`config`] -- YAML configuration with the sample agent as default
//! - [`controller`] -- The per-tick facade ([`Controller`])
//! - [`error`] -- Error types ([`DriverError`])

pub mod config;
pub mod controller;
pub mod error;
pub mod rules;
pub mod vocabulary;

pub use config::{ConfigError, DriverConfig, FallbackSetting, InputConfig, OutputConfig};
pub use controller::{BlobEngine, Controller, Corrections};
pub use error::DriverError;
pub use rules::RuleSet;
pub use vocabulary::{Adjustment, BlobVocabulary, Input, Level, Output};
