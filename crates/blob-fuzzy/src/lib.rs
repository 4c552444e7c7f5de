//! Mamdani fuzzy inference engine for the Blob Survival simulation.
//!
//! The engine is generic over a [`Vocabulary`]: a closed set of input
//! variable, input term, output variable, and output term identifiers,
//! normally small `enum`s. Rules are checked against the configured
//! variables once, when the engine is built.
//!
//! # Modules
//!
//! - [`membership`] -- Trapezoidal membership functions ([`Trapezoid`])
//! - [`universe`] -- Discretized universes for centroid integration
//! - [`variable`] -- Linguistic variables, fuzzification, quantization
//! - [`rule`] -- Condition trees, rules, and the rule base
//! - [`defuzz`] -- Centroid defuzzification and fallback policy
//! - [`engine`] -- The validated inference pipeline ([`InferenceEngine`])
//! - [`error`] -- Error types ([`FuzzyError`])

pub mod defuzz;
pub mod engine;
pub mod error;
pub mod membership;
pub mod rule;
pub mod universe;
pub mod variable;

use std::fmt::Debug;

pub use defuzz::{Fallback, centroid, clipped_membership};
pub use engine::{
    Aggregation, Crisp, EngineBuilder, Inference, InferenceEngine, OutputVariable, Snapshot,
};
pub use error::FuzzyError;
pub use membership::Trapezoid;
pub use rule::{Condition, Consequent, Fuzzification, Rule, RuleBase};
pub use universe::{Universe, UniverseSpec};
pub use variable::{LinguisticVariable, Quantization, TermDegrees};

/// An identifier usable as a variable or term label.
pub trait Label: Copy + Ord + Debug + Send + Sync + 'static {}

impl<T: Copy + Ord + Debug + Send + Sync + 'static> Label for T {}

/// The closed set of identifiers an engine works with.
///
/// Implement it on a marker type:
///
/// ```
/// use blob_fuzzy::Vocabulary;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
/// enum Sensor { Temperature }
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
/// enum Level { Low, High }
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
/// enum Actuator { Fan }
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// struct Thermostat;
///
/// impl Vocabulary for Thermostat {
///     type Input = Sensor;
///     type InputTerm = Level;
///     type Output = Actuator;
///     type OutputTerm = Level;
/// }
/// ```
pub trait Vocabulary: Debug + Clone + Copy + PartialEq + Eq + Send + Sync + 'static {
    /// Antecedent variable identifiers.
    type Input: Label;
    /// Terms of antecedent variables.
    type InputTerm: Label;
    /// Consequent variable identifiers.
    type Output: Label;
    /// Terms of consequent variables.
    type OutputTerm: Label;
}
