//! The blob controller's closed vocabulary.
//!
//! Four antecedents graded on a four-step [`Level`] scale, and two
//! consequents graded as an [`Adjustment`]. Labels serialize in
//! `snake_case` so configuration files read `very_low`, `delta_speed`, etc.

use std::fmt;

use blob_fuzzy::Vocabulary;
use serde::{Deserialize, Serialize};

/// Readings the simulation supplies every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    /// Blob mass.
    Mass,
    /// Current speed.
    Speed,
    /// Sensing radius.
    Sense,
    /// Food items within the sensing radius.
    Food,
}

impl Input {
    /// Every input, in declaration order.
    pub const ALL: [Self; 4] = [Self::Mass, Self::Speed, Self::Sense, Self::Food];

    /// Configuration key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mass => "mass",
            Self::Speed => "speed",
            Self::Sense => "sense",
            Self::Food => "food",
        }
    }
}

/// Corrections the controller returns every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Output {
    /// Change to the speed multiplier.
    DeltaSpeed,
    /// Change to the sensing radius.
    DeltaSense,
}

impl Output {
    /// Every output, in declaration order.
    pub const ALL: [Self; 2] = [Self::DeltaSpeed, Self::DeltaSense];

    /// Configuration key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeltaSpeed => "delta_speed",
            Self::DeltaSense => "delta_sense",
        }
    }
}

/// Antecedent terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Very low.
    VeryLow,
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
}

/// Consequent terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    /// Decrease.
    Minus,
    /// Hold.
    Zero,
    /// Increase.
    Plus,
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marker binding the blob identifiers to the generic engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobVocabulary;

impl Vocabulary for BlobVocabulary {
    type Input = Input;
    type InputTerm = Level;
    type Output = Output;
    type OutputTerm = Adjustment;
}
