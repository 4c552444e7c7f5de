//! Centroid defuzzification.
//!
//! Each output term is clipped at its aggregated degree (Mamdani min
//! implication), the clipped terms are combined pointwise with max, and the
//! centroid of the resulting surface is taken over the universe samples:
//!
//! ```text
//! mu(x)   = max_t min(degree_t, term_t(x))
//! crisp   = sum(x * mu(x)) / sum(mu(x))
//! ```

use crate::Label;
use crate::variable::{LinguisticVariable, TermDegrees};

/// What an output variable yields when no rule fires for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    /// A fixed crisp value.
    Constant(f64),
    /// The midpoint of the variable's universe.
    Midpoint,
}

impl Default for Fallback {
    /// No change: a zero delta.
    fn default() -> Self {
        Self::Constant(0.0)
    }
}

impl Fallback {
    /// Resolve the fallback for a variable.
    pub fn resolve<T: Label>(self, variable: &LinguisticVariable<T>) -> f64 {
        match self {
            Self::Constant(value) => value,
            Self::Midpoint => variable.universe().midpoint(),
        }
    }
}

/// Aggregated membership at `x`: the max over terms of each term's degree
/// clipped at its firing strength. Terms absent from `degrees` count as 0.
pub fn clipped_membership<T: Label>(
    variable: &LinguisticVariable<T>,
    degrees: &TermDegrees<T>,
    x: f64,
) -> f64 {
    variable
        .terms()
        .map(|(term, shape)| {
            let strength = degrees.get(&term).copied().unwrap_or(0.0);
            strength.min(shape.degree(x))
        })
        .fold(0.0, f64::max)
}

/// Centroid of the aggregated surface over the universe samples.
///
/// Returns `None` when the surface has zero area on every sample, i.e. no
/// rule fired for this variable.
pub fn centroid<T: Label>(variable: &LinguisticVariable<T>, degrees: &TermDegrees<T>) -> Option<f64> {
    let (moment, area) = variable
        .universe()
        .samples()
        .fold((0.0_f64, 0.0_f64), |(moment, area), x| {
            let mu = clipped_membership(variable, degrees, x);
            (moment + x * mu, area + mu)
        });

    if area > 0.0 {
        Some(moment / area)
    } else {
        None
    }
}
