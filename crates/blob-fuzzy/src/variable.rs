//! Linguistic variables and fuzzification.
//!
//! A [`LinguisticVariable`] partitions a [`Universe`] into labelled
//! [`Trapezoid`] terms. Fuzzifying a crisp value yields one degree per
//! declared term, zero degrees included.

use std::collections::BTreeMap;

use crate::Label;
use crate::error::{FuzzyError, label};
use crate::membership::Trapezoid;
use crate::universe::Universe;

/// Degrees of membership of one crisp value, keyed by term.
pub type TermDegrees<T> = BTreeMap<T, f64>;

/// How a crisp reading is snapped before fuzzification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quantization {
    /// Use the reading untouched.
    #[default]
    Exact,
    /// Round to the given number of decimals, ties to even.
    Decimals(u8),
}

impl Quantization {
    /// Apply the policy to a reading. Non-finite readings pass through.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Exact => x,
            Self::Decimals(places) => {
                let scale = 10_f64.powi(i32::from(places));
                (x * scale).round_ties_even() / scale
            }
        }
    }
}

/// A named scalar domain partitioned into labelled trapezoid terms.
#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable<T: Label> {
    name: String,
    universe: Universe,
    quantization: Quantization,
    terms: BTreeMap<T, Trapezoid>,
}

impl<T: Label> LinguisticVariable<T> {
    /// Create a variable with no terms and [`Quantization::Exact`].
    pub fn new(name: impl Into<String>, universe: Universe) -> Self {
        Self {
            name: name.into(),
            universe,
            quantization: Quantization::Exact,
            terms: BTreeMap::new(),
        }
    }

    /// Set the quantization policy.
    #[must_use]
    pub const fn with_quantization(mut self, quantization: Quantization) -> Self {
        self.quantization = quantization;
        self
    }

    /// Add a term.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::DuplicateTerm`] if `term` is already declared.
    pub fn with_term(mut self, term: T, shape: Trapezoid) -> Result<Self, FuzzyError> {
        if self.terms.contains_key(&term) {
            return Err(FuzzyError::DuplicateTerm {
                variable: self.name,
                term: label(&term),
            });
        }
        self.terms.insert(term, shape);
        Ok(self)
    }

    /// Add several terms, failing on the first duplicate.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::DuplicateTerm`] if a term repeats.
    pub fn with_terms(
        self,
        terms: impl IntoIterator<Item = (T, Trapezoid)>,
    ) -> Result<Self, FuzzyError> {
        terms
            .into_iter()
            .try_fold(self, |var, (term, shape)| var.with_term(term, shape))
    }

    /// Variable name, used in logs and error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sampling universe.
    pub const fn universe(&self) -> &Universe {
        &self.universe
    }

    /// The quantization policy.
    pub const fn quantization(&self) -> Quantization {
        self.quantization
    }

    /// Look up a term's membership function.
    pub fn term(&self, term: T) -> Option<&Trapezoid> {
        self.terms.get(&term)
    }

    /// Whether `term` is declared.
    pub fn has_term(&self, term: T) -> bool {
        self.terms.contains_key(&term)
    }

    /// Declared terms in label order.
    pub fn terms(&self) -> impl Iterator<Item = (T, &Trapezoid)> {
        self.terms.iter().map(|(t, shape)| (*t, shape))
    }

    /// Number of declared terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Snap a reading with this variable's quantization policy.
    pub fn quantize(&self, x: f64) -> f64 {
        self.quantization.apply(x)
    }

    /// Degree of every declared term at `x`. No clamping, no quantization.
    pub fn fuzzify(&self, x: f64) -> TermDegrees<T> {
        self.terms
            .iter()
            .map(|(term, shape)| (*term, shape.degree(x)))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Level {
        Low,
        Mid,
        High,
    }

    fn speed() -> LinguisticVariable<Level> {
        let universe = Universe::new(0.0, 5.0, 0.05).unwrap();
        LinguisticVariable::new("speed", universe)
            .with_quantization(Quantization::Decimals(1))
            .with_terms([
                (Level::Low, Trapezoid::new(0.0, 0.0, 0.0, 0.4).unwrap()),
                (Level::Mid, Trapezoid::new(0.6, 0.9, 1.2, 2.0).unwrap()),
                (Level::High, Trapezoid::new(1.0, 1.8, 5.0, 5.0).unwrap()),
            ])
            .unwrap()
    }

    #[test]
    fn fuzzify_reports_every_term() {
        let var = speed();
        let degrees = var.fuzzify(0.5);
        assert_eq!(degrees.len(), 3);
        assert!(degrees.values().all(|d| d.abs() < 1e-12));
    }

    #[test]
    fn fuzzify_does_not_clamp() {
        let var = speed();
        let degrees = var.fuzzify(-3.0);
        assert_eq!(degrees.len(), 3);
        assert!(degrees.values().all(|d| d.abs() < 1e-12));
        let far = var.fuzzify(50.0);
        assert!(far.get(&Level::High).copied().unwrap().abs() < 1e-12);
    }

    #[test]
    fn degrees_need_not_sum_to_one() {
        let var = speed();
        let degrees = var.fuzzify(1.1);
        let sum: f64 = degrees.values().sum();
        assert!(sum > 1.0);
    }

    #[test]
    fn duplicate_term_is_rejected() {
        let universe = Universe::new(0.0, 1.0, 0.1).unwrap();
        let shape = Trapezoid::new(0.0, 0.2, 0.4, 0.6).unwrap();
        let result = LinguisticVariable::new("x", universe)
            .with_term(Level::Low, shape)
            .and_then(|v| v.with_term(Level::Low, shape));
        assert!(matches!(result, Err(FuzzyError::DuplicateTerm { .. })));
    }

    #[test]
    fn quantization_rounds_ties_to_even() {
        assert!((Quantization::Decimals(0).apply(12.5) - 12.0).abs() < 1e-12);
        assert!((Quantization::Decimals(0).apply(-12.5) + 12.0).abs() < 1e-12);
        assert!((Quantization::Decimals(0).apply(13.5) - 14.0).abs() < 1e-12);
        assert!((Quantization::Decimals(0).apply(0.5)).abs() < 1e-12);
        assert!((Quantization::Decimals(0).apply(1.5) - 2.0).abs() < 1e-12);
        assert!((Quantization::Decimals(0).apply(12.6) - 13.0).abs() < 1e-12);
        assert!((Quantization::Decimals(1).apply(0.47) - 0.5).abs() < 1e-12);
        assert!((Quantization::Decimals(1).apply(0.72) - 0.7).abs() < 1e-12);
        assert!((Quantization::Exact.apply(0.123_456) - 0.123_456).abs() < 1e-15);
        assert!(Quantization::Decimals(2).apply(f64::NAN).is_nan());
    }
}
