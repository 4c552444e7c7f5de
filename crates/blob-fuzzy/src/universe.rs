//! Discretized universes of discourse.
//!
//! A [`Universe`] only drives centroid integration. Crisp inputs are never
//! clamped against it.

use serde::{Deserialize, Serialize};

use crate::error::FuzzyError;

/// Slack added before flooring the sample count so that `max` itself is
/// sampled despite floating-point error in `(max - min) / step`.
const SAMPLE_SLACK: f64 = 1e-9;

/// Upper bound on samples per universe.
const MAX_SAMPLES: f64 = 10_000_000.0;

/// Raw universe description as it appears in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UniverseSpec {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive when reachable in whole steps).
    pub max: f64,
    /// Distance between consecutive samples.
    pub step: f64,
}

/// An interval `[min, max]` sampled every `step`.
///
/// Samples are `min + i * step` for `i` in `0..len()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Universe {
    min: f64,
    max: f64,
    step: f64,
    len: u32,
}

impl Universe {
    /// Create a universe.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::InvalidUniverse`] if a bound or the step is not
    /// finite, the step is not positive, `min > max`, or the interval would
    /// need more than ten million samples.
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self, FuzzyError> {
        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(FuzzyError::InvalidUniverse {
                reason: format!("bounds and step must be finite (min {min}, max {max}, step {step})"),
            });
        }
        if step <= 0.0 {
            return Err(FuzzyError::InvalidUniverse {
                reason: format!("step must be positive, got {step}"),
            });
        }
        if min > max {
            return Err(FuzzyError::InvalidUniverse {
                reason: format!("min {min} exceeds max {max}"),
            });
        }

        let intervals = ((max - min) / step + SAMPLE_SLACK).floor();
        if intervals >= MAX_SAMPLES {
            return Err(FuzzyError::InvalidUniverse {
                reason: format!("{intervals} intervals exceed the sample limit"),
            });
        }
        // Bounded above by MAX_SAMPLES and non-negative since min <= max.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let len = (intervals as u32).saturating_add(1);

        Ok(Self {
            min,
            max,
            step,
            len,
        })
    }

    /// Lower bound.
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Sampling step.
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// Number of samples.
    pub const fn len(&self) -> u32 {
        self.len
    }

    /// A universe always holds at least its `min` sample.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Midpoint of `[min, max]`.
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Iterate the samples in ascending order.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(move |i| self.min + f64::from(i) * self.step)
    }
}

impl TryFrom<UniverseSpec> for Universe {
    type Error = FuzzyError;

    fn try_from(spec: UniverseSpec) -> Result<Self, Self::Error> {
        Self::new(spec.min, spec.max, spec.step)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sample_counts_match_configured_grids() {
        assert_eq!(Universe::new(0.0, 100.0, 1.0).unwrap().len(), 101);
        assert_eq!(Universe::new(0.0, 5.0, 0.05).unwrap().len(), 101);
        assert_eq!(Universe::new(0.0, 700.0, 1.0).unwrap().len(), 701);
        assert_eq!(Universe::new(0.0, 499.0, 1.0).unwrap().len(), 500);
        assert_eq!(Universe::new(-0.1, 0.1, 0.001).unwrap().len(), 201);
        assert_eq!(Universe::new(-2.0, 2.0, 0.05).unwrap().len(), 81);
    }

    #[test]
    fn samples_start_at_min_and_end_near_max() {
        let u = Universe::new(-2.0, 2.0, 0.05).unwrap();
        let samples: Vec<f64> = u.samples().collect();
        assert_eq!(samples.len(), 81);
        assert!((samples.first().copied().unwrap() + 2.0).abs() < 1e-12);
        assert!((samples.last().copied().unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn single_point_universe() {
        let u = Universe::new(3.0, 3.0, 1.0).unwrap();
        assert_eq!(u.len(), 1);
        assert!((u.midpoint() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(Universe::new(0.0, 1.0, 0.0).is_err());
        assert!(Universe::new(0.0, 1.0, -0.1).is_err());
        assert!(Universe::new(1.0, 0.0, 0.1).is_err());
        assert!(Universe::new(f64::NAN, 1.0, 0.1).is_err());
        assert!(Universe::new(0.0, f64::INFINITY, 0.1).is_err());
        assert!(Universe::new(0.0, 1.0, 1e-12).is_err());
    }

    #[test]
    fn converts_from_spec_with_validation() {
        let spec = UniverseSpec {
            min: 0.0,
            max: 10.0,
            step: 0.5,
        };
        assert_eq!(Universe::try_from(spec).unwrap().len(), 21);

        let bad = UniverseSpec { step: 0.0, ..spec };
        assert!(Universe::try_from(bad).is_err());
    }
}
