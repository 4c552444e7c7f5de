//! Trapezoidal membership functions.
//!
//! A [`Trapezoid`] maps a crisp value to a degree of truth in `[0, 1]`:
//!
//! ```text
//!   1 |      b______c
//!     |     /        \
//!     |    /          \
//!   0 |___a            d___
//! ```
//!
//! The plateau `[b, c]` takes precedence over the zero region, so
//! degenerate shoulders (`a == b` or `c == d`) behave as vertical edges that
//! still reach 1. `Trapezoid(0, 0, 0, 0)` is therefore a singleton at 0.

use crate::error::FuzzyError;

/// A trapezoid-shaped membership function with breakpoints `a <= b <= c <= d`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trapezoid {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl Trapezoid {
    /// Create a trapezoid from its four breakpoints.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::MalformedTrapezoid`] if any breakpoint is not
    /// finite or the breakpoints are not non-decreasing.
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Result<Self, FuzzyError> {
        let finite = a.is_finite() && b.is_finite() && c.is_finite() && d.is_finite();
        if !finite || a > b || b > c || c > d {
            return Err(FuzzyError::MalformedTrapezoid { a, b, c, d });
        }
        Ok(Self { a, b, c, d })
    }

    /// The breakpoints as `[a, b, c, d]`.
    pub const fn breakpoints(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Degree of membership of `x`. Total over all reals; NaN maps to 0.
    pub fn degree(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.0;
        }
        if self.b <= x && x <= self.c {
            1.0
        } else if x <= self.a || x >= self.d {
            0.0
        } else if x < self.b {
            (x - self.a) / (self.b - self.a)
        } else {
            (self.d - x) / (self.d - self.c)
        }
    }

    /// Geometric centroid of the area under the trapezoid.
    ///
    /// Zero-area shapes (a bare plateau point) return the plateau midpoint.
    pub fn centroid(&self) -> f64 {
        let left_area = (self.b - self.a) / 2.0;
        let plateau_area = self.c - self.b;
        let right_area = (self.d - self.c) / 2.0;
        let total = left_area + plateau_area + right_area;
        if total <= 0.0 {
            return (self.b + self.c) / 2.0;
        }
        let left_moment = left_area * (self.a + 2.0 * (self.b - self.a) / 3.0);
        let plateau_moment = plateau_area * (self.b + self.c) / 2.0;
        let right_moment = right_area * (self.c + (self.d - self.c) / 3.0);
        (left_moment + plateau_moment + right_moment) / total
    }
}

impl TryFrom<[f64; 4]> for Trapezoid {
    type Error = FuzzyError;

    fn try_from(points: [f64; 4]) -> Result<Self, Self::Error> {
        let [a, b, c, d] = points;
        Self::new(a, b, c, d)
    }
}
