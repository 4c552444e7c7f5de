//! Error types for the `blob-fuzzy` crate.
//!
//! Construction-time variants describe a configuration that must be rejected
//! before any inference runs. [`FuzzyError::MissingInput`] and
//! [`FuzzyError::MissingDegree`] are contract violations at evaluation time:
//! an engine built through [`crate::EngineBuilder`] never produces
//! `MissingDegree`, and `MissingInput` only surfaces when a caller omits a
//! reading.
//!
//! Variable and term labels are rendered with their `Debug` representation
//! so the error type stays independent of the caller's vocabulary.

/// Errors raised while building or evaluating a fuzzy inference engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FuzzyError {
    /// Trapezoid breakpoints are not finite or not non-decreasing.
    #[error("malformed trapezoid [{a}, {b}, {c}, {d}]: breakpoints must be finite and non-decreasing")]
    MalformedTrapezoid {
        /// Left foot.
        a: f64,
        /// Left shoulder.
        b: f64,
        /// Right shoulder.
        c: f64,
        /// Right foot.
        d: f64,
    },

    /// Universe bounds or step are unusable for sampling.
    #[error("invalid universe: {reason}")]
    InvalidUniverse {
        /// Explanation of what is wrong with the universe.
        reason: String,
    },

    /// A term label was declared twice on the same variable.
    #[error("variable {variable} declares term {term} more than once")]
    DuplicateTerm {
        /// The owning variable.
        variable: String,
        /// The repeated term label.
        term: String,
    },

    /// A variable identifier was registered twice on the same engine.
    #[error("variable {variable} is registered more than once")]
    DuplicateVariable {
        /// The repeated variable identifier.
        variable: String,
    },

    /// A variable has no terms, so nothing can be fuzzified or defuzzified.
    #[error("variable {variable} has no terms")]
    EmptyVariable {
        /// The empty variable.
        variable: String,
    },

    /// A rule references a variable the engine does not know.
    #[error("rule references unknown variable {variable}")]
    UnknownVariable {
        /// The unknown variable identifier.
        variable: String,
    },

    /// A rule references a term its variable does not declare.
    #[error("rule references unknown term {term} of variable {variable}")]
    UnknownTerm {
        /// The variable that was searched.
        variable: String,
        /// The missing term label.
        term: String,
    },

    /// No crisp reading was supplied for a configured input variable.
    #[error("no reading supplied for input variable {variable}")]
    MissingInput {
        /// The input variable without a reading.
        variable: String,
    },

    /// Rule evaluation found no degree for a `(variable, term)` pair.
    #[error("fuzzification snapshot has no degree for {variable}/{term}")]
    MissingDegree {
        /// The variable of the missing pair.
        variable: String,
        /// The term of the missing pair.
        term: String,
    },
}

/// Render a vocabulary label for error messages and log fields.
pub(crate) fn label<T: std::fmt::Debug>(value: &T) -> String {
    format!("{value:?}")
}
