//! Rules, condition trees, and the rule base.
//!
//! A [`Rule`] pairs a [`Condition`] over `(input variable, term)` leaves with
//! one consequent `(output variable, term)`. Rules carry no identifier: a
//! [`RuleBase`] is a plain sequence, so two rules with the same consequent
//! both stay active.

use std::collections::BTreeMap;

use crate::error::{FuzzyError, label};
use crate::variable::TermDegrees;
use crate::{Label, Vocabulary};

/// Degrees of every `(input variable, term)` pair for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Fuzzification<I: Label, T: Label> {
    degrees: BTreeMap<I, TermDegrees<T>>,
}

impl<I: Label, T: Label> Fuzzification<I, T> {
    /// An empty snapshot.
    pub const fn new() -> Self {
        Self {
            degrees: BTreeMap::new(),
        }
    }

    /// Record the degrees of one input variable, replacing earlier ones.
    pub fn insert(&mut self, variable: I, degrees: TermDegrees<T>) {
        self.degrees.insert(variable, degrees);
    }

    /// Degree of `term` for `variable`, if fuzzified.
    pub fn degree(&self, variable: I, term: T) -> Option<f64> {
        self.degrees
            .get(&variable)
            .and_then(|terms| terms.get(&term))
            .copied()
    }
}

impl<I: Label, T: Label> Default for Fuzzification<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A boolean-algebra expression over `(variable, term)` leaves.
///
/// AND is the minimum and OR the maximum of the child strengths. NOT is
/// the standard complement `1 - x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition<I, T> {
    /// `variable IS term`.
    Is {
        /// Input variable.
        variable: I,
        /// Term of that variable.
        term: T,
    },
    /// Both sub-conditions hold.
    And(Box<Self>, Box<Self>),
    /// Either sub-condition holds.
    Or(Box<Self>, Box<Self>),
    /// The sub-condition does not hold.
    Not(Box<Self>),
}

impl<I: Label, T: Label> Condition<I, T> {
    /// Leaf condition `variable IS term`.
    pub const fn is(variable: I, term: T) -> Self {
        Self::Is { variable, term }
    }

    /// `self AND other`.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// `self OR other`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// `NOT self`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Every `(variable, term)` leaf, left to right.
    pub fn leaves(&self) -> Vec<(I, T)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<(I, T)>) {
        match self {
            Self::Is { variable, term } => out.push((*variable, *term)),
            Self::And(l, r) | Self::Or(l, r) => {
                l.collect_leaves(out);
                r.collect_leaves(out);
            }
            Self::Not(inner) => inner.collect_leaves(out),
        }
    }

    /// Firing strength against a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::MissingDegree`] if a leaf is absent from the
    /// snapshot.
    pub fn strength(&self, snapshot: &Fuzzification<I, T>) -> Result<f64, FuzzyError> {
        match self {
            Self::Is { variable, term } => {
                snapshot
                    .degree(*variable, *term)
                    .ok_or_else(|| FuzzyError::MissingDegree {
                        variable: label(variable),
                        term: label(term),
                    })
            }
            Self::And(l, r) => Ok(l.strength(snapshot)?.min(r.strength(snapshot)?)),
            Self::Or(l, r) => Ok(l.strength(snapshot)?.max(r.strength(snapshot)?)),
            Self::Not(inner) => Ok(1.0 - inner.strength(snapshot)?),
        }
    }
}

/// The `(output variable, term)` a rule implicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Consequent<O, U> {
    /// Output variable.
    pub variable: O,
    /// Term of that output variable.
    pub term: U,
}

/// `IF condition THEN consequent`, with unit weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule<V: Vocabulary> {
    /// Antecedent expression.
    pub condition: Condition<V::Input, V::InputTerm>,
    /// Implicated output term.
    pub consequent: Consequent<V::Output, V::OutputTerm>,
}

impl<V: Vocabulary> Rule<V> {
    /// Create a rule.
    pub const fn new(
        condition: Condition<V::Input, V::InputTerm>,
        output: V::Output,
        term: V::OutputTerm,
    ) -> Self {
        Self {
            condition,
            consequent: Consequent {
                variable: output,
                term,
            },
        }
    }

    /// Firing strength against a snapshot.
    ///
    /// # Errors
    ///
    /// See [`Condition::strength`].
    pub fn strength(
        &self,
        snapshot: &Fuzzification<V::Input, V::InputTerm>,
    ) -> Result<f64, FuzzyError> {
        self.condition.strength(snapshot)
    }
}

/// An unordered collection of rules, each evaluated independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBase<V: Vocabulary> {
    rules: Vec<Rule<V>>,
}

impl<V: Vocabulary> RuleBase<V> {
    /// An empty rule base.
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the rule base is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate the rules.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule<V>> {
        self.rules.iter()
    }
}

impl<V: Vocabulary> Default for RuleBase<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vocabulary> FromIterator<Rule<V>> for RuleBase<V> {
    fn from_iter<It: IntoIterator<Item = Rule<V>>>(iter: It) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<V: Vocabulary> Extend<Rule<V>> for RuleBase<V> {
    fn extend<It: IntoIterator<Item = Rule<V>>>(&mut self, iter: It) {
        self.rules.extend(iter);
    }
}

impl<'a, V: Vocabulary> IntoIterator for &'a RuleBase<V> {
    type Item = &'a Rule<V>;
    type IntoIter = std::slice::Iter<'a, Rule<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
