//! The Mamdani inference pipeline.
//!
//! [`InferenceEngine::infer`] runs one tick:
//!
//! 1. Quantize each crisp reading with its variable's policy
//! 2. Fuzzify it against every term of that variable
//! 3. Evaluate every rule's firing strength
//! 4. Aggregate strengths per output term with max
//! 5. Defuzzify each output variable by centroid, falling back when no
//!    rule fired
//!
//! The engine is immutable once built. All validation happens in
//! [`EngineBuilder::build`], so evaluation of a built engine cannot hit a
//! missing variable or term.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::Vocabulary;
use crate::defuzz::{Fallback, centroid};
use crate::error::{FuzzyError, label};
use crate::rule::{Fuzzification, RuleBase};
use crate::variable::{LinguisticVariable, TermDegrees};

/// Snapshot type produced by [`InferenceEngine::fuzzify`].
pub type Snapshot<V> = Fuzzification<<V as Vocabulary>::Input, <V as Vocabulary>::InputTerm>;

/// Aggregated consequent surface: per output variable, term → max strength.
pub type Aggregation<V> =
    BTreeMap<<V as Vocabulary>::Output, TermDegrees<<V as Vocabulary>::OutputTerm>>;

/// An output variable and its no-rule-fired policy.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputVariable<U: crate::Label> {
    /// The consequent variable.
    pub variable: LinguisticVariable<U>,
    /// Value used when the aggregated surface is empty.
    pub fallback: Fallback,
}

/// One defuzzified output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crisp {
    /// The crisp value.
    pub value: f64,
    /// Whether the fallback replaced an undefined centroid.
    pub fallback_used: bool,
}

/// Result of one inference tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference<V: Vocabulary> {
    /// Crisp value per output variable.
    pub outputs: BTreeMap<V::Output, Crisp>,
    /// The aggregated surface the outputs were computed from.
    pub aggregation: Aggregation<V>,
}

impl<V: Vocabulary> Inference<V> {
    /// Crisp value of one output variable.
    pub fn value(&self, output: V::Output) -> Option<f64> {
        self.outputs.get(&output).map(|c| c.value)
    }
}

/// Collects variables and rules, then validates them into an engine.
#[derive(Debug, Clone)]
pub struct EngineBuilder<V: Vocabulary> {
    inputs: Vec<(V::Input, LinguisticVariable<V::InputTerm>)>,
    outputs: Vec<(V::Output, OutputVariable<V::OutputTerm>)>,
    rules: RuleBase<V>,
}

impl<V: Vocabulary> Default for EngineBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vocabulary> EngineBuilder<V> {
    /// An empty builder.
    pub const fn new() -> Self {
        Self {
            inputs: Vec::new(),
            outputs: Vec::new(),
            rules: RuleBase::new(),
        }
    }

    /// Register an antecedent variable.
    #[must_use]
    pub fn input(mut self, id: V::Input, variable: LinguisticVariable<V::InputTerm>) -> Self {
        self.inputs.push((id, variable));
        self
    }

    /// Register a consequent variable with its fallback.
    #[must_use]
    pub fn output(
        mut self,
        id: V::Output,
        variable: LinguisticVariable<V::OutputTerm>,
        fallback: Fallback,
    ) -> Self {
        self.outputs.push((id, OutputVariable { variable, fallback }));
        self
    }

    /// Add rules.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = crate::Rule<V>>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Validate and build the engine.
    ///
    /// # Errors
    ///
    /// - [`FuzzyError::DuplicateVariable`] if an identifier is registered twice
    /// - [`FuzzyError::EmptyVariable`] if a variable has no terms
    /// - [`FuzzyError::UnknownVariable`] / [`FuzzyError::UnknownTerm`] if a
    ///   rule leaf or consequent does not resolve
    pub fn build(self) -> Result<InferenceEngine<V>, FuzzyError> {
        let mut inputs = BTreeMap::new();
        for (id, variable) in self.inputs {
            if variable.term_count() == 0 {
                return Err(FuzzyError::EmptyVariable {
                    variable: variable.name().to_owned(),
                });
            }
            if inputs.insert(id, variable).is_some() {
                return Err(FuzzyError::DuplicateVariable { variable: label(&id) });
            }
        }

        let mut outputs = BTreeMap::new();
        for (id, output) in self.outputs {
            if output.variable.term_count() == 0 {
                return Err(FuzzyError::EmptyVariable {
                    variable: output.variable.name().to_owned(),
                });
            }
            if outputs.insert(id, output).is_some() {
                return Err(FuzzyError::DuplicateVariable { variable: label(&id) });
            }
        }

        for rule in &self.rules {
            for (variable, term) in rule.condition.leaves() {
                let var = inputs
                    .get(&variable)
                    .ok_or_else(|| FuzzyError::UnknownVariable {
                        variable: label(&variable),
                    })?;
                if !var.has_term(term) {
                    return Err(FuzzyError::UnknownTerm {
                        variable: label(&variable),
                        term: label(&term),
                    });
                }
            }
            let target = rule.consequent;
            let out = outputs
                .get(&target.variable)
                .ok_or_else(|| FuzzyError::UnknownVariable {
                    variable: label(&target.variable),
                })?;
            if !out.variable.has_term(target.term) {
                return Err(FuzzyError::UnknownTerm {
                    variable: label(&target.variable),
                    term: label(&target.term),
                });
            }
        }

        debug!(
            inputs = inputs.len(),
            outputs = outputs.len(),
            rules = self.rules.len(),
            "Inference engine built"
        );

        Ok(InferenceEngine {
            inputs,
            outputs,
            rules: self.rules,
        })
    }
}

/// A validated, immutable Mamdani inference engine.
///
/// Holds no per-tick state; share it across threads behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceEngine<V: Vocabulary> {
    inputs: BTreeMap<V::Input, LinguisticVariable<V::InputTerm>>,
    outputs: BTreeMap<V::Output, OutputVariable<V::OutputTerm>>,
    rules: RuleBase<V>,
}

impl<V: Vocabulary> InferenceEngine<V> {
    /// Start building an engine.
    pub const fn builder() -> EngineBuilder<V> {
        EngineBuilder::new()
    }

    /// Input variable by identifier.
    pub fn input(&self, id: V::Input) -> Option<&LinguisticVariable<V::InputTerm>> {
        self.inputs.get(&id)
    }

    /// Output variable by identifier.
    pub fn output(&self, id: V::Output) -> Option<&OutputVariable<V::OutputTerm>> {
        self.outputs.get(&id)
    }

    /// The rule base.
    pub const fn rules(&self) -> &RuleBase<V> {
        &self.rules
    }

    /// Quantize and fuzzify every input variable.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::MissingInput`] if `readings` lacks a configured
    /// input variable. Extra readings are ignored.
    pub fn fuzzify(&self, readings: &BTreeMap<V::Input, f64>) -> Result<Snapshot<V>, FuzzyError> {
        let mut snapshot = Fuzzification::new();
        for (id, variable) in &self.inputs {
            let raw = readings
                .get(id)
                .copied()
                .ok_or_else(|| FuzzyError::MissingInput { variable: label(id) })?;
            let x = variable.quantize(raw);
            snapshot.insert(*id, variable.fuzzify(x));
        }
        Ok(snapshot)
    }

    /// Evaluate every rule and max-accumulate into its consequent term.
    ///
    /// Every term of every output variable is present in the result;
    /// untargeted terms hold 0.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::MissingDegree`] if the snapshot does not cover
    /// a rule leaf.
    pub fn aggregate(&self, snapshot: &Snapshot<V>) -> Result<Aggregation<V>, FuzzyError> {
        let mut surface: Aggregation<V> = self
            .outputs
            .iter()
            .map(|(id, out)| {
                let zeros = out.variable.terms().map(|(term, _)| (term, 0.0)).collect();
                (*id, zeros)
            })
            .collect();

        for rule in &self.rules {
            let strength = rule.strength(snapshot)?;
            let target = rule.consequent;
            let slot = surface
                .entry(target.variable)
                .or_default()
                .entry(target.term)
                .or_insert(0.0);
            *slot = slot.max(strength);
        }

        Ok(surface)
    }

    /// Defuzzify one output variable, applying its fallback if needed.
    ///
    /// Returns `None` for an unknown output identifier.
    pub fn defuzzify(&self, output: V::Output, degrees: &TermDegrees<V::OutputTerm>) -> Option<Crisp> {
        let out = self.outputs.get(&output)?;
        let crisp = centroid(&out.variable, degrees).map_or_else(
            || {
                let value = out.fallback.resolve(&out.variable);
                debug!(
                    output = out.variable.name(),
                    fallback = value,
                    "No rule fired, using fallback"
                );
                Crisp {
                    value,
                    fallback_used: true,
                }
            },
            |value| Crisp {
                value,
                fallback_used: false,
            },
        );
        Some(crisp)
    }

    /// Run the full pipeline for one set of readings.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::MissingInput`] if a reading is missing.
    pub fn infer(&self, readings: &BTreeMap<V::Input, f64>) -> Result<Inference<V>, FuzzyError> {
        let snapshot = self.fuzzify(readings)?;
        let aggregation = self.aggregate(&snapshot)?;

        let mut outputs = BTreeMap::new();
        for (id, degrees) in &aggregation {
            if let Some(crisp) = self.defuzzify(*id, degrees) {
                outputs.insert(*id, crisp);
            }
        }

        trace!(?aggregation, ?outputs, "Inference tick complete");

        Ok(Inference {
            outputs,
            aggregation,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::membership::Trapezoid;
    use crate::rule::{Condition, Rule};
    use crate::universe::Universe;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Temp {
        Cold,
        Hot,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Fan {
        Slow,
        Fast,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum In {
        Temp,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Out {
        Fan,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Thermo;

    impl Vocabulary for Thermo {
        type Input = In;
        type InputTerm = Temp;
        type Output = Out;
        type OutputTerm = Fan;
    }

    fn temp() -> LinguisticVariable<Temp> {
        LinguisticVariable::new("temp", Universe::new(0.0, 40.0, 1.0).unwrap())
            .with_quantization(crate::Quantization::Decimals(0))
            .with_terms([
                (Temp::Cold, Trapezoid::new(0.0, 0.0, 10.0, 20.0).unwrap()),
                (Temp::Hot, Trapezoid::new(20.0, 30.0, 40.0, 40.0).unwrap()),
            ])
            .unwrap()
    }

    fn fan() -> LinguisticVariable<Fan> {
        LinguisticVariable::new("fan", Universe::new(0.0, 100.0, 1.0).unwrap())
            .with_terms([
                (Fan::Slow, Trapezoid::new(0.0, 0.0, 20.0, 50.0).unwrap()),
                (Fan::Fast, Trapezoid::new(50.0, 80.0, 100.0, 100.0).unwrap()),
            ])
            .unwrap()
    }

    fn rules() -> Vec<Rule<Thermo>> {
        vec![
            Rule::new(Condition::is(In::Temp, Temp::Cold), Out::Fan, Fan::Slow),
            Rule::new(Condition::is(In::Temp, Temp::Hot), Out::Fan, Fan::Fast),
        ]
    }

    fn engine(fallback: Fallback) -> InferenceEngine<Thermo> {
        InferenceEngine::builder()
            .input(In::Temp, temp())
            .output(Out::Fan, fan(), fallback)
            .rules(rules())
            .build()
            .unwrap()
    }

    fn readings(t: f64) -> BTreeMap<In, f64> {
        [(In::Temp, t)].into_iter().collect()
    }

    #[test]
    fn cold_runs_slow_hot_runs_fast() {
        let e = engine(Fallback::default());
        let cold = e.infer(&readings(5.0)).unwrap().value(Out::Fan).unwrap();
        let hot = e.infer(&readings(35.0)).unwrap().value(Out::Fan).unwrap();
        assert!(cold < 30.0, "{cold}");
        assert!(hot > 70.0, "{hot}");
    }

    #[test]
    fn quantization_applies_before_fuzzify() {
        let e = engine(Fallback::default());
        let snap = e.fuzzify(&readings(14.6)).unwrap();
        // 14.6 rounds to 15 -> cold = (20 - 15) / 10
        assert!((snap.degree(In::Temp, Temp::Cold).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn aggregation_covers_every_output_term() {
        let e = engine(Fallback::default());
        let snap = e.fuzzify(&readings(5.0)).unwrap();
        let agg = e.aggregate(&snap).unwrap();
        let fan = agg.get(&Out::Fan).unwrap();
        assert_eq!(fan.len(), 2);
        assert!((fan.get(&Fan::Slow).copied().unwrap() - 1.0).abs() < 1e-12);
        assert!(fan.get(&Fan::Fast).copied().unwrap().abs() < 1e-12);
    }

    #[test]
    fn duplicate_consequents_keep_the_maximum() {
        let e = InferenceEngine::<Thermo>::builder()
            .input(In::Temp, temp())
            .output(Out::Fan, fan(), Fallback::default())
            .rules([
                Rule::new(Condition::is(In::Temp, Temp::Cold), Out::Fan, Fan::Fast),
                Rule::new(Condition::is(In::Temp, Temp::Hot), Out::Fan, Fan::Fast),
            ])
            .build()
            .unwrap();
        // At 18: cold = 0.2, hot = 0.
        let snap = e.fuzzify(&readings(18.0)).unwrap();
        let agg = e.aggregate(&snap).unwrap();
        let fast = agg.get(&Out::Fan).and_then(|t| t.get(&Fan::Fast)).copied().unwrap();
        assert!((fast - 0.2).abs() < 1e-12, "later zero-strength rule must not overwrite: {fast}");
    }

    #[test]
    fn exact_duplicate_rule_is_idempotent() {
        let base = engine(Fallback::default());
        let doubled = InferenceEngine::<Thermo>::builder()
            .input(In::Temp, temp())
            .output(Out::Fan, fan(), Fallback::default())
            .rules(rules())
            .rules(rules())
            .build()
            .unwrap();
        assert_eq!(doubled.rules().len(), 4);
        for t in [0.0, 12.0, 18.0, 22.0, 27.0, 40.0] {
            let a = base.infer(&readings(t)).unwrap().value(Out::Fan).unwrap();
            let b = doubled.infer(&readings(t)).unwrap().value(Out::Fan).unwrap();
            assert!((a - b).abs() < 1e-12, "temp {t}: {a} vs {b}");
        }
    }

    #[test]
    fn nothing_fired_uses_fallback() {
        let e = engine(Fallback::Midpoint);
        // Between cold's foot (20) and hot's foot (20) both are zero.
        let out = e.infer(&readings(20.0)).unwrap();
        let crisp = out.outputs.get(&Out::Fan).copied().unwrap();
        assert!(crisp.fallback_used);
        assert!((crisp.value - 50.0).abs() < 1e-12);

        let e = engine(Fallback::Constant(-1.0));
        let crisp = e.infer(&readings(20.0)).unwrap().outputs.get(&Out::Fan).copied().unwrap();
        assert!((crisp.value + 1.0).abs() < 1e-12);
        assert!(!crisp.value.is_nan());
    }

    #[test]
    fn missing_reading_is_reported() {
        let e = engine(Fallback::default());
        let err = e.infer(&BTreeMap::new());
        assert!(matches!(err, Err(FuzzyError::MissingInput { .. })));
    }

    #[test]
    fn unknown_term_fails_build() {
        let cold_only = LinguisticVariable::new("temp", Universe::new(0.0, 40.0, 1.0).unwrap())
            .with_term(Temp::Cold, Trapezoid::new(0.0, 0.0, 10.0, 20.0).unwrap())
            .unwrap();
        let err = InferenceEngine::<Thermo>::builder()
            .input(In::Temp, cold_only)
            .output(Out::Fan, fan(), Fallback::default())
            .rules(rules())
            .build();
        assert!(matches!(err, Err(FuzzyError::UnknownTerm { .. })));
    }

    #[test]
    fn unknown_variable_fails_build() {
        let err = InferenceEngine::<Thermo>::builder()
            .output(Out::Fan, fan(), Fallback::default())
            .rules(rules())
            .build();
        assert!(matches!(err, Err(FuzzyError::UnknownVariable { .. })));

        let err = InferenceEngine::<Thermo>::builder()
            .input(In::Temp, temp())
            .rules(rules())
            .build();
        assert!(matches!(err, Err(FuzzyError::UnknownVariable { .. })));
    }

    #[test]
    fn empty_output_fails_build() {
        let empty = LinguisticVariable::new("fan", Universe::new(0.0, 100.0, 1.0).unwrap());
        let err = InferenceEngine::<Thermo>::builder()
            .input(In::Temp, temp())
            .output(Out::Fan, empty, Fallback::default())
            .build();
        assert!(matches!(err, Err(FuzzyError::EmptyVariable { .. })));
    }

    #[test]
    fn duplicate_variable_fails_build() {
        let err = InferenceEngine::<Thermo>::builder()
            .input(In::Temp, temp())
            .input(In::Temp, temp())
            .output(Out::Fan, fan(), Fallback::default())
            .build();
        assert!(matches!(err, Err(FuzzyError::DuplicateVariable { .. })));
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InferenceEngine<Thermo>>();

        let e = std::sync::Arc::new(engine(Fallback::default()));
        let handles: Vec<_> = (0..4_u32)
            .map(|i| {
                let e = std::sync::Arc::clone(&e);
                std::thread::spawn(move || {
                    e.infer(&readings(f64::from(i) * 10.0)).unwrap().value(Out::Fan).unwrap()
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap().is_finite());
        }
    }
}
