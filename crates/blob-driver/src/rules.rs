//! The authored steering rules.
//!
//! Rules are written once, in order, each with the label it was originally
//! registered under. The labels only matter for [`RuleSet::Legacy`], which
//! replays registration into a label-keyed table: a later rule with a reused
//! label replaces the earlier one, leaving 14 of the 18 rules active.
//! [`RuleSet::Full`] ignores labels and keeps every rule.

use blob_fuzzy::{Condition, Rule};
use serde::{Deserialize, Serialize};

use crate::vocabulary::{Adjustment, BlobVocabulary, Input, Level, Output};

/// Which variant of the authored rule list to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSet {
    /// Every authored rule.
    #[default]
    Full,
    /// Last-write-wins by label, as the first version of the game ran.
    Legacy,
}

type Cond = Condition<Input, Level>;

fn is(input: Input, level: Level) -> Cond {
    Condition::is(input, level)
}

/// `input` is `first` or any of `rest` (OR chain, left to right).
fn any(input: Input, first: Level, rest: &[Level]) -> Cond {
    rest.iter()
        .fold(is(input, first), |acc, &level| acc.or(is(input, level)))
}

fn rule(condition: Cond, output: Output, adjustment: Adjustment) -> Rule<BlobVocabulary> {
    Rule::new(condition, output, adjustment)
}

/// Every authored rule with its registration label, in authoring order.
pub fn labelled_rules() -> Vec<(&'static str, Rule<BlobVocabulary>)> {
    use Adjustment::{Minus, Plus, Zero};
    use Input::{Food, Mass, Sense, Speed};
    use Level::{High, Low, Medium, VeryLow};
    use Output::{DeltaSense, DeltaSpeed};

    let any_mass = || any(Mass, VeryLow, &[Low, Medium, High]);
    let not_tiny = || any(Mass, Low, &[Medium, High]);

    vec![
        // General: hold steady by default.
        ("r1", rule(any_mass(), DeltaSpeed, Zero)),
        ("r2", rule(any_mass(), DeltaSense, Zero)),
        ("r3", rule(is(Speed, Medium), DeltaSense, Zero)),
        ("r4", rule(is(Sense, Medium), DeltaSense, Zero)),
        ("r5", rule(is(Food, Medium), DeltaSense, Zero)),
        // Specific.
        ("r5", rule(is(Speed, VeryLow).and(not_tiny()), DeltaSpeed, Plus)),
        (
            "r5",
            rule(any(Sense, VeryLow, &[Low]).and(not_tiny()), DeltaSense, Plus),
        ),
        (
            "r6",
            rule(is(Speed, Low).and(any(Mass, Medium, &[High])), DeltaSpeed, Plus),
        ),
        (
            "r7",
            rule(is(Mass, VeryLow).and(any(Speed, Medium, &[High])), DeltaSpeed, Minus),
        ),
        ("r8", rule(is(Mass, Low).and(is(Speed, High)), DeltaSpeed, Minus)),
        ("r9", rule(not_tiny().and(is(Speed, VeryLow)), DeltaSpeed, Plus)),
        ("r10", rule(is(Food, VeryLow), DeltaSense, Plus)),
        ("r10", rule(is(Food, High), DeltaSense, Minus)),
        (
            "r12",
            rule(any(Mass, Medium, &[High]).and(is(Food, VeryLow)), DeltaSense, Plus),
        ),
        ("r12", rule(is(Mass, High).and(is(Food, Low)), DeltaSense, Plus)),
        ("r13", rule(is(Food, VeryLow), DeltaSpeed, Minus)),
        ("r14", rule(is(Food, VeryLow), DeltaSense, Plus)),
        ("r15", rule(is(Food, Low).and(is(Speed, VeryLow)), DeltaSpeed, Plus)),
    ]
}

/// The active rules for a rule set.
pub fn rules(set: RuleSet) -> Vec<Rule<BlobVocabulary>> {
    let labelled = labelled_rules();
    match set {
        RuleSet::Full => labelled.into_iter().map(|(_, r)| r).collect(),
        RuleSet::Legacy => {
            // Slot order follows first registration of each label.
            let mut slots: Vec<(&'static str, Rule<BlobVocabulary>)> = Vec::new();
            for (label, r) in labelled {
                if let Some(slot) = slots.iter_mut().find(|(l, _)| *l == label) {
                    slot.1 = r;
                } else {
                    slots.push((label, r));
                }
            }
            slots.into_iter().map(|(_, r)| r).collect()
        }
    }
}
