//! Support, confidence and lift for directional pair rules.

use super::counter::FrequencyCounts;
use super::item::Item;
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directional association `antecedent -> consequent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Item whose presence is conditioned on
    pub antecedent: Item,
    /// Item predicted by the antecedent
    pub consequent: Item,
    /// Fraction of transactions containing both items
    pub support: f64,
    /// Fraction of antecedent transactions that also contain the consequent
    pub confidence: f64,
    /// Confidence relative to the consequent's base rate
    pub lift: f64,
}

impl Rule {
    /// The rule relation as `antecedent -> consequent`.
    pub fn relation(&self) -> String {
        format!("{} -> {}", self.antecedent, self.consequent)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: Support={:.2}, Confidence={:.2}, Lift={:.2}",
            self.antecedent, self.consequent, self.support, self.confidence, self.lift
        )
    }
}

/// Derives two rules per observed pair, in pair discovery order.
///
/// For a canonical pair `(a, b)` the rule `a -> b` comes first, then
/// `b -> a`. Both share the pair's support; confidence and lift are computed
/// separately for each direction.
///
/// Returns [`BasketError::EmptyInput`] when no transactions were counted.
pub fn compute_rules(counts: &FrequencyCounts) -> Result<Vec<Rule>> {
    let n = counts.transactions();
    if n == 0 {
        return Err(BasketError::EmptyInput);
    }
    let n = n as f64;

    let mut rules = Vec::with_capacity(counts.pairs().len() * 2);
    for (pair, together) in counts.pairs().iter() {
        let (a, b) = (pair.first(), pair.second());
        let count_a = counts.item_count(a);
        let count_b = counts.item_count(b);
        if count_a == 0 || count_b == 0 {
            return Err(BasketError::Internal(format!(
                "Pair {pair} was counted but one of its items was not"
            )));
        }

        let together = together as f64;
        let support = together / n;
        let confidence_ab = together / count_a as f64;
        let confidence_ba = together / count_b as f64;

        rules.push(Rule {
            antecedent: a.clone(),
            consequent: b.clone(),
            support,
            confidence: confidence_ab,
            lift: confidence_ab / (count_b as f64 / n),
        });
        rules.push(Rule {
            antecedent: b.clone(),
            consequent: a.clone(),
            support,
            confidence: confidence_ba,
            lift: confidence_ba / (count_a as f64 / n),
        });
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::counter::{count_frequencies, PAIR_SIZE};
    use crate::mining::transaction::Transaction;

    const EPS: f64 = 1e-9;

    fn rules_for(transactions: &[Transaction]) -> Vec<Rule> {
        compute_rules(&count_frequencies(transactions, PAIR_SIZE).unwrap()).unwrap()
    }

    fn find<'a>(rules: &'a [Rule], from: &str, to: &str) -> &'a Rule {
        rules
            .iter()
            .find(|r| r.antecedent.as_str() == from && r.consequent.as_str() == to)
            .unwrap()
    }

    #[test]
    fn test_reference_metrics() {
        let rules = rules_for(&[
            Transaction::from_items(["A", "B"]),
            Transaction::from_items(["A", "B"]),
            Transaction::from_items(["A", "C"]),
        ]);
        assert_eq!(rules.len(), 4);

        let ab = find(&rules, "A", "B");
        assert!((ab.support - 2.0 / 3.0).abs() < EPS);
        assert!((ab.confidence - 2.0 / 3.0).abs() < EPS);
        assert!((ab.lift - 1.0).abs() < EPS);

        let ba = find(&rules, "B", "A");
        assert!((ba.support - ab.support).abs() < EPS);
        assert!((ba.confidence - 1.0).abs() < EPS);
        assert!((ba.lift - 1.0).abs() < EPS);

        let ca = find(&rules, "C", "A");
        assert!((ca.support - 1.0 / 3.0).abs() < EPS);
        assert!((ca.confidence - 1.0).abs() < EPS);
    }

    #[test]
    fn test_directions_are_computed_independently() {
        // X -> Y and Y -> X differ in confidence; their lifts happen to agree.
        let rules = rules_for(&[
            Transaction::from_items(["X", "Y"]),
            Transaction::from_items(["X", "Z"]),
            Transaction::from_items(["X"]),
            Transaction::from_items(["W", "Z"]),
        ]);
        let xy = find(&rules, "X", "Y");
        let yx = find(&rules, "Y", "X");
        assert!((xy.confidence - 1.0 / 3.0).abs() < EPS);
        assert!((yx.confidence - 1.0).abs() < EPS);
        assert!((xy.lift - (1.0 / 3.0) / (1.0 / 4.0)).abs() < EPS);
        assert!((yx.lift - 1.0 / (3.0 / 4.0)).abs() < EPS);
    }

    #[test]
    fn test_rules_follow_pair_order_with_forward_direction_first() {
        let rules = rules_for(&[Transaction::from_items(["B", "A"])]);
        let relations: Vec<_> = rules.iter().map(Rule::relation).collect();
        assert_eq!(relations, vec!["A -> B", "B -> A"]);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let counts = count_frequencies(&[], PAIR_SIZE).unwrap();
        assert!(matches!(
            compute_rules(&counts).unwrap_err(),
            BasketError::EmptyInput
        ));
    }

    #[test]
    fn test_no_pairs_means_no_rules() {
        let rules = rules_for(&[Transaction::from_items(["A"])]);
        assert!(rules.is_empty());
    }

    #[test]
    fn test_display_uses_two_decimals() {
        let rule = Rule {
            antecedent: "A".into(),
            consequent: "B".into(),
            support: 2.0 / 3.0,
            confidence: 1.0,
            lift: 1.25,
        };
        assert_eq!(
            rule.to_string(),
            "A -> B: Support=0.67, Confidence=1.00, Lift=1.25"
        );
    }
}
