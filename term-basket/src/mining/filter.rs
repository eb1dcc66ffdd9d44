//! Threshold filtering of generated rules.

use super::metrics::Rule;
use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// Minimum values a rule must reach on every metric to be retained.
///
/// The defaults (support 0.1, confidence 0.6, lift 1.2) are tuning values
/// for the loss dataset, not invariants; override them per run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleThresholds {
    /// Minimum support (inclusive)
    pub min_support: f64,
    /// Minimum confidence (inclusive)
    pub min_confidence: f64,
    /// Minimum lift (inclusive)
    pub min_lift: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            min_support: 0.1,
            min_confidence: 0.6,
            min_lift: 1.2,
        }
    }
}

impl RuleThresholds {
    /// Thresholds that retain every rule.
    pub fn none() -> Self {
        Self {
            min_support: 0.0,
            min_confidence: 0.0,
            min_lift: 0.0,
        }
    }

    /// Sets the minimum support.
    pub fn with_min_support(mut self, value: f64) -> Self {
        self.min_support = value;
        self
    }

    /// Sets the minimum confidence.
    pub fn with_min_confidence(mut self, value: f64) -> Self {
        self.min_confidence = value;
        self
    }

    /// Sets the minimum lift.
    pub fn with_min_lift(mut self, value: f64) -> Self {
        self.min_lift = value;
        self
    }

    /// Checks that every threshold is a finite, non-negative number.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("support", self.min_support),
            ("confidence", self.min_confidence),
            ("lift", self.min_lift),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(BasketError::Configuration(format!(
                    "Minimum {name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// True if `rule` meets or exceeds all three thresholds.
    pub fn accepts(&self, rule: &Rule) -> bool {
        rule.support >= self.min_support
            && rule.confidence >= self.min_confidence
            && rule.lift >= self.min_lift
    }
}

/// Returns the rules meeting all thresholds, in their original order.
pub fn filter_rules(rules: &[Rule], thresholds: &RuleThresholds) -> Vec<Rule> {
    rules
        .iter()
        .filter(|rule| thresholds.accepts(rule))
        .cloned()
        .collect()
}
