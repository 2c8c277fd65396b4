//! Utility class breadth (strict set)

use super::{GradingRule, RuleError};
use crate::parser::Document;
use crate::{Finding, Requirement};

pub const DEFAULT_WEIGHT: f64 = 10.0;
pub const DEFAULT_THRESHOLD: usize = 10;

/// Spacing, display, gutter, text, and background utility prefixes.
/// A token counts when it is `<prefix>-<value>`.
const UTILITY_PREFIXES: &[&str] = &[
    "m", "mt", "mb", "ms", "me", "mx", "my", "p", "pt", "pb", "ps", "pe", "px", "py", "d", "g",
    "gap", "text", "bg",
];

/// Whole-token utility test: a known prefix followed by `-` and a value
pub fn is_utility_token(token: &str) -> bool {
    match token.split_once('-') {
        Some((prefix, rest)) => !rest.is_empty() && UTILITY_PREFIXES.contains(&prefix),
        None => false,
    }
}

/// Rule counting elements that use at least one utility class. Pass/fail
/// on the total element count; breadth of use is the point.
pub struct UtilityClassesRule {
    weight: f64,
    threshold: usize,
}

impl UtilityClassesRule {
    pub fn new(weight: f64, threshold: usize) -> Self {
        Self { weight, threshold }
    }
}

impl Default for UtilityClassesRule {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT, DEFAULT_THRESHOLD)
    }
}

impl GradingRule for UtilityClassesRule {
    fn requirement(&self) -> Requirement {
        Requirement::UtilityClasses
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn evaluate(&self, doc: &Document) -> Result<Finding, RuleError> {
        let matches = doc.elements_with_class(is_utility_token);
        let count = matches.len();
        let passed = count >= self.threshold;
        let points = if passed { self.weight } else { 0.0 };

        let message = if passed {
            format!("Utility classes used on {} elements", count)
        } else {
            format!(
                "Utility classes on {} element(s) (need at least {})",
                count, self.threshold
            )
        };

        let mut finding = Finding::new(self.requirement(), self.weight, points, passed, message);
        if let Some(first) = matches.first() {
            finding = finding.with_evidence(first.opening_tag());
        }
        Ok(finding)
    }
}
