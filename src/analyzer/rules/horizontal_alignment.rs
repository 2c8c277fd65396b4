//! Horizontal alignment (justify-content-*) usage

use super::{linear_points, GradingRule, RuleError};
use crate::parser::Document;
use crate::{Finding, Requirement};
use regex::Regex;

pub const DEFAULT_WEIGHT: f64 = 20.0;
pub const DEFAULT_THRESHOLD: usize = 2;

/// Rule counting elements with a justify-content alignment class
pub struct HorizontalAlignmentRule {
    weight: f64,
    threshold: usize,
    token_pattern: Regex,
}

impl HorizontalAlignmentRule {
    pub fn new(weight: f64, threshold: usize) -> Self {
        Self {
            weight,
            threshold,
            token_pattern: Regex::new(r"^justify-content-(center|start|end|between|around|evenly)$")
                .unwrap(),
        }
    }
}

impl Default for HorizontalAlignmentRule {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT, DEFAULT_THRESHOLD)
    }
}

impl GradingRule for HorizontalAlignmentRule {
    fn requirement(&self) -> Requirement {
        Requirement::HorizontalAlignment
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn evaluate(&self, doc: &Document) -> Result<Finding, RuleError> {
        let matches = doc.elements_with_class(|t| self.token_pattern.is_match(t));
        let count = matches.len();
        let passed = count >= self.threshold;
        let points = linear_points(self.weight, count, self.threshold);

        let message = if passed {
            format!("Horizontal alignment classes found ({} instances)", count)
        } else {
            format!(
                "Found {} horizontal alignment class(es) (need at least {})",
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
