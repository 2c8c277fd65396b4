//! Vertical alignment (align-items-*) usage

use super::{linear_points, GradingRule, RuleError};
use crate::parser::Document;
use crate::{Finding, Requirement};
use regex::Regex;

pub const DEFAULT_WEIGHT: f64 = 25.0;
pub const DEFAULT_THRESHOLD: usize = 3;

/// Rule counting elements with an align-items alignment class
pub struct VerticalAlignmentRule {
    weight: f64,
    threshold: usize,
    token_pattern: Regex,
}

impl VerticalAlignmentRule {
    pub fn new(weight: f64, threshold: usize) -> Self {
        Self {
            weight,
            threshold,
            token_pattern: Regex::new(r"^align-items-(center|start|end|baseline|stretch)$")
                .unwrap(),
        }
    }
}

impl Default for VerticalAlignmentRule {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT, DEFAULT_THRESHOLD)
    }
}

impl GradingRule for VerticalAlignmentRule {
    fn requirement(&self) -> Requirement {
        Requirement::VerticalAlignment
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
            format!("Vertical alignment classes found ({} instances)", count)
        } else {
            format!(
                "Found {} vertical alignment class(es) (need at least {})",
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_three_instances() {
        let rule = VerticalAlignmentRule::default();
        let doc = Document::parse(
            "<div class=\"row align-items-center\"></div>\
             <div class=\"row align-items-end\"></div>\
             <div class=\"row align-items-baseline\"></div>",
        )
        .unwrap();
        let finding = rule.evaluate(&doc).unwrap();
        assert!(finding.passed);
        assert_eq!(finding.points, 25.0);
    }

    #[test]
    fn partial_credit_below_threshold() {
        let rule = VerticalAlignmentRule::default();
        let doc = Document::parse(
            "<div class=\"row align-items-center\"></div>\
             <div class=\"row align-items-stretch\"></div>",
        )
        .unwrap();
        let finding = rule.evaluate(&doc).unwrap();
        assert!(!finding.passed);
        assert!((finding.points - 50.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn align_self_is_a_different_utility() {
        let rule = VerticalAlignmentRule::default();
        let doc = Document::parse("<div class=\"align-self-center\"></div>").unwrap();
        assert_eq!(rule.evaluate(&doc).unwrap().points, 0.0);
    }

    #[test]
    fn unknown_suffix_rejected() {
        let rule = VerticalAlignmentRule::default();
        let doc = Document::parse("<div class=\"align-items-top\"></div>").unwrap();
        assert_eq!(rule.evaluate(&doc).unwrap().points, 0.0);
    }
}
