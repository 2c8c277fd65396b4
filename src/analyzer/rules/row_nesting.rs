//! Structural nesting: rows as direct children of a container (strict set)

use super::{GradingRule, RuleError};
use crate::parser::Document;
use crate::{Finding, Requirement};
use regex::Regex;

pub const DEFAULT_WEIGHT: f64 = 10.0;
pub const DEFAULT_THRESHOLD: usize = 3;

/// Rule requiring a container element with enough direct-child rows.
/// The child search is non-recursive: a row nested deeper does not count.
pub struct RowNestingRule {
    weight: f64,
    threshold: usize,
    container_pattern: Regex,
}

impl RowNestingRule {
    pub fn new(weight: f64, threshold: usize) -> Self {
        Self {
            weight,
            threshold,
            container_pattern: Regex::new(r"^container(-(sm|md|lg|xl|xxl|fluid))?$").unwrap(),
        }
    }
}

impl Default for RowNestingRule {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT, DEFAULT_THRESHOLD)
    }
}

impl GradingRule for RowNestingRule {
    fn requirement(&self) -> Requirement {
        Requirement::RowNesting
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn evaluate(&self, doc: &Document) -> Result<Finding, RuleError> {
        let containers = doc.elements_with_class(|t| self.container_pattern.is_match(t));

        let mut best = 0usize;
        let mut best_container = None;
        for container in &containers {
            let direct_rows = container
                .child_elements()
                .into_iter()
                .filter(|c| c.has_class("row"))
                .count();
            if direct_rows > best {
                best = direct_rows;
                best_container = Some(container.clone());
            }
        }

        let passed = best >= self.threshold;
        let points = if passed { self.weight } else { 0.0 };

        let message = if containers.is_empty() {
            "No container to hold rows".to_string()
        } else if passed {
            format!("Container has {} direct-child rows", best)
        } else {
            format!(
                "Container has {} direct-child row(s) (need at least {})",
                best, self.threshold
            )
        };

        let mut finding = Finding::new(self.requirement(), self.weight, points, passed, message);
        if let Some(container) = best_container {
            finding = finding.with_evidence(container.opening_tag());
        }
        Ok(finding)
    }
}
