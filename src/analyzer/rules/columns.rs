//! Column count with linear partial credit

use super::{linear_points, GradingRule, RuleError};
use crate::parser::Document;
use crate::{Finding, Requirement};

pub const DEFAULT_WEIGHT: f64 = 15.0;
pub const DEFAULT_THRESHOLD: usize = 8;

/// Whole-token column test: bare `col` or any `col-` variant
/// (`col-6`, `col-md-4`, `col-auto`), never `collapse` or `color`.
pub fn is_column_token(token: &str) -> bool {
    token == "col" || token.starts_with("col-")
}

/// Rule counting column elements. Below the threshold the score is
/// proportional to the count.
pub struct ColumnsRule {
    weight: f64,
    threshold: usize,
}

impl ColumnsRule {
    pub fn new(weight: f64, threshold: usize) -> Self {
        Self { weight, threshold }
    }
}

impl Default for ColumnsRule {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT, DEFAULT_THRESHOLD)
    }
}

impl GradingRule for ColumnsRule {
    fn requirement(&self) -> Requirement {
        Requirement::Columns
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn evaluate(&self, doc: &Document) -> Result<Finding, RuleError> {
        let cols = doc.elements_with_class(is_column_token);
        let count = cols.len();
        let passed = count >= self.threshold;
        let points = linear_points(self.weight, count, self.threshold);

        let message = if passed {
            format!("Multiple columns found ({} columns)", count)
        } else {
            format!(
                "Found {} column(s) (need at least {})",
                count, self.threshold
            )
        };

        let mut finding = Finding::new(self.requirement(), self.weight, points, passed, message);
        if let Some(first) = cols.first() {
            finding = finding.with_evidence(first.opening_tag());
        }
        Ok(finding)
    }
}
