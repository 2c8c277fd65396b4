//! Row count with linear partial credit

use super::{linear_points, GradingRule, RuleError};
use crate::parser::Document;
use crate::{Finding, Requirement};

pub const DEFAULT_WEIGHT: f64 = 15.0;
pub const DEFAULT_THRESHOLD: usize = 3;
/// Stricter variant requires one more row
pub const STRICT_THRESHOLD: usize = 4;

/// Rule counting `row` elements. Below the threshold the score is
/// proportional to the count.
pub struct RowsRule {
    weight: f64,
    threshold: usize,
}

impl RowsRule {
    pub fn new(weight: f64, threshold: usize) -> Self {
        Self { weight, threshold }
    }
}

impl Default for RowsRule {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT, DEFAULT_THRESHOLD)
    }
}

impl GradingRule for RowsRule {
    fn requirement(&self) -> Requirement {
        Requirement::Rows
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn evaluate(&self, doc: &Document) -> Result<Finding, RuleError> {
        let rows = doc.elements_with_class(|t| t == "row");
        let count = rows.len();
        let passed = count >= self.threshold;
        let points = linear_points(self.weight, count, self.threshold);

        let message = if passed {
            format!("Multiple rows found ({} rows)", count)
        } else {
            format!("Found {} row(s) (need at least {})", count, self.threshold)
        };

        let mut finding = Finding::new(self.requirement(), self.weight, points, passed, message);
        if let Some(first) = rows.first() {
            finding = finding.with_evidence(first.opening_tag());
        }
        Ok(finding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_rows(n: usize) -> Document {
        let rows: String = (0..n).map(|_| "<div class=\"row\"></div>").collect();
        Document::parse(&format!("<div class=\"container\">{}</div>", rows)).unwrap()
    }

    #[test]
    fn full_credit_at_threshold() {
        let rule = RowsRule::default();
        let finding = rule.evaluate(&page_with_rows(3)).unwrap();
        assert!(finding.passed);
        assert_eq!(finding.points, 15.0);
    }

    #[test]
    fn partial_credit_below_threshold() {
        let rule = RowsRule::default();
        let finding = rule.evaluate(&page_with_rows(2)).unwrap();
        assert!(!finding.passed);
        assert_eq!(finding.points, 10.0);
        assert!(finding.message.contains("need at least 3"));
    }

    #[test]
    fn zero_rows_zero_points() {
        let rule = RowsRule::default();
        let doc = Document::parse("<div class=\"container\"></div>").unwrap();
        let finding = rule.evaluate(&doc).unwrap();
        assert!(!finding.passed);
        assert_eq!(finding.points, 0.0);
        assert!(finding.evidence.is_none());
    }

    #[test]
    fn rowspan_item_is_not_a_row() {
        let rule = RowsRule::default();
        let doc = Document::parse(
            "<div class=\"rowspan-item\"></div><div class=\"row\"></div>",
        )
        .unwrap();
        let finding = rule.evaluate(&doc).unwrap();
        // Only the whole-token "row" counts
        assert_eq!(finding.points, 5.0);
    }

    #[test]
    fn strict_threshold_fractional_credit() {
        let rule = RowsRule::new(15.0, STRICT_THRESHOLD);
        let finding = rule.evaluate(&page_with_rows(3)).unwrap();
        assert!(!finding.passed);
        assert!((finding.points - 11.25).abs() < 1e-9);
    }

    #[test]
    fn count_exceeding_threshold_stays_capped() {
        let rule = RowsRule::default();
        let finding = rule.evaluate(&page_with_rows(7)).unwrap();
        assert!(finding.passed);
        assert_eq!(finding.points, 15.0);
    }
}
