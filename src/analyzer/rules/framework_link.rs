//! Bootstrap stylesheet link detection

use super::{GradingRule, RuleError};
use crate::parser::Document;
use crate::{Finding, Requirement};
use regex::Regex;

pub const DEFAULT_WEIGHT: f64 = 10.0;

/// Rule for detecting a linked Bootstrap stylesheet
pub struct FrameworkLinkRule {
    weight: f64,
    href_pattern: Regex,
}

impl FrameworkLinkRule {
    pub fn new(weight: f64) -> Self {
        Self {
            weight,
            href_pattern: Regex::new(r"bootstrap.*\.css").unwrap(),
        }
    }
}

impl Default for FrameworkLinkRule {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT)
    }
}

impl GradingRule for FrameworkLinkRule {
    fn requirement(&self) -> Requirement {
        Requirement::FrameworkLink
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn evaluate(&self, doc: &Document) -> Result<Finding, RuleError> {
        let links: Vec<_> = doc
            .elements()
            .into_iter()
            .filter(|el| el.tag() == "link")
            .filter(|el| {
                el.attr("href")
                    .map(|href| self.href_pattern.is_match(&href))
                    .unwrap_or(false)
            })
            .collect();

        if links.is_empty() {
            return Ok(Finding::new(
                self.requirement(),
                self.weight,
                0.0,
                false,
                "Bootstrap CSS link not found".to_string(),
            ));
        }

        Ok(Finding::new(
            self.requirement(),
            self.weight,
            self.weight,
            true,
            format!(
                "Bootstrap CSS is properly linked ({} link(s) found)",
                links.len()
            ),
        )
        .with_evidence(links[0].opening_tag()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_detects_bootstrap_link() {
        let rule = FrameworkLinkRule::default();
        let doc = Document::parse(
            "<head><link rel=\"stylesheet\" href=\"css/bootstrap.min.css\"></head>",
        )
        .unwrap();
        let finding = rule.evaluate(&doc).unwrap();
        assert!(finding.passed);
        assert_eq!(finding.points, DEFAULT_WEIGHT);
        assert!(finding.evidence.unwrap().contains("bootstrap.min.css"));
    }

    #[test]
    fn positive_detects_cdn_link() {
        let rule = FrameworkLinkRule::default();
        let doc = Document::parse(
            "<link href=\"https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.css\" rel=\"stylesheet\">",
        )
        .unwrap();
        assert!(rule.evaluate(&doc).unwrap().passed);
    }

    #[test]
    fn negative_other_stylesheet() {
        let rule = FrameworkLinkRule::default();
        let doc =
            Document::parse("<link rel=\"stylesheet\" href=\"css/styles.css\">").unwrap();
        let finding = rule.evaluate(&doc).unwrap();
        assert!(!finding.passed);
        assert_eq!(finding.points, 0.0);
        assert!(finding.evidence.is_none());
    }

    #[test]
    fn negative_bootstrap_script_not_counted() {
        let rule = FrameworkLinkRule::default();
        let doc =
            Document::parse("<script src=\"js/bootstrap.bundle.min.js\"></script>").unwrap();
        assert!(!rule.evaluate(&doc).unwrap().passed);
    }
}
