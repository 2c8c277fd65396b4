//! Config schema and deserialization

use crate::analyzer::scoring::GradeScale;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which rule set to grade with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleSetVariant {
    /// The six core checks
    #[default]
    Basic,
    /// Core checks plus structural nesting and utility breadth, with a
    /// higher row threshold
    Strict,
}

/// Root config structure for .gridmarkrc.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Rule set variant. Default: basic
    #[serde(default)]
    pub rule_set: RuleSetVariant,

    /// Per-requirement weight overrides. Key is the requirement name in
    /// kebab-case (e.g. "vertical-alignment"), value is the max points.
    #[serde(default)]
    pub weights: HashMap<String, f64>,

    /// Custom grade thresholds: label -> minimum percentage. When absent
    /// the letter rubric (A/B/C/F) applies.
    #[serde(default)]
    pub thresholds: Option<HashMap<String, f64>>,

    /// Minimum passing percentage (exit 1 if any page falls below)
    #[serde(default)]
    pub threshold: Option<f64>,

    /// Glob patterns for files/directories to exclude when grading a
    /// directory
    #[serde(default)]
    pub ignore: Vec<String>,

    /// File suffixes treated as gradable pages (default: .html, .htm)
    #[serde(default)]
    pub page_patterns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rule_set: RuleSetVariant::Basic,
            weights: HashMap::new(),
            thresholds: None,
            threshold: None,
            ignore: Vec::new(),
            page_patterns: Vec::new(),
        }
    }
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_threshold: Option<f64>, cli_strict: bool) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        if cli_strict {
            self.rule_set = RuleSetVariant::Strict;
        }
        self
    }

    /// Grade scale this config selects
    pub fn grade_scale(&self) -> GradeScale {
        match &self.thresholds {
            Some(thresholds) => GradeScale::from_thresholds(thresholds),
            None => GradeScale::letters(),
        }
    }

    /// Get page file suffixes
    pub fn get_page_patterns(&self) -> Vec<&str> {
        if self.page_patterns.is_empty() {
            vec![".html", ".htm"]
        } else {
            self.page_patterns.iter().map(|s| s.as_str()).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.rule_set, RuleSetVariant::Basic);
        assert!(config.weights.is_empty());
        assert!(config.thresholds.is_none());
        assert_eq!(config.get_page_patterns(), vec![".html", ".htm"]);
    }

    #[test]
    fn parses_full_config() {
        let config: Config = serde_json::from_str(
            r#"{
                "ruleSet": "strict",
                "threshold": 75,
                "weights": { "rows": 20, "vertical-alignment": 20 },
                "thresholds": { "Excellent": 90, "Good": 70, "Needs improvement": 0 },
                "ignore": ["**/vendor/**"],
                "pagePatterns": [".html"]
            }"#,
        )
        .unwrap();
        assert_eq!(config.rule_set, RuleSetVariant::Strict);
        assert_eq!(config.threshold, Some(75.0));
        assert_eq!(config.weights["rows"], 20.0);
        assert_eq!(config.grade_scale().grade(95.0), "Excellent");
        assert_eq!(config.get_page_patterns(), vec![".html"]);
    }

    #[test]
    fn cli_threshold_overrides_config() {
        let config: Config = serde_json::from_str(r#"{ "threshold": 60 }"#).unwrap();
        let merged = config.merge_with_cli(Some(85.0), false);
        assert_eq!(merged.threshold, Some(85.0));
    }

    #[test]
    fn cli_threshold_absent_keeps_config() {
        let config: Config = serde_json::from_str(r#"{ "threshold": 60 }"#).unwrap();
        let merged = config.merge_with_cli(None, false);
        assert_eq!(merged.threshold, Some(60.0));
    }

    #[test]
    fn cli_strict_switches_rule_set() {
        let config = Config::default().merge_with_cli(None, true);
        assert_eq!(config.rule_set, RuleSetVariant::Strict);
    }

    #[test]
    fn default_scale_is_letters() {
        let config = Config::default();
        assert_eq!(config.grade_scale().grade(85.0), "B");
    }
}
