//! Grading engine - runs the configured rule set over a document

use crate::analyzer::rules::{
    columns, container, framework_link, horizontal_alignment, row_nesting, rows, utility_classes,
    vertical_alignment, ColumnsRule, ContainerRule, FrameworkLinkRule, GradingRule,
    HorizontalAlignmentRule, RowNestingRule, RowsRule, UtilityClassesRule, VerticalAlignmentRule,
};
use crate::analyzer::scoring::GradeScale;
use crate::config::{Config, RuleSetVariant};
use crate::parser::Document;
use crate::{Finding, GradeReport, Requirement};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Runs every rule of a rule set against a document and aggregates the
/// findings into a [`GradeReport`]. Rules are independent: no outcome
/// gates another rule, and rule order only fixes the findings order.
pub struct GradingEngine {
    rules: Vec<Box<dyn GradingRule + Send + Sync>>,
    scale: GradeScale,
}

impl GradingEngine {
    /// Basic rule set with default weights and the letter scale
    pub fn new() -> Self {
        Self::with_rule_set(RuleSetVariant::Basic, &HashMap::new(), GradeScale::letters())
    }

    /// Strict rule set with default weights and the letter scale
    pub fn strict() -> Self {
        Self::with_rule_set(
            RuleSetVariant::Strict,
            &HashMap::new(),
            GradeScale::letters(),
        )
    }

    /// Build the engine a config describes: rule set variant, per-rule
    /// weight overrides, and grade thresholds.
    pub fn from_config(config: &Config) -> Self {
        Self::with_rule_set(config.rule_set, &config.weights, config.grade_scale())
    }

    fn with_rule_set(
        variant: RuleSetVariant,
        overrides: &HashMap<String, f64>,
        scale: GradeScale,
    ) -> Self {
        let w = |req: Requirement, default: f64| -> f64 {
            overrides.get(&req.to_string()).copied().unwrap_or(default)
        };

        let mut rules: Vec<Box<dyn GradingRule + Send + Sync>> = Vec::new();
        match variant {
            RuleSetVariant::Basic => {
                rules.push(Box::new(FrameworkLinkRule::new(w(
                    Requirement::FrameworkLink,
                    framework_link::DEFAULT_WEIGHT,
                ))));
                rules.push(Box::new(ContainerRule::new(w(
                    Requirement::Container,
                    container::DEFAULT_WEIGHT,
                ))));
                rules.push(Box::new(RowsRule::new(
                    w(Requirement::Rows, rows::DEFAULT_WEIGHT),
                    rows::DEFAULT_THRESHOLD,
                )));
                rules.push(Box::new(ColumnsRule::new(
                    w(Requirement::Columns, columns::DEFAULT_WEIGHT),
                    columns::DEFAULT_THRESHOLD,
                )));
                rules.push(Box::new(HorizontalAlignmentRule::new(
                    w(
                        Requirement::HorizontalAlignment,
                        horizontal_alignment::DEFAULT_WEIGHT,
                    ),
                    horizontal_alignment::DEFAULT_THRESHOLD,
                )));
                rules.push(Box::new(VerticalAlignmentRule::new(
                    w(
                        Requirement::VerticalAlignment,
                        vertical_alignment::DEFAULT_WEIGHT,
                    ),
                    vertical_alignment::DEFAULT_THRESHOLD,
                )));
            }
            RuleSetVariant::Strict => {
                // Strict defaults re-balance to a 100-point maximum to make
                // room for the structural rules.
                rules.push(Box::new(FrameworkLinkRule::new(w(
                    Requirement::FrameworkLink,
                    10.0,
                ))));
                rules.push(Box::new(ContainerRule::new(w(
                    Requirement::Container,
                    10.0,
                ))));
                rules.push(Box::new(RowsRule::new(
                    w(Requirement::Rows, 15.0),
                    rows::STRICT_THRESHOLD,
                )));
                rules.push(Box::new(ColumnsRule::new(
                    w(Requirement::Columns, 15.0),
                    columns::DEFAULT_THRESHOLD,
                )));
                rules.push(Box::new(HorizontalAlignmentRule::new(
                    w(Requirement::HorizontalAlignment, 15.0),
                    horizontal_alignment::DEFAULT_THRESHOLD,
                )));
                rules.push(Box::new(VerticalAlignmentRule::new(
                    w(Requirement::VerticalAlignment, 15.0),
                    vertical_alignment::DEFAULT_THRESHOLD,
                )));
                rules.push(Box::new(RowNestingRule::new(
                    w(Requirement::RowNesting, row_nesting::DEFAULT_WEIGHT),
                    row_nesting::DEFAULT_THRESHOLD,
                )));
                rules.push(Box::new(UtilityClassesRule::new(
                    w(Requirement::UtilityClasses, utility_classes::DEFAULT_WEIGHT),
                    utility_classes::DEFAULT_THRESHOLD,
                )));
            }
        }

        Self { rules, scale }
    }

    /// Grade markup already in memory. Use a virtual path for display
    /// (e.g. a URL or `stdin.html`).
    pub fn grade_str(&self, html: &str, virtual_path: &Path) -> Result<GradeReport> {
        let doc = Document::parse(html)
            .with_context(|| format!("Cannot grade {}", virtual_path.display()))?;
        Ok(self.grade_document(&doc, virtual_path))
    }

    /// Read and grade an HTML file
    pub fn grade_file(&self, path: &Path) -> Result<GradeReport> {
        let html = fs::read_to_string(path)
            .with_context(|| format!("Failed to read page: {}", path.display()))?;
        self.grade_str(&html, path)
    }

    /// Grade a parsed document. Pure: the report depends only on the
    /// document and the configured rule set.
    pub fn grade_document(&self, doc: &Document, path: &Path) -> GradeReport {
        let mut findings = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let finding = match rule.evaluate(doc) {
                Ok(finding) => finding,
                // A rule that cannot traverse the tree degrades to zero
                // points; the rest of the report is still produced.
                Err(e) => Finding::new(
                    rule.requirement(),
                    rule.weight(),
                    0.0,
                    false,
                    format!("Could not evaluate: {}", e),
                ),
            };
            findings.push(finding);
        }

        let total_points: f64 = findings.iter().map(|f| f.points).sum();
        let max_points: f64 = findings.iter().map(|f| f.weight).sum();
        let percentage = if max_points > 0.0 {
            total_points / max_points * 100.0
        } else {
            0.0
        };
        let grade = self.scale.grade(percentage).to_string();

        GradeReport {
            file_path: path.to_path_buf(),
            findings,
            total_points,
            max_points,
            percentage,
            grade,
        }
    }

    /// Grade multiple files sequentially
    pub fn grade_many(&self, paths: &[&Path]) -> Vec<Result<GradeReport>> {
        paths.iter().map(|p| self.grade_file(p)).collect()
    }

    /// Grade multiple files in parallel using rayon
    pub fn grade_parallel(&self, paths: &[PathBuf]) -> Vec<Result<GradeReport>> {
        use rayon::prelude::*;

        paths.par_iter().map(|p| self.grade_file(p)).collect()
    }

    /// Aggregate stats across multiple reports
    pub fn aggregate_stats(&self, reports: &[GradeReport]) -> AggregateStats {
        if reports.is_empty() {
            return AggregateStats {
                files_graded: 0,
                average_percentage: 0.0,
                average_grade: self.scale.grade(0.0).to_string(),
                total_passed: 0,
                total_findings: 0,
            };
        }

        let average_percentage =
            reports.iter().map(|r| r.percentage).sum::<f64>() / reports.len() as f64;
        let total_passed = reports.iter().map(|r| r.passed_count()).sum();
        let total_findings = reports.iter().map(|r| r.findings.len()).sum();

        AggregateStats {
            files_graded: reports.len(),
            average_percentage,
            average_grade: self.scale.grade(average_percentage).to_string(),
            total_passed,
            total_findings,
        }
    }
}

impl Default for GradingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate statistics from grading multiple pages
#[derive(Debug)]
pub struct AggregateStats {
    /// Number of pages graded
    pub files_graded: usize,
    /// Mean percentage across all pages
    pub average_percentage: f64,
    /// Grade label for the mean percentage
    pub average_grade: String,
    /// Findings that passed, across all pages
    pub total_passed: usize,
    /// Total findings across all pages
    pub total_findings: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::RuleError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Page meeting every basic requirement
    const FULL_MARKS: &str = r#"<!DOCTYPE html>
<html><head><link rel="stylesheet" href="css/bootstrap.min.css"></head>
<body><div class="container">
  <div class="row justify-content-center align-items-center">
    <div class="col-4"></div><div class="col-4"></div><div class="col-4"></div>
  </div>
  <div class="row justify-content-between align-items-start">
    <div class="col-6"></div><div class="col-6"></div>
  </div>
  <div class="row align-items-end">
    <div class="col"></div><div class="col"></div><div class="col"></div>
  </div>
</div></body></html>"#;

    /// Page with none of the expected markup
    const BARE_PAGE: &str = "<html><body><p>hello</p></body></html>";

    fn make_page(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".html").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn full_marks_page_gets_an_a() {
        let engine = GradingEngine::new();
        let report = engine.grade_str(FULL_MARKS, Path::new("full.html")).unwrap();
        assert_eq!(report.total_points, 100.0);
        assert_eq!(report.max_points, 100.0);
        assert_eq!(report.percentage, 100.0);
        assert_eq!(report.grade, "A");
        assert!(report.findings.iter().all(|f| f.passed));
    }

    #[test]
    fn bare_page_fails_every_rule() {
        let engine = GradingEngine::new();
        let report = engine.grade_str(BARE_PAGE, Path::new("bare.html")).unwrap();
        assert_eq!(report.total_points, 0.0);
        assert_eq!(report.grade, "F");
        assert!(report.findings.iter().all(|f| !f.passed));
        assert_eq!(report.findings.len(), 6);
    }

    #[test]
    fn partial_rows_still_produce_a_report() {
        let html = r#"<div class="container">
            <div class="row"></div><div class="row"></div>
        </div>"#;
        let engine = GradingEngine::new();
        let report = engine.grade_str(html, Path::new("partial.html")).unwrap();
        let rows = report
            .findings
            .iter()
            .find(|f| f.requirement == Requirement::Rows)
            .unwrap();
        assert!(!rows.passed);
        assert_eq!(rows.points, 10.0);
        assert_eq!(report.findings.len(), 6);
    }

    #[test]
    fn empty_input_aborts_before_rules() {
        let engine = GradingEngine::new();
        let err = engine.grade_str("", Path::new("empty.html")).unwrap_err();
        assert!(err.to_string().contains("empty.html"));
    }

    #[test]
    fn grading_is_deterministic_and_idempotent() {
        let engine = GradingEngine::new();
        let a = engine.grade_str(FULL_MARKS, Path::new("p.html")).unwrap();
        let b = engine.grade_str(FULL_MARKS, Path::new("p.html")).unwrap();
        assert_eq!(a, b);
        let json_a = serde_json::to_string(&a).unwrap();
        let json_b = serde_json::to_string(&b).unwrap();
        assert_eq!(json_a, json_b);
    }

    #[test]
    fn total_never_exceeds_max() {
        let engine = GradingEngine::new();
        for html in [FULL_MARKS, BARE_PAGE, "<div class=\"row col container\"></div>"] {
            let report = engine.grade_str(html, Path::new("p.html")).unwrap();
            assert!(report.total_points <= report.max_points + 1e-9);
        }
    }

    #[test]
    fn findings_keep_declared_rule_order() {
        let engine = GradingEngine::new();
        let report = engine.grade_str(BARE_PAGE, Path::new("p.html")).unwrap();
        let order: Vec<Requirement> = report.findings.iter().map(|f| f.requirement).collect();
        assert_eq!(
            order,
            vec![
                Requirement::FrameworkLink,
                Requirement::Container,
                Requirement::Rows,
                Requirement::Columns,
                Requirement::HorizontalAlignment,
                Requirement::VerticalAlignment,
            ]
        );
    }

    #[test]
    fn strict_engine_adds_structural_rules() {
        let engine = GradingEngine::strict();
        let report = engine.grade_str(BARE_PAGE, Path::new("p.html")).unwrap();
        assert_eq!(report.findings.len(), 8);
        assert_eq!(report.max_points, 100.0);
        assert!(report
            .findings
            .iter()
            .any(|f| f.requirement == Requirement::RowNesting));
        assert!(report
            .findings
            .iter()
            .any(|f| f.requirement == Requirement::UtilityClasses));
    }

    #[test]
    fn config_weight_override_changes_max() {
        let config: Config = serde_json::from_str(
            r#"{ "weights": { "framework-link": 30 } }"#,
        )
        .unwrap();
        let engine = GradingEngine::from_config(&config);
        let report = engine.grade_str(BARE_PAGE, Path::new("p.html")).unwrap();
        assert_eq!(report.max_points, 120.0);
        let link = report
            .findings
            .iter()
            .find(|f| f.requirement == Requirement::FrameworkLink)
            .unwrap();
        assert_eq!(link.weight, 30.0);
    }

    #[test]
    fn config_tier_thresholds_change_labels() {
        let config: Config = serde_json::from_str(
            r#"{ "thresholds": { "Excellent": 90, "Good": 70, "Needs improvement": 0 } }"#,
        )
        .unwrap();
        let engine = GradingEngine::from_config(&config);
        let top = engine.grade_str(FULL_MARKS, Path::new("p.html")).unwrap();
        assert_eq!(top.grade, "Excellent");
        let bottom = engine.grade_str(BARE_PAGE, Path::new("p.html")).unwrap();
        assert_eq!(bottom.grade, "Needs improvement");
    }

    #[test]
    fn broken_rule_degrades_to_zero_points() {
        struct AlwaysFails;
        impl GradingRule for AlwaysFails {
            fn requirement(&self) -> Requirement {
                Requirement::Container
            }
            fn weight(&self) -> f64 {
                15.0
            }
            fn evaluate(&self, _doc: &Document) -> Result<Finding, RuleError> {
                Err(RuleError::Traversal("attribute soup".to_string()))
            }
        }

        let engine = GradingEngine {
            rules: vec![Box::new(AlwaysFails), Box::new(RowsRule::default())],
            scale: GradeScale::letters(),
        };
        let report = engine
            .grade_str("<div class=\"row\"></div>", Path::new("p.html"))
            .unwrap();
        // The broken rule yields a zero-point finding, the other rule still runs
        assert_eq!(report.findings.len(), 2);
        assert_eq!(report.findings[0].points, 0.0);
        assert!(report.findings[0].message.contains("Could not evaluate"));
        assert_eq!(report.findings[1].points, 5.0);
    }

    #[test]
    fn grade_file_reads_from_disk() {
        let file = make_page(FULL_MARKS);
        let engine = GradingEngine::new();
        let report = engine.grade_file(file.path()).unwrap();
        assert_eq!(report.grade, "A");
        assert_eq!(report.file_path, file.path());
    }

    #[test]
    fn grade_file_missing_path_errors() {
        let engine = GradingEngine::new();
        let err = engine.grade_file(Path::new("no-such-page.html")).unwrap_err();
        assert!(err.to_string().contains("no-such-page.html"));
    }

    #[test]
    fn grade_parallel_matches_sequential() {
        let f1 = make_page(FULL_MARKS);
        let f2 = make_page(BARE_PAGE);
        let engine = GradingEngine::new();

        let sequential: Vec<_> = engine
            .grade_many(&[f1.path(), f2.path()])
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        let parallel: Vec<_> = engine
            .grade_parallel(&[f1.path().to_path_buf(), f2.path().to_path_buf()])
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn aggregate_stats_empty() {
        let engine = GradingEngine::new();
        let stats = engine.aggregate_stats(&[]);
        assert_eq!(stats.files_graded, 0);
        assert_eq!(stats.average_percentage, 0.0);
        assert_eq!(stats.average_grade, "F");
    }

    #[test]
    fn aggregate_stats_averages_percentages() {
        let engine = GradingEngine::new();
        let a = engine.grade_str(FULL_MARKS, Path::new("a.html")).unwrap();
        let b = engine.grade_str(BARE_PAGE, Path::new("b.html")).unwrap();
        let stats = engine.aggregate_stats(&[a.clone(), b.clone()]);
        assert_eq!(stats.files_graded, 2);
        let expected = (a.percentage + b.percentage) / 2.0;
        assert!((stats.average_percentage - expected).abs() < 1e-9);
        assert_eq!(stats.total_findings, 12);
    }
}
