//! Gridmark: layout grader for Bootstrap grid pages
//!
//! This library inspects HTML documents for Bootstrap grid markup (container,
//! rows, columns, alignment utilities) and produces a scored grading report
//! with per-requirement feedback.

pub mod analyzer;
pub mod cache;
pub mod config;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod history;
pub mod parser;
pub mod reporter;
pub mod watcher;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Maximum length of a Finding's markup evidence excerpt
pub const EVIDENCE_MAX_LEN: usize = 120;

/// Grading requirements, one per rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Requirement {
    /// Bootstrap CSS is linked via a <link> element
    FrameworkLink,
    /// A container class is present
    Container,
    /// Enough row-marker elements
    Rows,
    /// Enough column elements (col / col-*)
    Columns,
    /// justify-content-* alignment classes
    HorizontalAlignment,
    /// align-items-* alignment classes
    VerticalAlignment,
    /// Container with several direct-child rows (strict set)
    RowNesting,
    /// Breadth of spacing/display utility classes (strict set)
    UtilityClasses,
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Requirement::FrameworkLink => write!(f, "framework-link"),
            Requirement::Container => write!(f, "container"),
            Requirement::Rows => write!(f, "rows"),
            Requirement::Columns => write!(f, "columns"),
            Requirement::HorizontalAlignment => write!(f, "horizontal-alignment"),
            Requirement::VerticalAlignment => write!(f, "vertical-alignment"),
            Requirement::RowNesting => write!(f, "row-nesting"),
            Requirement::UtilityClasses => write!(f, "utility-classes"),
        }
    }
}

/// The outcome of evaluating one rule against a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Requirement this finding reports on
    pub requirement: Requirement,
    /// Maximum points obtainable from this rule
    pub weight: f64,
    /// Points awarded (0 <= points <= weight, may be fractional)
    pub points: f64,
    /// Whether the rule's pass threshold was met
    pub passed: bool,
    /// Human-readable feedback
    pub message: String,
    /// Excerpt of the first matching element's opening tag (bounded length)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

impl Finding {
    /// Create a finding, clamping points into `0.0..=weight`
    pub fn new(
        requirement: Requirement,
        weight: f64,
        points: f64,
        passed: bool,
        message: String,
    ) -> Self {
        Self {
            requirement,
            weight,
            points: points.clamp(0.0, weight),
            passed,
            message,
            evidence: None,
        }
    }

    /// Attach a markup excerpt, truncated to [`EVIDENCE_MAX_LEN`]
    pub fn with_evidence(mut self, excerpt: String) -> Self {
        let excerpt = if excerpt.chars().count() > EVIDENCE_MAX_LEN {
            let truncated: String = excerpt.chars().take(EVIDENCE_MAX_LEN).collect();
            format!("{}...", truncated)
        } else {
            excerpt
        };
        self.evidence = Some(excerpt);
        self
    }
}

/// The full grading result for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    /// Path of the graded document
    pub file_path: PathBuf,
    /// Per-rule findings, in declared rule order
    pub findings: Vec<Finding>,
    /// Sum of points across findings
    pub total_points: f64,
    /// Sum of weights across findings
    pub max_points: f64,
    /// total / max * 100
    pub percentage: f64,
    /// Grade label from the configured scale
    pub grade: String,
}

impl GradeReport {
    /// Number of findings whose pass threshold was met
    pub fn passed_count(&self) -> usize {
        self.findings.iter().filter(|f| f.passed).count()
    }

    /// Findings that did not meet their threshold, in rule order
    pub fn failed(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.passed)
    }
}

/// Public API: grade a single HTML file with the default configuration.
///
/// * `path` - path to the HTML file
/// * `work_dir` - directory for config lookup (searches `.gridmarkrc.json` upward)
/// * `config_path` - optional explicit config path
pub fn grade_file(
    path: &std::path::Path,
    work_dir: &std::path::Path,
    config_path: Option<&std::path::Path>,
) -> anyhow::Result<GradeReport> {
    let config = crate::config::load_config(work_dir, config_path).unwrap_or_default();
    let engine = crate::analyzer::GradingEngine::from_config(&config);
    engine.grade_file(path)
}
