//! JSON reporter for machine-readable output

use crate::analyzer::engine::AggregateStats;
use crate::GradeReport;
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Report a single grading result as JSON
    pub fn report(&self, report: &GradeReport) -> String {
        if self.pretty {
            serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
        }
    }

    /// Report multiple results as a JSON array
    pub fn report_many(&self, reports: &[GradeReport]) -> String {
        if self.pretty {
            serde_json::to_string_pretty(reports).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(reports).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Report with summary
    pub fn report_with_summary(&self, reports: &[GradeReport], stats: &AggregateStats) -> String {
        let output = JsonOutput {
            results: reports,
            summary: JsonSummary {
                files_graded: stats.files_graded,
                average_percentage: stats.average_percentage,
                average_grade: stats.average_grade.clone(),
                total_passed: stats.total_passed,
                total_findings: stats.total_findings,
            },
        };

        if self.pretty {
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: &'a [GradeReport],
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    files_graded: usize,
    average_percentage: f64,
    average_grade: String,
    total_passed: usize,
    total_findings: usize,
}
