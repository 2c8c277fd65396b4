//! Console reporter with colored output

use crate::analyzer::engine::AggregateStats;
use crate::analyzer::scoring::{self, GradeScale};
use crate::{Finding, GradeReport};
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to show verbose output (evidence excerpts)
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single grading result
    pub fn report(&self, report: &GradeReport) {
        self.print_header(report);
        self.print_score(report);
        self.print_findings(report);
        self.print_recommendations(report);
        println!();
    }

    /// Report multiple results with summary
    pub fn report_many(&self, reports: &[GradeReport], stats: &AggregateStats) {
        for report in reports {
            self.report(report);
            println!("{}", "─".repeat(60));
        }

        self.print_summary(stats);
    }

    /// Report in quiet mode (just the score line)
    pub fn report_quiet(&self, report: &GradeReport) {
        let grade = self.colorize_grade(&report.grade, report.percentage);
        println!(
            "{}: {:.1}% ({})",
            report.file_path.display(),
            report.percentage,
            grade
        );
    }

    fn print_header(&self, report: &GradeReport) {
        println!();
        println!(
            "{}",
            format!("Grid Layout Report: {}", report.file_path.display()).bold()
        );
        println!(
            "   Checks: {} | Passed: {}",
            report.findings.len(),
            report.passed_count()
        );
        println!();
    }

    fn print_score(&self, report: &GradeReport) {
        let bar = self.create_score_bar(report.percentage);
        let grade = self.colorize_grade(&report.grade, report.percentage);
        println!(
            "   Score: {} {:.1}/{:.0} ({:.1}%) {}",
            bar,
            report.total_points,
            report.max_points,
            report.percentage,
            grade.bold()
        );
        println!("   {}", GradeScale::description(&report.grade).dimmed());
        println!();
    }

    fn print_findings(&self, report: &GradeReport) {
        println!("   {}", "Requirements:".bold());
        for finding in &report.findings {
            self.print_finding(finding);
        }
        println!();
    }

    fn print_finding(&self, finding: &Finding) {
        let mark = if finding.passed {
            "✓".green()
        } else {
            "✗".red()
        };
        let points = format!("{:>5.1}/{:<4.1}", finding.points, finding.weight);
        let points = if finding.passed {
            points.green()
        } else if finding.points > 0.0 {
            points.yellow()
        } else {
            points.red()
        };
        println!(
            "   {} {} {} - {}",
            mark, points, finding.requirement, finding.message
        );
        if self.verbose {
            if let Some(ref evidence) = finding.evidence {
                println!("              {}", evidence.dimmed());
            }
        }
    }

    fn print_recommendations(&self, report: &GradeReport) {
        if report.failed().next().is_none() {
            return;
        }
        println!("   {}", "Recommendations:".bold());
        for rec in scoring::recommendations(report) {
            println!("   - {}", rec);
        }
    }

    fn print_summary(&self, stats: &AggregateStats) {
        println!();
        println!("{}", "Summary".bold());
        println!("   Pages graded: {}", stats.files_graded);
        println!(
            "   Average: {:.1}% ({})",
            stats.average_percentage,
            self.colorize_grade(&stats.average_grade, stats.average_percentage)
        );
        println!(
            "   Checks passed: {}/{}",
            stats.total_passed, stats.total_findings
        );
        println!();
    }

    fn create_score_bar(&self, percentage: f64) -> String {
        let filled = ((percentage / 100.0) * 20.0).round() as usize;
        let filled = filled.min(20);
        format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled))
    }

    fn colorize_grade(&self, grade: &str, percentage: f64) -> colored::ColoredString {
        if percentage >= 90.0 {
            grade.green()
        } else if percentage >= 70.0 {
            grade.yellow()
        } else {
            grade.red()
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bar_bounds() {
        let reporter = ConsoleReporter::new();
        assert_eq!(reporter.create_score_bar(0.0), "░".repeat(20));
        assert_eq!(reporter.create_score_bar(100.0), "█".repeat(20));
        let half = reporter.create_score_bar(50.0);
        assert_eq!(half.chars().filter(|c| *c == '█').count(), 10);
    }

    #[test]
    fn score_bar_never_overflows() {
        let reporter = ConsoleReporter::new();
        let bar = reporter.create_score_bar(150.0);
        assert_eq!(bar.chars().count(), 20);
    }
}
