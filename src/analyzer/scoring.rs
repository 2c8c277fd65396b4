//! Percentage-to-grade mapping and report advice

use crate::{GradeReport, Requirement};
use std::collections::HashMap;

/// Ordered percentage bands mapping to grade labels. The last band is the
/// catch-all for everything below the other minimums.
#[derive(Debug, Clone)]
pub struct GradeScale {
    bands: Vec<(String, f64)>,
}

impl GradeScale {
    /// Letter rubric: >=90 A, >=80 B, >=70 C, else F
    pub fn letters() -> Self {
        Self {
            bands: vec![
                ("A".to_string(), 90.0),
                ("B".to_string(), 80.0),
                ("C".to_string(), 70.0),
                ("F".to_string(), 0.0),
            ],
        }
    }

    /// Coarse rubric: >=90 Excellent, >=70 Good, else Needs improvement
    pub fn tiers() -> Self {
        Self {
            bands: vec![
                ("Excellent".to_string(), 90.0),
                ("Good".to_string(), 70.0),
                ("Needs improvement".to_string(), 0.0),
            ],
        }
    }

    /// Custom thresholds from config. Bands are ordered by minimum
    /// percentage descending, label ascending on ties, so the mapping is
    /// deterministic regardless of map iteration order.
    pub fn from_thresholds(thresholds: &HashMap<String, f64>) -> Self {
        let mut bands: Vec<(String, f64)> =
            thresholds.iter().map(|(k, v)| (k.clone(), *v)).collect();
        bands.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        Self { bands }
    }

    /// Grade label for a percentage
    pub fn grade(&self, percentage: f64) -> &str {
        for (label, min) in &self.bands {
            if percentage >= *min {
                return label;
            }
        }
        self.bands.last().map(|(l, _)| l.as_str()).unwrap_or("F")
    }

    /// One-line description for console output
    pub fn description(label: &str) -> &'static str {
        match label {
            "A" | "Excellent" => "Excellent work - the grid layout meets all requirements",
            "B" => "Good - most requirements met with minor gaps",
            "C" | "Good" => "Fair - the basics are there but several checks fall short",
            _ => "Needs work - review the requirements below",
        }
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::letters()
    }
}

/// Advice for each failed requirement, in finding order
pub fn recommendations(report: &GradeReport) -> Vec<String> {
    let mut recs = Vec::new();

    for finding in report.failed() {
        let advice = match finding.requirement {
            Requirement::FrameworkLink => {
                "Link the Bootstrap stylesheet in <head> (e.g. bootstrap.min.css)"
            }
            Requirement::Container => {
                "Wrap the page content in a container or container-fluid element"
            }
            Requirement::Rows => "Add more row elements to structure the layout",
            Requirement::Columns => "Add more col-* columns inside your rows",
            Requirement::HorizontalAlignment => {
                "Use justify-content-* classes to align columns horizontally"
            }
            Requirement::VerticalAlignment => {
                "Use align-items-* classes to align columns vertically"
            }
            Requirement::RowNesting => {
                "Keep rows as direct children of a container, not buried in wrappers"
            }
            Requirement::UtilityClasses => {
                "Use spacing and display utilities (m-*, p-*, d-*) across more elements"
            }
        };
        recs.push(advice.to_string());
    }

    if recs.is_empty() {
        recs.push(
            "The grid layout is in good shape. Consider responsive col-md-*/col-lg-* variants."
                .to_string(),
        );
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Finding;
    use std::path::PathBuf;

    #[test]
    fn letter_scale_boundaries() {
        let scale = GradeScale::letters();
        assert_eq!(scale.grade(100.0), "A");
        assert_eq!(scale.grade(90.0), "A");
        assert_eq!(scale.grade(89.9), "B");
        assert_eq!(scale.grade(80.0), "B");
        assert_eq!(scale.grade(79.9), "C");
        assert_eq!(scale.grade(70.0), "C");
        assert_eq!(scale.grade(69.9), "F");
        assert_eq!(scale.grade(0.0), "F");
    }

    #[test]
    fn tier_scale_boundaries() {
        let scale = GradeScale::tiers();
        assert_eq!(scale.grade(95.0), "Excellent");
        assert_eq!(scale.grade(90.0), "Excellent");
        assert_eq!(scale.grade(89.9), "Good");
        assert_eq!(scale.grade(70.0), "Good");
        assert_eq!(scale.grade(69.9), "Needs improvement");
        assert_eq!(scale.grade(0.0), "Needs improvement");
    }

    #[test]
    fn custom_thresholds_sorted_descending() {
        let mut thresholds = HashMap::new();
        thresholds.insert("Pass".to_string(), 60.0);
        thresholds.insert("Merit".to_string(), 75.0);
        thresholds.insert("Distinction".to_string(), 90.0);
        thresholds.insert("Fail".to_string(), 0.0);
        let scale = GradeScale::from_thresholds(&thresholds);
        assert_eq!(scale.grade(92.0), "Distinction");
        assert_eq!(scale.grade(80.0), "Merit");
        assert_eq!(scale.grade(65.0), "Pass");
        assert_eq!(scale.grade(10.0), "Fail");
    }

    #[test]
    fn tied_thresholds_break_by_label() {
        let mut thresholds = HashMap::new();
        thresholds.insert("Beta".to_string(), 50.0);
        thresholds.insert("Alpha".to_string(), 50.0);
        thresholds.insert("Rest".to_string(), 0.0);
        let scale = GradeScale::from_thresholds(&thresholds);
        assert_eq!(scale.grade(60.0), "Alpha");
    }

    #[test]
    fn recommendations_list_failed_requirements() {
        let report = GradeReport {
            file_path: PathBuf::from("page.html"),
            findings: vec![
                Finding::new(Requirement::FrameworkLink, 10.0, 10.0, true, "ok".into()),
                Finding::new(Requirement::Rows, 15.0, 5.0, false, "low".into()),
                Finding::new(Requirement::Columns, 15.0, 0.0, false, "none".into()),
            ],
            total_points: 15.0,
            max_points: 40.0,
            percentage: 37.5,
            grade: "F".to_string(),
        };
        let recs = recommendations(&report);
        assert_eq!(recs.len(), 2);
        assert!(recs[0].contains("row"));
        assert!(recs[1].contains("col"));
    }

    #[test]
    fn recommendations_all_passed() {
        let report = GradeReport {
            file_path: PathBuf::from("page.html"),
            findings: vec![Finding::new(
                Requirement::Container,
                15.0,
                15.0,
                true,
                "ok".into(),
            )],
            total_points: 15.0,
            max_points: 15.0,
            percentage: 100.0,
            grade: "A".to_string(),
        };
        let recs = recommendations(&report);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("good shape"));
    }

    #[test]
    fn grade_descriptions() {
        assert!(GradeScale::description("A").contains("Excellent"));
        assert!(GradeScale::description("B").contains("Good"));
        assert!(GradeScale::description("F").contains("Needs work"));
        assert!(GradeScale::description("Needs improvement").contains("Needs work"));
    }
}
