//! Container class detection

use super::{GradingRule, RuleError};
use crate::parser::Document;
use crate::{Finding, Requirement};
use regex::Regex;

pub const DEFAULT_WEIGHT: f64 = 15.0;

/// Rule for detecting a Bootstrap container element
pub struct ContainerRule {
    weight: f64,
    token_pattern: Regex,
}

impl ContainerRule {
    pub fn new(weight: f64) -> Self {
        Self {
            weight,
            // Whole-token: container plus its responsive/fluid variants
            token_pattern: Regex::new(r"^container(-(sm|md|lg|xl|xxl|fluid))?$").unwrap(),
        }
    }
}

impl Default for ContainerRule {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT)
    }
}

impl GradingRule for ContainerRule {
    fn requirement(&self) -> Requirement {
        Requirement::Container
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn evaluate(&self, doc: &Document) -> Result<Finding, RuleError> {
        let containers = doc.elements_with_class(|t| self.token_pattern.is_match(t));

        if containers.is_empty() {
            return Ok(Finding::new(
                self.requirement(),
                self.weight,
                0.0,
                false,
                "Container class not found".to_string(),
            ));
        }

        Ok(Finding::new(
            self.requirement(),
            self.weight,
            self.weight,
            true,
            format!("Container class found ({} container(s))", containers.len()),
        )
        .with_evidence(containers[0].opening_tag()))
    }
}
