//! Generic content used whenever model output is missing or unusable.

use super::lab_values::extract_lab_values;
use super::types::{AnalysisRecord, Finding, FindingStatus};

pub const DEFAULT_SUMMARY: &str =
    "Medical report processed. Please consult a healthcare professional for interpretation.";

pub const DEFAULT_RECOMMENDATIONS: [&str; 2] = [
    "Please consult with a healthcare professional for interpretation of these results",
    "Regular check-ups are recommended for monitoring your health",
];

pub const PLACEHOLDER_FINDING_NAME: &str = "Text Analysis";
pub const PLACEHOLDER_FINDING_VALUE: &str = "Report processed";

const FAILURE_SUMMARY: &str = "We could not automatically analyze this report. \
     Please consult with your healthcare provider for interpretation.";

const FAILURE_RECOMMENDATIONS: [&str; 2] = [
    "Please share this report with your healthcare provider for proper interpretation",
    "Regular health check-ups are recommended",
];

pub fn default_recommendations() -> Vec<String> {
    DEFAULT_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect()
}

pub fn placeholder_finding() -> Finding {
    Finding::new(
        PLACEHOLDER_FINDING_NAME,
        PLACEHOLDER_FINDING_VALUE,
        FindingStatus::Normal,
    )
}

/// `findings`, or the single placeholder when there are none.
pub fn findings_or_placeholder(findings: Vec<Finding>) -> Vec<Finding> {
    if findings.is_empty() {
        vec![placeholder_finding()]
    } else {
        findings
    }
}

/// Record built from the report text alone, for when the generation
/// service is down or returned nothing usable.
pub fn lab_value_record(source_text: &str) -> AnalysisRecord {
    AnalysisRecord {
        summary: DEFAULT_SUMMARY.to_string(),
        key_findings: findings_or_placeholder(extract_lab_values(source_text)),
        recommendations: default_recommendations(),
        error: None,
    }
}

impl AnalysisRecord {
    /// Fully populated record that also carries `error`, so HTTP callers can
    /// render failures the same way as successes.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            summary: FAILURE_SUMMARY.to_string(),
            key_findings: vec![Finding::new(
                "Analysis Status",
                "Failed to process",
                FindingStatus::Warning,
            )],
            recommendations: FAILURE_RECOMMENDATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            error: Some(error.into()),
        }
    }
}
