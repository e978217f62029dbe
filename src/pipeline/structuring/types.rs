use serde::{Deserialize, Serialize};

use super::huggingface_types::GenerationResponse;
use super::StructuringError;

/// Severity of a single finding. Closed set: anything that is not a
/// recognised warning or abnormal token ends up `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingStatus {
    Normal,
    Warning,
    Abnormal,
}

impl FindingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Abnormal => "abnormal",
        }
    }
}

impl std::fmt::Display for FindingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted metric, e.g. `Blood Glucose / 145 mg/dL / abnormal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub name: String,
    /// Display string, units included.
    pub value: String,
    pub status: FindingStatus,
}

impl Finding {
    pub fn new(name: impl Into<String>, value: impl Into<String>, status: FindingStatus) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            status,
        }
    }
}

/// Structured output of one analysis. Built once per upload, never mutated
/// afterwards and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub summary: String,
    pub key_findings: Vec<Finding>,
    pub recommendations: Vec<String>,
    /// Set only when the pipeline failed before anything could be parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisRecord {
    /// Non-empty summary, at least one finding and at least one recommendation.
    pub fn is_complete(&self) -> bool {
        !self.summary.trim().is_empty()
            && !self.key_findings.is_empty()
            && !self.recommendations.is_empty()
            && self.recommendations.iter().all(|r| !r.trim().is_empty())
    }

    pub fn count_with_status(&self, status: FindingStatus) -> usize {
        self.key_findings
            .iter()
            .filter(|f| f.status == status)
            .count()
    }
}

/// Sampling parameters sent with every generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub return_full_text: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 512,
            temperature: 0.2,
            top_p: 0.95,
            return_full_text: false,
        }
    }
}

/// Text-generation backend abstraction (allows mocking).
///
/// Implementations return the decoded payload as-is; shape normalisation
/// happens in the orchestrator.
pub trait GenerationClient {
    fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<GenerationResponse, StructuringError>;
}

impl<T: GenerationClient + ?Sized> GenerationClient for std::sync::Arc<T> {
    fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<GenerationResponse, StructuringError> {
        (**self).generate(prompt, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> AnalysisRecord {
        AnalysisRecord {
            summary: "Mostly fine".into(),
            key_findings: vec![
                Finding::new("Blood Glucose", "145 mg/dL", FindingStatus::Abnormal),
                Finding::new("HDL Cholesterol", "55 mg/dL", FindingStatus::Warning),
            ],
            recommendations: vec!["Recheck fasting glucose in 3 months".into()],
            error: None,
        }
    }

    #[test]
    fn record_serializes_camel_case_without_error() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert!(json.get("keyFindings").is_some());
        assert!(json.get("key_findings").is_none());
        assert!(json.get("error").is_none());
        assert_eq!(json["keyFindings"][0]["status"], "abnormal");
    }

    #[test]
    fn record_deserializes_without_error_field() {
        let json = r#"{
            "summary": "ok",
            "keyFindings": [{"name": "A1C", "value": "5.9 %", "status": "warning"}],
            "recommendations": ["Keep an eye on carbohydrate intake"]
        }"#;
        let record: AnalysisRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.key_findings[0].status, FindingStatus::Warning);
        assert!(record.error.is_none());
    }

    #[test]
    fn unknown_status_is_rejected_by_serde() {
        let json = r#"{"name": "X", "value": "1", "status": "unknown"}"#;
        assert!(serde_json::from_str::<Finding>(json).is_err());
    }

    #[test]
    fn completeness_requires_all_three_parts() {
        let record = sample_record();
        assert!(record.is_complete());

        let mut no_findings = record.clone();
        no_findings.key_findings.clear();
        assert!(!no_findings.is_complete());

        let mut blank_summary = record.clone();
        blank_summary.summary = "  ".into();
        assert!(!blank_summary.is_complete());

        let mut no_recs = record;
        no_recs.recommendations.clear();
        assert!(!no_recs.is_complete());
    }

    #[test]
    fn count_with_status() {
        let record = sample_record();
        assert_eq!(record.count_with_status(FindingStatus::Abnormal), 1);
        assert_eq!(record.count_with_status(FindingStatus::Warning), 1);
        assert_eq!(record.count_with_status(FindingStatus::Normal), 0);
    }

    #[test]
    fn status_display_matches_wire_format() {
        assert_eq!(FindingStatus::Abnormal.to_string(), "abnormal");
        let json = serde_json::to_string(&FindingStatus::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }

    #[test]
    fn default_generation_params() {
        let params = GenerationParams::default();
        assert_eq!(params.max_new_tokens, 512);
        assert!((params.temperature - 0.2).abs() < f32::EPSILON);
        assert!((params.top_p - 0.95).abs() < f32::EPSILON);
        assert!(!params.return_full_text);
    }
}
