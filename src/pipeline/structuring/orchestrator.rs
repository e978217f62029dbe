use uuid::Uuid;

use super::fallback::lab_value_record;
use super::parser::parse_model_response;
use super::prompt::build_analysis_prompt;
use super::types::{AnalysisRecord, GenerationClient, GenerationParams};

/// Turns report text into an [`AnalysisRecord`]:
/// prompt → generate → normalize → parse, with the lab-value record
/// standing in whenever the model gives nothing usable.
pub struct ReportAnalyzer {
    generator: Box<dyn GenerationClient + Send + Sync>,
    params: GenerationParams,
}

impl ReportAnalyzer {
    pub fn new(generator: Box<dyn GenerationClient + Send + Sync>) -> Self {
        Self {
            generator,
            params: GenerationParams::default(),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Never fails. Generation errors and empty payloads are logged and
    /// answered from the report text alone.
    pub fn analyze(&self, report_text: &str) -> AnalysisRecord {
        let analysis_id = Uuid::new_v4();
        let _span = tracing::info_span!(
            "analyze_report",
            analysis_id = %analysis_id,
            text_len = report_text.len()
        )
        .entered();

        let prompt = build_analysis_prompt(report_text);
        let response = match self.generator.generate(&prompt, &self.params) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Generation failed, using lab-value fallback");
                return lab_value_record(report_text);
            }
        };

        match response.normalize() {
            Some(generated) => {
                let record = parse_model_response(generated, report_text);
                tracing::info!(
                    shape = response.shape(),
                    generated_len = generated.len(),
                    findings = record.key_findings.len(),
                    recommendations = record.recommendations.len(),
                    "Report analyzed"
                );
                record
            }
            None => {
                tracing::warn!(
                    shape = response.shape(),
                    "Generation returned no text, using lab-value fallback"
                );
                lab_value_record(report_text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::pipeline::structuring::fallback::{
        default_recommendations, placeholder_finding, DEFAULT_SUMMARY,
    };
    use crate::pipeline::structuring::huggingface::{MockGenerationClient, MockReply};
    use crate::pipeline::structuring::huggingface_types::GenerationResponse;
    use crate::pipeline::structuring::types::{Finding, FindingStatus};

    const REPORT: &str = "Blood Glucose: 145 mg/dL, Blood Pressure: 150/95 mmHg";

    fn analyzer(mock: MockGenerationClient) -> ReportAnalyzer {
        ReportAnalyzer::new(Box::new(mock))
    }

    #[test]
    fn well_formed_model_output_is_parsed() {
        let generated = "SUMMARY: Mostly normal results with elevated glucose.\n\
                         KEY FINDINGS:\n\
                         - Glucose: 145 mg/dL - high\n\
                         - Blood Pressure: 150/95 mmHg - high\n\
                         RECOMMENDATIONS:\n\
                         1. Reduce sugar intake and recheck fasting glucose.\n\
                         2. Monitor blood pressure at home daily.";
        let record = analyzer(MockGenerationClient::with_text(generated)).analyze(REPORT);

        assert_eq!(
            record.summary,
            "Mostly normal results with elevated glucose."
        );
        assert_eq!(
            record.key_findings[0],
            Finding::new("Glucose", "145 mg/dL", FindingStatus::Abnormal)
        );
        assert_eq!(record.key_findings.len(), 2);
        assert_eq!(record.recommendations.len(), 2);
        assert!(record.error.is_none());
    }

    #[test]
    fn service_error_falls_back_to_lab_values() {
        let record = analyzer(MockGenerationClient::failing(500)).analyze(REPORT);

        assert_eq!(record.summary, DEFAULT_SUMMARY);
        assert_eq!(
            record.key_findings,
            vec![
                Finding::new("Blood Glucose", "145 mg/dL", FindingStatus::Abnormal),
                Finding::new("Blood Pressure", "150/95 mmHg", FindingStatus::Abnormal),
            ]
        );
        assert_eq!(record.recommendations, default_recommendations());
        assert!(record.error.is_none());
    }

    #[test]
    fn unreachable_service_falls_back() {
        let record =
            analyzer(MockGenerationClient::new(MockReply::Unreachable)).analyze("no values here");
        assert_eq!(record.summary, DEFAULT_SUMMARY);
        assert_eq!(record.key_findings, vec![placeholder_finding()]);
    }

    #[test]
    fn empty_payload_falls_back() {
        let mock = MockGenerationClient::new(MockReply::Payload(GenerationResponse::Sequences(
            vec![],
        )));
        let record = analyzer(mock).analyze(REPORT);
        assert_eq!(record.summary, DEFAULT_SUMMARY);
        assert_eq!(record.key_findings.len(), 2);
    }

    #[test]
    fn unrecognized_payload_falls_back() {
        let mock = MockGenerationClient::new(MockReply::Payload(GenerationResponse::Unrecognized(
            serde_json::json!(42),
        )));
        let record = analyzer(mock).analyze("nothing measurable");
        assert_eq!(record.key_findings, vec![placeholder_finding()]);
        assert!(record.is_complete());
    }

    #[test]
    fn unstructured_output_uses_defaults_and_source_values() {
        let record = analyzer(MockGenerationClient::with_text("I am not sure what this is."))
            .analyze(REPORT);
        assert_eq!(record.summary, DEFAULT_SUMMARY);
        assert_eq!(record.key_findings.len(), 2);
        assert_eq!(record.recommendations, default_recommendations());
    }

    #[test]
    fn prompt_carries_report_text() {
        let mock = Arc::new(MockGenerationClient::with_text("SUMMARY: ok"));
        ReportAnalyzer::new(Box::new(mock.clone())).analyze(REPORT);

        let prompt = mock.last_prompt().unwrap();
        assert!(prompt.contains(REPORT));
        assert!(prompt.contains("KEY FINDINGS:"));
    }

    #[test]
    fn every_record_is_complete() {
        let outputs = [
            "",
            "SUMMARY:",
            "KEY FINDINGS:\nRECOMMENDATIONS:",
            "SUMMARY: x\nKEY FINDINGS:\n- LDL: 190 mg/dL - high",
        ];
        for output in outputs {
            let record = analyzer(MockGenerationClient::with_text(output)).analyze(REPORT);
            assert!(record.is_complete(), "incomplete record for {output:?}");
        }
    }
}
