//! End-to-end report processing: OCR → analysis.
//!
//! OCR failures are fatal for the request (there is no text to fall back
//! on). Everything after text exists is absorbed by [`ReportAnalyzer`].

use uuid::Uuid;

use crate::pipeline::extraction::types::{OcrClient, UploadedFile};
use crate::pipeline::extraction::ExtractionError;
use crate::pipeline::structuring::orchestrator::ReportAnalyzer;
use crate::pipeline::structuring::types::AnalysisRecord;

/// Errors that stop a report before it reaches analysis.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("No text provided for analysis")]
    EmptyInput,

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Could not extract text from the uploaded file")]
    NoText,
}

pub struct ReportProcessor {
    ocr: Box<dyn OcrClient + Send + Sync>,
    analyzer: ReportAnalyzer,
}

impl ReportProcessor {
    pub fn new(ocr: Box<dyn OcrClient + Send + Sync>, analyzer: ReportAnalyzer) -> Self {
        Self { ocr, analyzer }
    }

    /// OCR the file, then analyze its text.
    pub fn process_file(&self, file: &UploadedFile) -> Result<AnalysisRecord, ProcessingError> {
        let upload_id = Uuid::new_v4();
        let _span = tracing::info_span!(
            "process_file",
            upload_id = %upload_id,
            size = file.size(),
            content_type = file.content_type.as_deref().unwrap_or("unknown")
        )
        .entered();

        tracing::info!("Extracting text");
        let text = self.ocr.extract_text(file).map_err(|e| {
            tracing::error!(error = %e, "OCR failed");
            ProcessingError::Extraction(e)
        })?;

        if text.trim().is_empty() {
            tracing::error!("OCR returned no text");
            return Err(ProcessingError::NoText);
        }

        tracing::info!(text_len = text.len(), "Text extracted, analyzing");
        Ok(self.analyzer.analyze(&text))
    }

    /// Analyze text that is already available.
    pub fn analyze_text(&self, text: &str) -> Result<AnalysisRecord, ProcessingError> {
        if text.trim().is_empty() {
            return Err(ProcessingError::EmptyInput);
        }
        Ok(self.analyzer.analyze(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::ocr_space::MockOcrClient;
    use crate::pipeline::structuring::fallback::DEFAULT_SUMMARY;
    use crate::pipeline::structuring::huggingface::MockGenerationClient;
    use crate::pipeline::structuring::types::FindingStatus;

    const MODEL_OUTPUT: &str = "SUMMARY: Cholesterol is high.\n\
                                KEY FINDINGS:\n\
                                - Total Cholesterol: 250 mg/dL - high\n\
                                RECOMMENDATIONS:\n\
                                - Discuss statin therapy with your doctor.";

    fn processor(ocr: MockOcrClient, generator: MockGenerationClient) -> ReportProcessor {
        ReportProcessor::new(Box::new(ocr), ReportAnalyzer::new(Box::new(generator)))
    }

    fn upload(len: usize) -> UploadedFile {
        UploadedFile::new("lab.pdf", Some("application/pdf".into()), vec![1u8; len])
    }

    #[test]
    fn file_runs_through_ocr_and_model() {
        let p = processor(
            MockOcrClient::new("Total Cholesterol: 250 mg/dL"),
            MockGenerationClient::with_text(MODEL_OUTPUT),
        );
        let record = p.process_file(&upload(32)).unwrap();

        assert_eq!(record.summary, "Cholesterol is high.");
        assert_eq!(record.key_findings[0].name, "Total Cholesterol");
        assert_eq!(record.key_findings[0].status, FindingStatus::Abnormal);
        assert_eq!(
            record.recommendations,
            vec!["Discuss statin therapy with your doctor.".to_string()]
        );
    }

    #[test]
    fn ocr_failure_is_fatal() {
        let p = processor(
            MockOcrClient::failing(),
            MockGenerationClient::with_text(MODEL_OUTPUT),
        );
        match p.process_file(&upload(8)) {
            Err(ProcessingError::Extraction(ExtractionError::OcrProcessing(message))) => {
                assert_eq!(message, "OCR processing failed");
            }
            other => panic!("expected extraction error, got {other:?}"),
        }
    }

    #[test]
    fn oversized_upload_is_fatal() {
        let p = processor(
            MockOcrClient::new("text").with_max_file_bytes(10),
            MockGenerationClient::with_text(MODEL_OUTPUT),
        );
        assert!(matches!(
            p.process_file(&upload(11)),
            Err(ProcessingError::Extraction(ExtractionError::FileTooLarge { .. }))
        ));
    }

    #[test]
    fn blank_ocr_text_is_no_text() {
        let p = processor(
            MockOcrClient::new("  \n "),
            MockGenerationClient::with_text(MODEL_OUTPUT),
        );
        let err = p.process_file(&upload(8)).unwrap_err();
        assert!(matches!(err, ProcessingError::NoText));
        assert_eq!(
            err.to_string(),
            "Could not extract text from the uploaded file"
        );
    }

    #[test]
    fn generation_failure_after_ocr_is_absorbed() {
        let p = processor(
            MockOcrClient::new("Blood Glucose: 145 mg/dL"),
            MockGenerationClient::failing(500),
        );
        let record = p.process_file(&upload(8)).unwrap();
        assert_eq!(record.summary, DEFAULT_SUMMARY);
        assert_eq!(record.key_findings[0].value, "145 mg/dL");
        assert!(record.is_complete());
    }

    #[test]
    fn analyze_text_rejects_blank_input() {
        let p = processor(MockOcrClient::new(""), MockGenerationClient::with_text(MODEL_OUTPUT));
        assert!(matches!(p.analyze_text(""), Err(ProcessingError::EmptyInput)));
        assert!(matches!(p.analyze_text(" \t\n"), Err(ProcessingError::EmptyInput)));
    }

    #[test]
    fn analyze_text_skips_ocr() {
        let p = processor(MockOcrClient::failing(), MockGenerationClient::with_text(MODEL_OUTPUT));
        let record = p.analyze_text("Total Cholesterol: 250 mg/dL").unwrap();
        assert_eq!(record.summary, "Cholesterol is high.");
    }
}
