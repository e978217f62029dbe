//! Shared state and request types for the HTTP layer.

use std::sync::Arc;

use serde::Deserialize;

use crate::pipeline::processor::ReportProcessor;

/// Multipart overhead allowed on top of the OCR file limit before axum
/// itself rejects the body.
const UPLOAD_BODY_SLACK: usize = 64 * 1024;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub processor: Arc<ReportProcessor>,
    /// Largest request body accepted by upload routes.
    pub body_limit: usize,
}

impl ApiContext {
    /// `max_file_bytes` is the OCR service's per-file limit. Bodies are
    /// accepted somewhat past it so oversized files reach the OCR client
    /// and are rejected with its message.
    pub fn new(processor: Arc<ReportProcessor>, max_file_bytes: u64) -> Self {
        let limit = usize::try_from(max_file_bytes).unwrap_or(usize::MAX);
        Self {
            processor,
            body_limit: limit.saturating_mul(2).saturating_add(UPLOAD_BODY_SLACK),
        }
    }
}

/// `POST /api/analyze` body. Missing `text` is the same as blank text.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: Option<String>,
}
