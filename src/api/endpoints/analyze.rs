//! `POST /api/analyze`: analysis of text that is already extracted.
//!
//! Every response body is an [`AnalysisRecord`], including errors, so the
//! caller renders one shape regardless of outcome.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::types::{AnalyzeRequest, ApiContext};
use crate::pipeline::processor::ProcessingError;
use crate::pipeline::structuring::types::AnalysisRecord;

const NO_TEXT_MESSAGE: &str = "No text provided for analysis";
const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze medical report";
const BODY_TOO_LARGE_MESSAGE: &str = "Request body too large";

/// The body is decoded by hand: a malformed or text-less body is a 400 with
/// a failure record, not axum's plain-text JSON rejection. A body over the
/// router limit keeps its 413 status but gets a failure record too.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    body: Result<Bytes, BytesRejection>,
) -> (StatusCode, Json<AnalysisRecord>) {
    let body = match body {
        Ok(body) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!(error = %rejection, "Analyze request body over limit");
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(AnalysisRecord::failed(BODY_TOO_LARGE_MESSAGE)),
            );
        }
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Analyze request body unreadable");
            return no_text();
        }
    };

    let request: AnalyzeRequest = serde_json::from_slice(&body).unwrap_or_default();
    let Some(text) = request.text.filter(|t| !t.trim().is_empty()) else {
        tracing::warn!(body_len = body.len(), "Analyze request without text");
        return no_text();
    };

    let processor = ctx.processor.clone();
    match tokio::task::spawn_blocking(move || processor.analyze_text(&text)).await {
        Ok(Ok(record)) => (StatusCode::OK, Json(record)),
        Ok(Err(ProcessingError::EmptyInput)) => no_text(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Analysis failed");
            failed()
        }
        Err(e) => {
            tracing::error!(error = %e, "Analysis worker failed");
            failed()
        }
    }
}

fn no_text() -> (StatusCode, Json<AnalysisRecord>) {
    (
        StatusCode::BAD_REQUEST,
        Json(AnalysisRecord::failed(NO_TEXT_MESSAGE)),
    )
}

fn failed() -> (StatusCode, Json<AnalysisRecord>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(AnalysisRecord::failed(ANALYSIS_FAILED_MESSAGE)),
    )
}
