//! `POST /api/reports`: multipart upload run through OCR and analysis.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::extraction::types::UploadedFile;
use crate::pipeline::structuring::types::AnalysisRecord;

const FILE_FIELD: &str = "file";

pub async fn upload(
    State(ctx): State<ApiContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisRecord>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let file = read_file_field(&mut multipart).await?;

    tracing::info!(
        file_name = %file.file_name,
        size = file.size(),
        "Report upload received"
    );

    let processor = ctx.processor.clone();
    let record = tokio::task::spawn_blocking(move || processor.process_file(&file))
        .await
        .map_err(|e| ApiError::Internal(format!("Report worker failed: {e}")))??;

    Ok(Json(record))
}

/// First part named `file`; other parts are skipped.
async fn read_file_field(multipart: &mut Multipart) -> Result<UploadedFile, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(UploadedFile::new(file_name, content_type, bytes.to_vec()));
    }
    Err(ApiError::BadRequest(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::BadRequest(e.body_text())
    }
}
