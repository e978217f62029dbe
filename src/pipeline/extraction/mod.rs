pub mod types;
pub mod ocr_space;

pub use types::*;
pub use ocr_space::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("File size exceeds the maximum permissible file size limit of {} KB", .limit / 1024)]
    FileTooLarge { size: u64, limit: u64 },

    #[error("OCR service is not reachable at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("OCR API error: {status}")]
    ServiceError { status: u16, body: String },

    #[error("{0}")]
    OcrProcessing(String),

    #[error("Malformed OCR response: {0}")]
    MalformedResponse(String),

    #[error("OCR service returned no parsed results")]
    NoParsedResults,
}

