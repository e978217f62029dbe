use std::path::Path;

use super::ExtractionError;

/// A document handed to the pipeline: an image or PDF as received from an
/// upload or read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Read a local file, guessing its content type from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string());
        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// OCR backend abstraction (allows mocking).
pub trait OcrClient {
    /// Text of the first recognised page. May be empty; callers decide
    /// whether that is an error.
    fn extract_text(&self, file: &UploadedFile) -> Result<String, ExtractionError>;
}

impl<T: OcrClient + ?Sized> OcrClient for std::sync::Arc<T> {
    fn extract_text(&self, file: &UploadedFile) -> Result<String, ExtractionError> {
        (**self).extract_text(file)
    }
}
