//! OCR.space client.
//!
//! The service accepts a multipart upload and answers with a JSON envelope
//! whose error reporting is loose: `ErrorMessage` may be a string, an array
//! of strings, or absent, and a request can fail with HTTP 200 and a non-1
//! `OCRExitCode`.

use reqwest::blocking::multipart::{Form, Part};
use serde::Deserialize;

use super::types::{OcrClient, UploadedFile};
use super::ExtractionError;

const DEFAULT_ERROR_MESSAGE: &str = "OCR processing failed";

/// `OCRExitCode` value for "parsed successfully".
const EXIT_CODE_SUCCESS: i64 = 1;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OcrErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl OcrErrorMessage {
    fn joined(&self) -> String {
        match self {
            Self::One(message) => message.clone(),
            Self::Many(messages) => messages.join(", "),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParsedResult {
    #[serde(default)]
    pub parsed_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OcrSpaceResponse {
    #[serde(default)]
    pub parsed_results: Option<Vec<ParsedResult>>,
    #[serde(rename = "OCRExitCode", default)]
    pub ocr_exit_code: i64,
    #[serde(default)]
    pub is_errored_on_processing: bool,
    #[serde(default)]
    pub error_message: Option<OcrErrorMessage>,
}

/// Reduce a decoded response to the first page's text or an error.
pub fn interpret_response(response: OcrSpaceResponse) -> Result<String, ExtractionError> {
    if response.is_errored_on_processing || response.ocr_exit_code != EXIT_CODE_SUCCESS {
        let message = response
            .error_message
            .map(|m| m.joined())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
        return Err(ExtractionError::OcrProcessing(message));
    }

    let first = response
        .parsed_results
        .and_then(|results| results.into_iter().next())
        .ok_or(ExtractionError::NoParsedResults)?;

    Ok(first.parsed_text.unwrap_or_default())
}

pub struct OcrSpaceClient {
    endpoint: String,
    api_key: String,
    language: String,
    max_file_bytes: u64,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OcrSpaceClient {
    pub fn new(
        endpoint: &str,
        api_key: &str,
        language: &str,
        max_file_bytes: u64,
        timeout_secs: u64,
    ) -> Result<Self, ExtractionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExtractionError::HttpClient(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            language: language.to_string(),
            max_file_bytes,
            client,
            timeout_secs,
        })
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    fn form(&self, file: &UploadedFile) -> Result<Form, ExtractionError> {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| ExtractionError::HttpClient(e.to_string()))?;
        }

        Ok(Form::new()
            .part("file", part)
            .text("apikey", self.api_key.clone())
            .text("language", self.language.clone())
            .text("isOverlayRequired", "false"))
    }
}

impl OcrClient for OcrSpaceClient {
    fn extract_text(&self, file: &UploadedFile) -> Result<String, ExtractionError> {
        if file.size() > self.max_file_bytes {
            return Err(ExtractionError::FileTooLarge {
                size: file.size(),
                limit: self.max_file_bytes,
            });
        }

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(self.form(file)?)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    ExtractionError::Connection(self.endpoint.clone())
                } else if e.is_timeout() {
                    ExtractionError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    ExtractionError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExtractionError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OcrSpaceResponse = response
            .json()
            .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

        interpret_response(parsed)
    }
}

/// OCR client that returns fixed text without touching the network.
pub struct MockOcrClient {
    text: Option<String>,
    max_file_bytes: u64,
}

impl MockOcrClient {
    pub fn new(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            max_file_bytes: u64::MAX,
        }
    }

    /// Every call fails the way the service does when it cannot read a file.
    pub fn failing() -> Self {
        Self {
            text: None,
            max_file_bytes: u64::MAX,
        }
    }

    pub fn with_max_file_bytes(mut self, limit: u64) -> Self {
        self.max_file_bytes = limit;
        self
    }
}

impl OcrClient for MockOcrClient {
    fn extract_text(&self, file: &UploadedFile) -> Result<String, ExtractionError> {
        if file.size() > self.max_file_bytes {
            return Err(ExtractionError::FileTooLarge {
                size: file.size(),
                limit: self.max_file_bytes,
            });
        }
        self.text
            .clone()
            .ok_or_else(|| ExtractionError::OcrProcessing(DEFAULT_ERROR_MESSAGE.to_string()))
    }
}
