use std::sync::Mutex;

use serde::Serialize;

use super::huggingface_types::GenerationResponse;
use super::types::{GenerationClient, GenerationParams};
use super::StructuringError;

/// Blocking client for a hosted text-generation inference endpoint.
pub struct HuggingFaceClient {
    endpoint: String,
    api_token: Option<String>,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HuggingFaceClient {
    /// `endpoint` is the full model URL. Requests are sent without an
    /// `Authorization` header when `api_token` is `None`.
    pub fn new(
        endpoint: &str,
        api_token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, StructuringError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| StructuringError::HttpClient(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            api_token: api_token.filter(|t| !t.trim().is_empty()),
            client,
            timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParams,
}

impl GenerationClient for HuggingFaceClient {
    fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<GenerationResponse, StructuringError> {
        let body = InferenceRequest {
            inputs: prompt,
            parameters: params,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                StructuringError::Connection(self.endpoint.clone())
            } else if e.is_timeout() {
                StructuringError::HttpClient(format!(
                    "Request timed out after {}s",
                    self.timeout_secs
                ))
            } else {
                StructuringError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(StructuringError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<GenerationResponse>()
            .map_err(|e| StructuringError::ResponseParsing(e.to_string()))
    }
}

/// What [`MockGenerationClient`] answers with.
#[derive(Debug, Clone)]
pub enum MockReply {
    Payload(GenerationResponse),
    Status(u16),
    Unreachable,
}

/// Generation client that answers every call with a fixed reply and keeps
/// the last prompt it was given.
pub struct MockGenerationClient {
    reply: MockReply,
    last_prompt: Mutex<Option<String>>,
}

impl MockGenerationClient {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            last_prompt: Mutex::new(None),
        }
    }

    /// Replies with `[{ "generated_text": text }]`.
    pub fn with_text(text: &str) -> Self {
        Self::new(MockReply::Payload(GenerationResponse::from(text)))
    }

    pub fn failing(status: u16) -> Self {
        Self::new(MockReply::Status(status))
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

impl GenerationClient for MockGenerationClient {
    fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<GenerationResponse, StructuringError> {
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }
        match &self.reply {
            MockReply::Payload(payload) => Ok(payload.clone()),
            MockReply::Status(status) => Err(StructuringError::ServiceError {
                status: *status,
                body: "mock failure".into(),
            }),
            MockReply::Unreachable => Err(StructuringError::Connection("mock".into())),
        }
    }
}
