//! Payload shapes returned by text-generation inference endpoints.
//!
//! The same endpoint answers with different JSON depending on the model and
//! task pipeline behind it, so the body is decoded into a tagged union and
//! normalised in one place instead of being probed ad hoc.

use serde::{Deserialize, Serialize};

/// One element of the `[{ "generated_text": ... }]` array shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSequence {
    #[serde(default)]
    pub generated_text: Option<String>,
}

/// The `{ "generated_text": ... }` / `{ "text": ... }` object shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedObject {
    #[serde(default)]
    pub generated_text: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Decoded generation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationResponse {
    /// `[{ "generated_text": "..." }, ...]`
    Sequences(Vec<GeneratedSequence>),
    /// `"..."`
    Text(String),
    /// `{ "generated_text": "..." }` or `{ "text": "..." }`
    Object(GeneratedObject),
    /// Anything else (numbers, arrays of scalars, ...).
    Unrecognized(serde_json::Value),
}

impl GenerationResponse {
    /// The generated text, if the payload carries any that is not blank.
    pub fn normalize(&self) -> Option<&str> {
        let text = match self {
            Self::Sequences(seqs) => seqs.first().and_then(|s| s.generated_text.as_deref()),
            Self::Text(text) => Some(text.as_str()),
            Self::Object(obj) => obj
                .generated_text
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .or(obj.text.as_deref()),
            Self::Unrecognized(_) => None,
        };
        text.filter(|t| !t.trim().is_empty())
    }

    /// Shape name for logs.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Sequences(_) => "sequences",
            Self::Text(_) => "text",
            Self::Object(_) => "object",
            Self::Unrecognized(_) => "unrecognized",
        }
    }
}

impl From<&str> for GenerationResponse {
    fn from(text: &str) -> Self {
        Self::Sequences(vec![GeneratedSequence {
            generated_text: Some(text.to_string()),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> GenerationResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn array_of_sequences() {
        let response = decode(r#"[{"generated_text": "SUMMARY: ok"}]"#);
        assert_eq!(response.shape(), "sequences");
        assert_eq!(response.normalize(), Some("SUMMARY: ok"));
    }

    #[test]
    fn only_first_sequence_is_used() {
        let response = decode(r#"[{"generated_text": "first"}, {"generated_text": "second"}]"#);
        assert_eq!(response.normalize(), Some("first"));
    }

    #[test]
    fn bare_string() {
        let response = decode(r#""SUMMARY: plain""#);
        assert_eq!(response.shape(), "text");
        assert_eq!(response.normalize(), Some("SUMMARY: plain"));
    }

    #[test]
    fn object_with_generated_text() {
        let response = decode(r#"{"generated_text": "from object"}"#);
        assert_eq!(response.shape(), "object");
        assert_eq!(response.normalize(), Some("from object"));
    }

    #[test]
    fn object_with_text_field() {
        let response = decode(r#"{"text": "from text field"}"#);
        assert_eq!(response.normalize(), Some("from text field"));
    }

    #[test]
    fn object_prefers_generated_text_over_text() {
        let response = decode(r#"{"generated_text": "a", "text": "b"}"#);
        assert_eq!(response.normalize(), Some("a"));

        let response = decode(r#"{"generated_text": "  ", "text": "b"}"#);
        assert_eq!(response.normalize(), Some("b"));
    }

    #[test]
    fn error_object_has_no_text() {
        let response = decode(r#"{"error": "Model is currently loading", "estimated_time": 20.0}"#);
        assert_eq!(response.normalize(), None);
    }

    #[test]
    fn empty_and_blank_payloads_have_no_text() {
        assert_eq!(decode("[]").normalize(), None);
        assert_eq!(decode(r#"[{}]"#).normalize(), None);
        assert_eq!(decode(r#""   ""#).normalize(), None);
    }

    #[test]
    fn unrecognized_shapes() {
        let response = decode("42");
        assert_eq!(response.shape(), "unrecognized");
        assert_eq!(response.normalize(), None);

        assert_eq!(decode("[1, 2, 3]").normalize(), None);
        assert_eq!(decode("null").normalize(), None);
    }

    #[test]
    fn from_str_builds_sequences() {
        let response = GenerationResponse::from("hello");
        assert_eq!(response.normalize(), Some("hello"));
    }
}
