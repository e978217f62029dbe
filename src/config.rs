use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use thiserror::Error;

use crate::pipeline::extraction::{ExtractionError, OcrSpaceClient};
use crate::pipeline::processor::ReportProcessor;
use crate::pipeline::structuring::{HuggingFaceClient, ReportAnalyzer, StructuringError};

/// Application-level constants
pub const APP_NAME: &str = "medlens";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 8787));
pub const DEFAULT_OCR_URL: &str = "https://api.ocr.space/parse/image";
/// OCR.space public demo key.
pub const DEFAULT_OCR_API_KEY: &str = "helloworld";
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";
/// OCR.space free-tier upload limit.
pub const DEFAULT_OCR_MAX_FILE_BYTES: u64 = 1024 * 1024;
pub const DEFAULT_GENERATION_URL: &str =
    "https://api-inference.huggingface.co/models/meta-llama/Meta-Llama-3-8B-Instruct";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "medlens=info,tower_http=info,warn"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("OCR client setup failed: {0}")]
    Ocr(#[from] ExtractionError),

    #[error("Generation client setup failed: {0}")]
    Generation(#[from] StructuringError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OcrConfig {
    pub url: String,
    pub api_key: String,
    pub language: String,
    pub max_file_bytes: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub url: String,
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub ocr: OcrConfig,
    pub generation: GenerationConfig,
    pub http_timeout_secs: u64,
}

impl AppConfig {
    /// Read `MEDLENS_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset and blank values take
    /// their defaults; values that are set but unparseable are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let text = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let bind_addr = parse_or(get("MEDLENS_BIND_ADDR"), "MEDLENS_BIND_ADDR", DEFAULT_BIND_ADDR)?;
        let max_file_bytes = parse_or(
            get("MEDLENS_OCR_MAX_FILE_BYTES"),
            "MEDLENS_OCR_MAX_FILE_BYTES",
            DEFAULT_OCR_MAX_FILE_BYTES,
        )?;
        let http_timeout_secs = parse_or(
            get("MEDLENS_HTTP_TIMEOUT_SECS"),
            "MEDLENS_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;
        if http_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MEDLENS_HTTP_TIMEOUT_SECS",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(Self {
            bind_addr,
            ocr: OcrConfig {
                url: text("MEDLENS_OCR_URL", DEFAULT_OCR_URL),
                api_key: text("MEDLENS_OCR_API_KEY", DEFAULT_OCR_API_KEY),
                language: text("MEDLENS_OCR_LANGUAGE", DEFAULT_OCR_LANGUAGE),
                max_file_bytes,
            },
            generation: GenerationConfig {
                url: text("MEDLENS_GENERATION_URL", DEFAULT_GENERATION_URL),
                api_token: get("MEDLENS_HF_TOKEN").or_else(|| get("HUGGING_FACE_ACCESS_TOKEN")),
            },
            http_timeout_secs,
        })
    }

    pub fn ocr_client(&self) -> Result<OcrSpaceClient, ConfigError> {
        Ok(OcrSpaceClient::new(
            &self.ocr.url,
            &self.ocr.api_key,
            &self.ocr.language,
            self.ocr.max_file_bytes,
            self.http_timeout_secs,
        )?)
    }

    pub fn generation_client(&self) -> Result<HuggingFaceClient, ConfigError> {
        Ok(HuggingFaceClient::new(
            &self.generation.url,
            self.generation.api_token.clone(),
            self.http_timeout_secs,
        )?)
    }

    /// Processor wired to the configured OCR and generation services.
    pub fn build_processor(&self) -> Result<ReportProcessor, ConfigError> {
        let analyzer = ReportAnalyzer::new(Box::new(self.generation_client()?));
        Ok(ReportProcessor::new(Box::new(self.ocr_client()?), analyzer))
    }
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key,
                reason: e.to_string(),
                value,
            }),
    }
}
