pub mod types;
pub mod prompt;
pub mod parser;
pub mod classify;
pub mod lab_values;
pub mod fallback;
pub mod huggingface;
pub mod huggingface_types;
pub mod orchestrator;

pub use types::*;
pub use prompt::*;
pub use parser::*;
pub use classify::*;
pub use lab_values::*;
pub use fallback::*;
pub use huggingface::*;
pub use huggingface_types::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StructuringError {
    #[error("Generation service is not reachable at {0}")]
    Connection(String),

    #[error("Generation service returned error (status {status}): {body}")]
    ServiceError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}
