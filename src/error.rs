// src/error.rs
use docstage_source::SourceError;
use thiserror::Error;

/// Everything that can abort a conversion. Classification, emission and
/// pagination are infallible; only reading the input, loading configuration
/// and writing the output can fail.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Reading the document failed: {0}")]
    Source(#[from] SourceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration is invalid: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
