//! Error types for EI Core

use thiserror::Error;

/// Errors that can occur at the boundaries of the compute pipeline.
///
/// The scoring engine and insight generator themselves are total functions;
/// failures only arise while parsing, validating, or encoding.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Failed to parse domain signals: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid signal: {0}")]
    InvalidSignal(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
