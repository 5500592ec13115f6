//! Error types for the question-answering pipeline.

use thiserror::Error;

use crate::nlp::tokenizer::TokenizeError;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types raised below the orchestrator boundary.
///
/// None of these reach the end user: the graph client swallows transport
/// errors into empty result sets and the executor maps tokenizer errors to a
/// fixed parse-failure response.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A value that should be an absolute IRI is not
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// Network error
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The SPARQL endpoint answered with a non-success status
    #[error("SPARQL endpoint error {status}: {body}")]
    Endpoint { status: u16, body: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tokenizer rejected the input
    #[error("Tokenize error: {0}")]
    Tokenize(#[from] TokenizeError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether a failed endpoint round-trip is worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Error::Endpoint { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
