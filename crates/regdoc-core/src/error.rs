//! Error types for regdoc

use serde::Serialize;
use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the regdoc pipeline
#[derive(Error, Debug)]
pub enum Error {
    #[error("LLM provider error: {0}")]
    LLMProvider(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Document loader error: {0}")]
    DocumentLoader(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

/// Coarse classification of an [`Error`], used by callers that need to tell
/// a misconfiguration apart from a failure that may go away on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or rejected credentials, invalid settings.
    Configuration,
    /// Network failures, timeouts, overloaded upstream services.
    Transient,
    /// The embedding or LLM service answered with something unusable.
    Provider,
    /// Bad input or inconsistent local data (PDF, index files).
    Data,
    /// Everything else.
    Internal,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) | Error::MissingCredential(_) | Error::Authentication(_) => {
                ErrorKind::Configuration
            }
            Error::Network(_) | Error::ServiceUnavailable(_) | Error::Timeout(_) => {
                ErrorKind::Transient
            }
            Error::LLMProvider(_) | Error::Embedding(_) => ErrorKind::Provider,
            Error::VectorStore(_)
            | Error::DocumentLoader(_)
            | Error::Serialization(_)
            | Error::InvalidInput(_) => ErrorKind::Data,
            Error::Io(_) | Error::Other(_) => ErrorKind::Internal,
        }
    }

    /// Whether retrying the same call later could succeed
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
