//! Error types shared by every pipeline stage.

use thiserror::Error;

/// Errors raised while loading a language model or processing text.
#[derive(Debug, Error)]
pub enum NlpError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Language model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Unsupported tag: {0}")]
    UnsupportedTag(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NlpError>;

/// Reject empty or whitespace-only text before any stage runs.
pub(crate) fn require_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(NlpError::InvalidInput(
            "text must contain at least one non-whitespace character".to_string(),
        ));
    }
    Ok(())
}
