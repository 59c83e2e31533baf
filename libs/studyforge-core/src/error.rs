//! Error types for the extraction and generation pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while extracting text from a document.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("file path cannot be empty")]
    EmptyPath,

    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported file type: {extension}; supported types are .pdf, .docx, .txt")]
    UnsupportedType { extension: String },

    #[error(
        "no extractable text layer; the document appears to be scanned or image-only \
         (OCR is not supported)"
    )]
    NoExtractableText,

    #[error("PDF decode failed: {0}")]
    Pdf(String),

    #[error("DOCX decode failed: {0}")]
    Docx(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction canceled")]
    Canceled,
}

pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Errors raised while generating flashcards or summaries through the API.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("API key is required")]
    MissingApiKey,

    #[error("input text is required")]
    EmptyInput,

    #[error(
        "requested count {requested} is out of range ({min}-{max})",
        min = crate::limits::MIN_CARD_COUNT,
        max = crate::limits::MAX_CARD_COUNT
    )]
    CountOutOfRange { requested: u32 },

    #[error("API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse API response: {0}")]
    Parse(String),

    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not summarize the document; every chunk failed")]
    CouldNotSummarize,

    #[error("generation canceled")]
    Canceled,
}

pub type GenerateResult<T> = std::result::Result<T, GenerateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_error_display() {
        let err = ExtractError::UnsupportedType {
            extension: ".epub".to_string(),
        };
        assert!(err.to_string().contains(".epub"));

        let err = ExtractError::NotFound(PathBuf::from("/tmp/missing.pdf"));
        assert!(err.to_string().contains("missing.pdf"));
    }

    #[test]
    fn generate_error_display() {
        let err = GenerateError::CountOutOfRange { requested: 51 };
        let msg = err.to_string();
        assert!(msg.contains("51"));
        assert!(msg.contains("1-50"));

        let err = GenerateError::Api {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert!(err.to_string().contains("429"));
    }
}
