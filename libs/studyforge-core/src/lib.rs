//! Core document-to-flashcards pipeline shared by StudyForge front ends.
//!
//! Provides:
//! - Text extraction from PDF, DOCX and plain-text documents
//! - Whitespace normalization and boundary-respecting chunking
//! - A generative-API client for flashcard and study-note generation
//! - Map-reduce summarization of documents too large to submit directly
//! - Cooperative cancellation across all long-running operations

pub mod cancel;
pub mod chunker;
pub mod client;
pub mod error;
pub mod extract;
pub mod limits;
pub mod normalize;
pub mod pipeline;
pub mod types;

pub use cancel::{CancelToken, SingleFlight};
pub use chunker::chunk_text;
pub use client::{ClientConfig, OpenAiClient};
pub use error::{ExtractError, ExtractResult, GenerateError, GenerateResult};
pub use extract::DocumentExtractor;
pub use limits::{Limits, MAX_CARD_COUNT, MIN_CARD_COUNT};
pub use normalize::normalize;
pub use pipeline::{FlashcardGenerator, GenerationProgress, ProgressCallback};
pub use types::{Deck, DocumentKind, ExtractedText, Flashcard, GenerationRequest};
