//! Generation and summarization orchestrators.
//!
//! The generation entry point decides whether input text fits the
//! direct-send budget; oversized text goes through a map-reduce
//! summarization (chunk, summarize each chunk, concatenate, condense once
//! more if still oversized) before flashcards are requested.

use crate::cancel::CancelToken;
use crate::chunker::chunk_text;
use crate::client::OpenAiClient;
use crate::error::{GenerateError, GenerateResult};
use crate::limits::Limits;
use crate::types::{Flashcard, GenerationRequest};

/// Divider placed between per-chunk summaries in the combined text.
const SUMMARY_DIVIDER: &str = "\n\n---\n\n";

/// Pipeline step notifications, for callers that surface progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationProgress {
    SummarizingChunk { current: usize, total: usize },
    CondensingSummary,
    GeneratingFlashcards,
}

/// Progress notification callback.
pub type ProgressCallback = Box<dyn Fn(GenerationProgress) + Send + Sync>;

/// Top-level flashcard generation pipeline.
pub struct FlashcardGenerator {
    client: OpenAiClient,
    limits: Limits,
    progress: Option<ProgressCallback>,
}

impl FlashcardGenerator {
    pub fn new(client: OpenAiClient, limits: Limits) -> Self {
        Self {
            client,
            limits,
            progress: None,
        }
    }

    /// Register a progress callback.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    fn report(&self, progress: GenerationProgress) {
        if let Some(callback) = &self.progress {
            callback(progress);
        }
    }

    /// Generate flashcards from the request's text.
    ///
    /// Text over the direct-send budget is summarized first; an empty
    /// summary means summarization could not proceed and fails the whole
    /// generation. When a deck label is supplied it is prefixed to anchor
    /// the output to the deck's subject. Zero returned cards is a valid
    /// outcome, not an error.
    pub async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
        cancel: &CancelToken,
    ) -> GenerateResult<Vec<Flashcard>> {
        if api_key.trim().is_empty() {
            return Err(GenerateError::MissingApiKey);
        }
        let topic = request.text.trim();
        if topic.is_empty() {
            return Err(GenerateError::EmptyInput);
        }
        if cancel.is_canceled() {
            return Err(GenerateError::Canceled);
        }

        let text_for_generation = if topic.chars().count() > self.limits.direct_send_budget {
            tracing::debug!(
                chars = topic.chars().count(),
                budget = self.limits.direct_send_budget,
                "input exceeds direct-send budget; summarizing"
            );
            let summary = self
                .summarize_large(api_key, topic, request.use_advanced_tier, cancel)
                .await?;
            if summary.trim().is_empty() {
                return Err(GenerateError::CouldNotSummarize);
            }
            summary
        } else {
            topic.to_string()
        };

        let contextual_topic = match request
            .deck_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
        {
            Some(name) => format!("Topic: {name}\n\n{text_for_generation}"),
            None => text_for_generation,
        };

        self.report(GenerationProgress::GeneratingFlashcards);
        self.client
            .generate_flashcards(
                api_key,
                &contextual_topic,
                request.use_advanced_tier,
                request.requested_count,
                cancel,
            )
            .await
    }

    /// Map-reduce summarization of oversized text.
    ///
    /// Chunks at the per-chunk budget, summarizes each chunk in order, and
    /// joins the results with a divider. An individual chunk failure is
    /// logged and skipped, never aborting the reduction; only if every
    /// chunk fails is the result empty. A combined summary still over the
    /// direct-send budget gets exactly one more condensing pass as a
    /// whole, falling back to hard truncation if that pass fails. Once
    /// any chunk succeeded, the result is always usable text.
    pub async fn summarize_large(
        &self,
        api_key: &str,
        full_text: &str,
        use_advanced_tier: bool,
        cancel: &CancelToken,
    ) -> GenerateResult<String> {
        let chunks = chunk_text(full_text, self.limits.chunk_budget);

        if chunks.is_empty() {
            return Ok(String::new());
        }
        if let [only] = chunks.as_slice() {
            if only.chars().count() <= self.limits.direct_send_budget {
                return Ok(only.clone());
            }
        }

        let total = chunks.len();
        let mut summaries = Vec::new();

        for (index, chunk) in chunks.iter().enumerate() {
            if cancel.is_canceled() {
                return Err(GenerateError::Canceled);
            }
            self.report(GenerationProgress::SummarizingChunk {
                current: index + 1,
                total,
            });

            match self
                .client
                .summarize_to_notes(api_key, chunk, use_advanced_tier, cancel)
                .await
            {
                Ok(summary) if !summary.trim().is_empty() => summaries.push(summary),
                Ok(_) => {}
                Err(GenerateError::Canceled) => return Err(GenerateError::Canceled),
                Err(e) => {
                    tracing::warn!(
                        chunk = index + 1,
                        total,
                        error = %e,
                        "chunk summarization failed; skipping"
                    );
                }
            }
        }

        if summaries.is_empty() {
            return Ok(String::new());
        }

        let combined = summaries.join(SUMMARY_DIVIDER);
        if combined.chars().count() <= self.limits.direct_send_budget {
            return Ok(combined);
        }

        if cancel.is_canceled() {
            return Err(GenerateError::Canceled);
        }
        self.report(GenerationProgress::CondensingSummary);

        match self
            .client
            .summarize_to_notes(api_key, &combined, use_advanced_tier, cancel)
            .await
        {
            Ok(condensed) if !condensed.trim().is_empty() => Ok(condensed),
            Ok(_) => Ok(self.limits.truncate_to_direct_send(&combined).into_owned()),
            Err(GenerateError::Canceled) => Err(GenerateError::Canceled),
            Err(e) => {
                tracing::warn!(error = %e, "final condensing pass failed; truncating");
                Ok(self.limits.truncate_to_direct_send(&combined).into_owned())
            }
        }
    }
}
