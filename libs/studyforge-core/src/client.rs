//! HTTP client for the generative text API.
//!
//! Wraps a chat-completions endpoint with two capabilities: produce N
//! flashcards from text, and summarize text into condensed study notes.
//! Stateless between calls; the API key is an explicit parameter so the
//! pipeline stays independently testable.

use crate::cancel::CancelToken;
use crate::error::{GenerateError, GenerateResult};
use crate::limits;
use crate::types::Flashcard;
use reqwest::Client;
use std::time::Duration;

const FLASHCARD_TEMPERATURE: f64 = 0.7;
const FLASHCARD_MAX_TOKENS: u32 = 2500;
const NOTES_TEMPERATURE: f64 = 0.5;
const NOTES_MAX_TOKENS: u32 = 2000;

/// Endpoint and model-tier configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Chat-completions endpoint URL.
    pub base_url: String,
    /// Model used when the advanced-tier flag is off.
    pub standard_model: String,
    /// Model used when the advanced-tier flag is on.
    pub advanced_model: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1/chat/completions".to_string(),
            standard_model: "gpt-4o-mini".to_string(),
            advanced_model: "gpt-4o".to_string(),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Client for flashcard generation and chunk summarization.
pub struct OpenAiClient {
    http: Client,
    config: ClientConfig,
}

impl OpenAiClient {
    pub fn new(config: ClientConfig) -> Self {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to create HTTP client");
        Self { http, config }
    }

    /// Model name for the given tier flag.
    pub fn model_for_tier(&self, use_advanced_tier: bool) -> &str {
        if use_advanced_tier {
            &self.config.advanced_model
        } else {
            &self.config.standard_model
        }
    }

    /// Request `requested_count` flashcards generated from `topic_text`.
    ///
    /// Validation runs before any network I/O: the key and text must be
    /// non-empty and the count within bounds. The API is asked for exactly
    /// `requested_count` cards as a bare JSON array, but the returned count
    /// is authoritative; elements with a blank front or back are dropped.
    pub async fn generate_flashcards(
        &self,
        api_key: &str,
        topic_text: &str,
        use_advanced_tier: bool,
        requested_count: u32,
        cancel: &CancelToken,
    ) -> GenerateResult<Vec<Flashcard>> {
        if api_key.trim().is_empty() {
            return Err(GenerateError::MissingApiKey);
        }
        if topic_text.trim().is_empty() {
            return Err(GenerateError::EmptyInput);
        }
        if !limits::count_in_bounds(requested_count) {
            return Err(GenerateError::CountOutOfRange {
                requested: requested_count,
            });
        }
        if cancel.is_canceled() {
            return Err(GenerateError::Canceled);
        }

        let system_prompt = format!(
            "You are a flashcard generation assistant. Your task is to create \
             educational flashcards from the provided text.\n\
             Generate EXACTLY {requested_count} flashcards, no more and no less.\n\
             Each flashcard should have a clear question (front) and a concise answer (back).\n\
             Focus on key concepts, definitions, and important facts from the material.\n\n\
             IMPORTANT: Respond ONLY with a valid JSON array containing exactly \
             {requested_count} flashcards in this format:\n\
             [\n    {{\"front\": \"Question 1\", \"back\": \"Answer 1\"}},\n    \
             {{\"front\": \"Question 2\", \"back\": \"Answer 2\"}}\n]\n\n\
             Do not include any other text, explanations, or markdown formatting."
        );
        let user_prompt = format!(
            "Create exactly {requested_count} flashcards from the following content:\n\n{topic_text}"
        );

        let body = serde_json::json!({
            "model": self.model_for_tier(use_advanced_tier),
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "temperature": FLASHCARD_TEMPERATURE,
            "max_tokens": FLASHCARD_MAX_TOKENS,
        });

        let content = self.send_completion(api_key, &body).await?;
        parse_flashcards(&content)
    }

    /// Summarize `chunk_text` into organized study notes.
    ///
    /// Empty input short-circuits to an empty result without a network
    /// call.
    pub async fn summarize_to_notes(
        &self,
        api_key: &str,
        chunk_text: &str,
        use_advanced_tier: bool,
        cancel: &CancelToken,
    ) -> GenerateResult<String> {
        if api_key.trim().is_empty() {
            return Err(GenerateError::MissingApiKey);
        }
        if chunk_text.trim().is_empty() {
            return Ok(String::new());
        }
        if cancel.is_canceled() {
            return Err(GenerateError::Canceled);
        }

        let system_prompt = "You are a study notes assistant. Your task is to transform raw \
             notes or text into clean, organized study notes.\n\n\
             Guidelines:\n\
             - Use clear headings and bullet points\n\
             - Preserve key definitions, formulas, dates, and important facts\n\
             - Remove fluff, redundancy, and filler content\n\
             - Keep the summary concise but comprehensive\n\
             - Maintain the original meaning and context\n\n\
             Respond with the summarized study notes only. No explanations or meta-commentary.";
        let user_prompt =
            format!("Summarize the following text into organized study notes:\n\n{chunk_text}");

        let body = serde_json::json!({
            "model": self.model_for_tier(use_advanced_tier),
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "temperature": NOTES_TEMPERATURE,
            "max_tokens": NOTES_MAX_TOKENS,
        });

        let content = self.send_completion(api_key, &body).await?;
        Ok(content.trim().to_string())
    }

    /// POST a completion request and return the first choice's message
    /// content. Non-success statuses surface as [`GenerateError::Api`];
    /// a response without the expected shape as [`GenerateError::Parse`].
    async fn send_completion(
        &self,
        api_key: &str,
        body: &serde_json::Value,
    ) -> GenerateResult<String> {
        let resp = self
            .http
            .post(&self.config.base_url)
            .bearer_auth(api_key.trim())
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerateError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| GenerateError::Parse(e.to_string()))?;

        json["choices"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["message"]["content"].as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| GenerateError::Parse("missing message content".to_string()))
    }
}

/// Parse the model's reply into flashcards: strip an optional Markdown code
/// fence, parse the inner JSON array, and keep only elements with a
/// non-empty front and back.
fn parse_flashcards(content: &str) -> GenerateResult<Vec<Flashcard>> {
    let inner = strip_code_fence(content);
    if inner.is_empty() {
        return Ok(Vec::new());
    }

    let values: Vec<serde_json::Value> =
        serde_json::from_str(inner).map_err(|e| GenerateError::Parse(e.to_string()))?;

    Ok(values
        .into_iter()
        .filter_map(|card| {
            let front = card["front"].as_str()?;
            let back = card["back"].as_str()?;
            Flashcard::new(front, back)
        })
        .collect())
}

/// Remove a leading/trailing Markdown fence (```json ... ```), if present.
fn strip_code_fence(content: &str) -> &str {
    let mut inner = content.trim();
    if let Some(rest) = inner.strip_prefix("```json") {
        inner = rest;
    } else if let Some(rest) = inner.strip_prefix("```") {
        inner = rest;
    }
    if let Some(rest) = inner.strip_suffix("```") {
        inner = rest;
    }
    inner.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("[1]"), "[1]");
        assert_eq!(strip_code_fence("  [1]  "), "[1]");
    }

    #[test]
    fn parses_valid_card_array() {
        let cards = parse_flashcards(
            r#"[{"front": "What is Rust?", "back": "A systems language."},
                {"front": "Q2", "back": "A2"}]"#,
        )
        .unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].front, "What is Rust?");
        assert_eq!(cards[1].back, "A2");
    }

    #[test]
    fn drops_cards_with_blank_sides() {
        let cards = parse_flashcards(
            r#"[{"front": "Q1", "back": "A1"},
                {"front": "", "back": "A2"},
                {"front": "Q3"},
                {"front": "Q4", "back": "   "},
                {"front": "Q5", "back": "A5"}]"#,
        )
        .unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].front, "Q1");
        assert_eq!(cards[1].front, "Q5");
    }

    #[test]
    fn malformed_inner_json_is_a_parse_failure() {
        let result = parse_flashcards("these are not cards");
        assert!(matches!(result, Err(GenerateError::Parse(_))));
    }

    #[test]
    fn fenced_array_parses() {
        let cards =
            parse_flashcards("```json\n[{\"front\": \"Q\", \"back\": \"A\"}]\n```").unwrap();
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn tier_flag_selects_model() {
        let client = OpenAiClient::new(ClientConfig::default());
        assert_eq!(client.model_for_tier(false), "gpt-4o-mini");
        assert_eq!(client.model_for_tier(true), "gpt-4o");
    }
}
