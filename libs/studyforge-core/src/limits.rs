//! Size budgets for the extraction and generation pipeline.

use std::borrow::Cow;

/// Minimum number of flashcards a request may ask for.
pub const MIN_CARD_COUNT: u32 = 1;

/// Maximum number of flashcards a request may ask for.
pub const MAX_CARD_COUNT: u32 = 50;

/// Character budgets, all counted in `char`s.
///
/// `chunk_budget` must stay well below `direct_send_budget` so that a single
/// chunk's summary never itself needs re-chunking.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Largest text submitted to the API without summarization first.
    pub direct_send_budget: usize,
    /// Largest text accepted from a document at all; longer input is
    /// truncated by the caller after confirmation.
    pub total_accepted_budget: usize,
    /// Per-chunk budget used when splitting large documents.
    pub chunk_budget: usize,
    /// Shortest PDF text considered a real text layer rather than a scan.
    pub min_pdf_text_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            direct_send_budget: 25_000,
            total_accepted_budget: 250_000,
            chunk_budget: 8_000,
            min_pdf_text_len: 50,
        }
    }
}

impl Limits {
    /// Cut `text` down to the total-accepted budget by raw character count.
    /// The cut is not aligned to any semantic boundary, only to a `char`
    /// boundary. Within-budget input is passed through unchanged.
    pub fn truncate_to_accepted<'a>(&self, text: &'a str) -> Cow<'a, str> {
        truncate_chars(text, self.total_accepted_budget)
    }

    /// Same raw cut at the direct-send budget. Used as the fallback when the
    /// final condensing pass of a large summary fails.
    pub fn truncate_to_direct_send<'a>(&self, text: &'a str) -> Cow<'a, str> {
        truncate_chars(text, self.direct_send_budget)
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => Cow::Owned(text[..byte_idx].to_string()),
        None => Cow::Borrowed(text),
    }
}

/// Check a requested flashcard count against the allowed bounds.
pub fn count_in_bounds(requested: u32) -> bool {
    (MIN_CARD_COUNT..=MAX_CARD_COUNT).contains(&requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_keep_chunk_below_direct_send() {
        let limits = Limits::default();
        assert!(limits.chunk_budget < limits.direct_send_budget);
        assert_eq!(limits.direct_send_budget, 25_000);
        assert_eq!(limits.total_accepted_budget, 250_000);
        assert_eq!(limits.chunk_budget, 8_000);
        assert_eq!(limits.min_pdf_text_len, 50);
    }

    #[test]
    fn truncate_passes_short_input_through() {
        let limits = Limits::default();
        let text = "short text";
        assert!(matches!(limits.truncate_to_accepted(text), Cow::Borrowed(_)));
    }

    #[test]
    fn truncate_cuts_at_char_count() {
        let limits = Limits {
            total_accepted_budget: 5,
            ..Limits::default()
        };
        let cut = limits.truncate_to_accepted("abcdefgh");
        assert_eq!(cut.as_ref(), "abcde");
    }

    #[test]
    fn truncate_respects_utf8_boundaries() {
        let limits = Limits {
            total_accepted_budget: 3,
            ..Limits::default()
        };
        let cut = limits.truncate_to_accepted("héllo");
        assert_eq!(cut.as_ref(), "hél");
    }

    #[test]
    fn count_bounds() {
        assert!(!count_in_bounds(0));
        assert!(count_in_bounds(1));
        assert!(count_in_bounds(50));
        assert!(!count_in_bounds(51));
    }
}
