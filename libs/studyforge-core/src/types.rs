//! Core types for the flashcard generation pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A question/answer flashcard. Both sides are non-empty by construction;
/// API response elements that fail this are dropped during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

impl Flashcard {
    /// Build a flashcard, rejecting blank sides.
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Option<Self> {
        let front = front.into();
        let back = back.into();
        if front.trim().is_empty() || back.trim().is_empty() {
            return None;
        }
        Some(Self { front, back })
    }
}

/// A named collection of flashcards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub cards: Vec<Flashcard>,
}

impl Deck {
    /// Create an empty deck. Returns `None` for a blank name.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return None;
        }
        Some(Self { name, cards: Vec::new() })
    }

    pub fn add_card(&mut self, card: Flashcard) {
        self.cards.push(card);
    }

    pub fn remove_card(&mut self, index: usize) -> Option<Flashcard> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// Determine the document kind from a file path's extension
    /// (case-insensitive). Unknown or missing extensions yield `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }
}

/// Normalized text extracted from a document, with its origin metadata.
///
/// Invariants (established by [`crate::normalize::normalize`]): no `\r`, no
/// run of more than one blank line, no leading/trailing whitespace on any
/// line or on the whole text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedText {
    pub text: String,
    pub source_name: String,
    pub char_count: usize,
}

impl ExtractedText {
    pub fn new(text: String, source_name: impl Into<String>) -> Self {
        let char_count = text.chars().count();
        Self {
            text,
            source_name: source_name.into(),
            char_count,
        }
    }
}

/// One unit of flashcard-generation work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Deck or topic label used to anchor the generated cards to a subject.
    pub deck_name: Option<String>,
    /// The input text (raw topic text or extracted document text).
    pub text: String,
    /// Selects the advanced model tier when true.
    pub use_advanced_tier: bool,
    /// Desired number of cards; the API may return fewer or more.
    pub requested_count: u32,
}

impl GenerationRequest {
    pub fn new(text: impl Into<String>, requested_count: u32) -> Self {
        Self {
            deck_name: None,
            text: text.into(),
            use_advanced_tier: false,
            requested_count,
        }
    }

    pub fn with_deck_name(mut self, name: impl Into<String>) -> Self {
        self.deck_name = Some(name.into());
        self
    }

    pub fn with_advanced_tier(mut self, advanced: bool) -> Self {
        self.use_advanced_tier = advanced;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flashcard_rejects_blank_sides() {
        assert!(Flashcard::new("", "back").is_none());
        assert!(Flashcard::new("front", "   ").is_none());
        assert!(Flashcard::new("front", "back").is_some());
    }

    #[test]
    fn deck_add_and_remove() {
        let mut deck = Deck::new("Biology").unwrap();
        deck.add_card(Flashcard::new("Q1", "A1").unwrap());
        deck.add_card(Flashcard::new("Q2", "A2").unwrap());
        assert_eq!(deck.card_count(), 2);

        let removed = deck.remove_card(0).unwrap();
        assert_eq!(removed.front, "Q1");
        assert_eq!(deck.card_count(), 1);
        assert!(deck.remove_card(5).is_none());
    }

    #[test]
    fn deck_rejects_blank_name() {
        assert!(Deck::new("  ").is_none());
    }

    #[test]
    fn document_kind_from_path() {
        assert_eq!(
            DocumentKind::from_path(Path::new("notes.PDF")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("essay.docx")),
            Some(DocumentKind::Docx)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("a/b/plain.txt")),
            Some(DocumentKind::Txt)
        );
        assert_eq!(DocumentKind::from_path(Path::new("image.png")), None);
        assert_eq!(DocumentKind::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn extracted_text_counts_chars() {
        let et = ExtractedText::new("héllo".to_string(), "notes.txt");
        assert_eq!(et.char_count, 5);
        assert_eq!(et.source_name, "notes.txt");
    }
}
