//! Boundary-respecting text chunking.
//!
//! Splits text into ordered chunks at or under a character budget,
//! preferring paragraph boundaries, then sentence boundaries, then hard
//! fixed-length slices as a last resort. Pure and deterministic: identical
//! inputs always produce the identical chunk sequence.

use once_cell::sync::Lazy;
use regex::Regex;

// A sentence ends at `.`, `!` or `?` followed by whitespace.
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

/// Split `text` into chunks of at most `max_chars` characters each.
///
/// - Empty or whitespace-only input returns no chunks.
/// - Input already within budget is returned as a single unchanged chunk.
/// - Otherwise blank-line-delimited paragraphs are greedily accumulated;
///   a paragraph that alone exceeds the budget is split at sentence
///   boundaries, and a single oversized sentence is hard-split into
///   `max_chars`-character slices.
///
/// Every chunk is trimmed and chunk order matches source order, so joining
/// the chunks reads as the source text.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    assert!(max_chars > 0, "max_chars must be positive");

    if text.trim().is_empty() {
        return Vec::new();
    }
    if char_len(text) <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut buffer = String::new();

    for paragraph in text.split("\n\n").filter(|p| !p.trim().is_empty()) {
        // +2 accounts for the paragraph separator.
        if char_len(&buffer) + char_len(paragraph) + 2 > max_chars {
            flush(&mut buffer, &mut chunks);

            if char_len(paragraph) > max_chars {
                chunks.extend(split_large_paragraph(paragraph, max_chars));
            } else {
                buffer.push_str(paragraph);
            }
        } else {
            if !buffer.is_empty() {
                buffer.push_str("\n\n");
            }
            buffer.push_str(paragraph);
        }
    }

    flush(&mut buffer, &mut chunks);
    chunks
}

/// Split an oversized paragraph at sentence boundaries, hard-splitting any
/// sentence that alone exceeds the budget.
fn split_large_paragraph(paragraph: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut buffer = String::new();

    for sentence in split_sentences(paragraph) {
        // +1 accounts for the sentence separator.
        if char_len(&buffer) + char_len(sentence) + 1 > max_chars {
            flush(&mut buffer, &mut chunks);

            if char_len(sentence) > max_chars {
                chunks.extend(hard_split(sentence, max_chars));
            } else {
                buffer.push_str(sentence);
            }
        } else {
            if !buffer.is_empty() {
                buffer.push(' ');
            }
            buffer.push_str(sentence);
        }
    }

    flush(&mut buffer, &mut chunks);
    chunks
}

/// Split on sentence-ending punctuation followed by whitespace, keeping the
/// punctuation with its sentence and dropping the inter-sentence whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut last = 0;

    for m in SENTENCE_END.find_iter(text) {
        // The punctuation mark is a single ASCII byte at m.start().
        let end = m.start() + 1;
        if end > last {
            sentences.push(&text[last..end]);
        }
        last = m.end();
    }
    if last < text.len() {
        sentences.push(&text[last..]);
    }

    sentences.into_iter().filter(|s| !s.trim().is_empty()).collect()
}

/// Last resort: fixed-length slices of exactly `max_chars` characters, the
/// one case where a semantic boundary is sacrificed for the hard budget.
fn hard_split(sentence: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = sentence.chars().collect();
    chars
        .chunks(max_chars)
        .map(|slice| slice.iter().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn flush(buffer: &mut String, chunks: &mut Vec<String>) {
    if !buffer.is_empty() {
        let chunk = buffer.trim().to_string();
        if !chunk.is_empty() {
            chunks.push(chunk);
        }
        buffer.clear();
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strip_ws(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert_eq!(chunk_text("", 100), Vec::<String>::new());
        assert_eq!(chunk_text("   \n\n  ", 100), Vec::<String>::new());
    }

    #[test]
    fn small_input_passes_through_unchanged() {
        let text = "Short paragraph.\n\nAnother one.";
        assert_eq!(chunk_text(text, 1000), vec![text.to_string()]);
    }

    #[test]
    fn splits_at_paragraph_boundaries() {
        let text = format!("{}\n\n{}\n\n{}", "a".repeat(40), "b".repeat(40), "c".repeat(40));
        let chunks = chunk_text(&text, 90);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].starts_with('a'));
        assert!(chunks[0].contains("b"));
        assert_eq!(chunks[1], "c".repeat(40));
    }

    #[test]
    fn oversized_paragraph_splits_at_sentences() {
        let sentence = format!("{}.", "x".repeat(30));
        let paragraph = format!("{s} {s} {s}", s = sentence);
        let chunks = chunk_text(&paragraph, 70);
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.ends_with('.'));
        }
    }

    #[test]
    fn oversized_sentence_is_hard_split() {
        let sentence = "y".repeat(250);
        let chunks = chunk_text(&sentence, 100);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 100);
        assert_eq!(chunks[1].chars().count(), 100);
        assert_eq!(chunks[2].chars().count(), 50);
    }

    #[test]
    fn chunks_respect_budget_except_atomic_fragments() {
        let text = format!(
            "First paragraph here.\n\n{}\n\nLast paragraph. It has two sentences.",
            "long sentence word ".repeat(30)
        );
        for chunk in chunk_text(&text, 120) {
            assert!(
                chunk.chars().count() <= 120,
                "chunk over budget: {} chars",
                chunk.chars().count()
            );
        }
    }

    #[test]
    fn order_and_coverage_are_preserved() {
        let paragraphs: Vec<String> = (0..12)
            .map(|i| format!("Paragraph number {i} with some body text to fill space."))
            .collect();
        let text = paragraphs.join("\n\n");
        let chunks = chunk_text(&text, 120);

        // Joining the chunks reproduces the source modulo whitespace.
        assert_eq!(strip_ws(&chunks.concat()), strip_ws(&text));

        // Order: paragraph markers appear in ascending order across chunks.
        let joined = chunks.join("\n");
        let mut last_pos = 0;
        for i in 0..12 {
            let marker = format!("Paragraph number {i}");
            let pos = joined.find(&marker).expect("marker missing");
            assert!(pos >= last_pos, "paragraph {i} out of order");
            last_pos = pos;
        }
    }

    #[test]
    fn deterministic() {
        let text = format!("{}\n\n{}", "alpha beta. ".repeat(40), "gamma delta. ".repeat(40));
        assert_eq!(chunk_text(&text, 150), chunk_text(&text, 150));
    }

    #[test]
    fn unicode_hard_split_stays_on_char_boundaries() {
        let sentence = "é".repeat(25);
        let chunks = chunk_text(&sentence, 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "é".repeat(10));
    }

    #[test]
    fn sentence_split_keeps_punctuation() {
        let sentences = split_sentences("One. Two! Three? Four");
        assert_eq!(sentences, vec!["One.", "Two!", "Three?", "Four"]);
    }
}
