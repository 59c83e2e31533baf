//! Whitespace canonicalization for extracted text.

use once_cell::sync::Lazy;
use regex::Regex;

// Non-newline whitespace runs; newlines are preserved so paragraph
// structure survives.
static INLINE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]+").expect("valid regex"));

static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Canonicalize raw extracted text:
///
/// - `\r\n` and lone `\r` become `\n`
/// - runs of non-newline whitespace collapse to one space
/// - every line is trimmed
/// - runs of three or more newlines collapse to exactly two (one blank line)
/// - the whole result is trimmed
///
/// Total over any input; empty or whitespace-only input yields `""`.
/// Idempotent: lines are trimmed before blank runs are collapsed, so a
/// second pass finds nothing left to change.
pub fn normalize(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = INLINE_WS.replace_all(&text, " ");

    let trimmed_lines = text
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");

    BLANK_RUNS
        .replace_all(&trimmed_lines, "\n\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::normalize;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_yields_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t \r\n  "), "");
    }

    #[test]
    fn converts_line_endings() {
        assert_eq!(normalize("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn collapses_inline_whitespace_preserving_newlines() {
        assert_eq!(normalize("a  \t b\nc   d"), "a b\nc d");
    }

    #[test]
    fn collapses_blank_line_runs_to_one() {
        assert_eq!(normalize("a\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn trims_lines_and_result() {
        assert_eq!(normalize("  a  \n  b  "), "a\nb");
        assert_eq!(normalize("\n\na\n\n"), "a");
    }

    #[test]
    fn whitespace_only_lines_do_not_survive_as_extra_blanks() {
        // Lines of spaces between paragraphs collapse into a single blank line.
        assert_eq!(normalize("a\n \n \n \nb"), "a\n\nb");
    }

    #[test]
    fn idempotent_on_varied_inputs() {
        let samples = [
            "a\r\n\r\n\r\nb   c\t d",
            "  leading\nand trailing  \n\n\n",
            "a\n \n \nb",
            "plain text",
            "",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }
}
