//! Raw OCR text to line sequence.

/// Split raw text into trimmed, non-blank lines in their original order.
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
