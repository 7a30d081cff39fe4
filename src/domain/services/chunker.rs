/// Lines with this many characters or fewer are not worth retrieving.
pub const MIN_CHUNK_CHARS: usize = 10;

/// Splits extracted text into retrievable chunks, one per qualifying line.
///
/// Each line is trimmed; empty lines and lines at or below
/// [`MIN_CHUNK_CHARS`] characters are dropped. Order follows the input.
pub fn chunk_text(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > MIN_CHUNK_CHARS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_lines_dropped() {
        let chunks = chunk_text("Hello\n\nWorld is great\n\nShort\n");
        assert_eq!(chunks, vec!["World is great".to_string()]);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // exactly ten characters
        assert!(chunk_text("abcdefghij").is_empty());
        assert_eq!(chunk_text("abcdefghijk"), vec!["abcdefghijk".to_string()]);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // ten two-byte characters
        assert!(chunk_text("éééééééééé").is_empty());
    }

    #[test]
    fn test_trims_and_handles_crlf() {
        let chunks = chunk_text("   padded line of text   \r\nsecond qualifying line\r\n");
        assert_eq!(
            chunks,
            vec![
                "padded line of text".to_string(),
                "second qualifying line".to_string()
            ]
        );
    }

    #[test]
    fn test_no_qualifying_lines() {
        assert!(chunk_text("").is_empty());
        assert!(chunk_text("a\nb\n\n   \n").is_empty());
    }

    #[test]
    fn test_deterministic() {
        let text = "First qualifying line\nshort\nSecond qualifying line\n";
        assert_eq!(chunk_text(text), chunk_text(text));
    }
}
