//! Token display cleanup.

/// Leading whitespace marker emitted by GPT-2 style tokenizers.
const WORD_BOUNDARY_MARKER: char = 'Ġ';

/// Strip the whitespace-marker glyph and trim the result for display.
pub fn clean_token(raw: &str) -> String {
    raw.replace(WORD_BOUNDARY_MARKER, " ").trim().to_string()
}

/// Clean a whole token sequence, preserving order and length.
pub fn clean_tokens<I>(raw: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    raw.into_iter()
        .map(|token| clean_token(token.as_ref()))
        .collect()
}
