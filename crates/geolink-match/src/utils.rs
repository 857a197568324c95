//! Text helpers shared by the oracles.

/// Normalizes text for comparison by lowercasing and replacing separators
/// and punctuation with single spaces.
pub fn normalize_text(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(
            ['_', '-', '.', '/', '\\', ',', '(', ')', '\'', '\u{2013}', '\u{2014}'],
            " ",
        )
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when `needle`'s tokens appear as a contiguous run in `haystack`'s.
pub fn contains_tokens(haystack: &[&str], needle: &[&str]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}
