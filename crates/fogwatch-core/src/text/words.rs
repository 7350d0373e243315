/// Characters stripped from tokens before keyword comparison.
const STRIPPED: &[char] = &['(', ')', '|', '[', ']', '\\', '/'];

/// Split OCR lines into lowercase words for keyword matching.
///
/// Bracket and slash characters that OCR attaches to button glyphs are
/// removed; empty tokens are dropped.
pub fn words<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .flat_map(|line| {
            line.as_ref()
                .to_lowercase()
                .split_whitespace()
                .map(|word| word.replace(STRIPPED, ""))
                .collect::<Vec<_>>()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

/// Number of `words` that appear in `vocabulary`.
pub fn count_words_in(words: &[String], vocabulary: &[&str]) -> usize {
    words
        .iter()
        .filter(|word| vocabulary.contains(&word.as_str()))
        .count()
}
