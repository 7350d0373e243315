/// Normalize text for fuzzy comparison.
///
/// Lowercases, turns separators (`-`, `_`, whitespace) into single spaces and
/// drops every other non-alphanumeric character, since OCR tends to invent or
/// lose punctuation.
pub fn normalize_for_match(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_space = true;
        }
    }

    out
}

/// Similarity of two strings in `[0, 1]`.
///
/// Both sides are normalized with [`normalize_for_match`]; the score is
/// `1 - distance / max_len` over the Levenshtein distance in characters.
/// Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize_for_match(a);
    let b = normalize_for_match(b);
    similarity_normalized(&a, &b)
}

/// [`similarity`] for inputs that are already normalized.
pub fn similarity_normalized(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let score = 1.0 - strsim::levenshtein(a, b) as f64 / max_len as f64;
    score.clamp(0.0, 1.0)
}
