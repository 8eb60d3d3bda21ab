use std::collections::HashMap;

/// Splits text into lowercase alphanumeric tokens
///
/// Any character that is not alphanumeric (Unicode-aware) separates tokens.
///
/// # Examples
///
/// ```
/// use gleaner::retrieval::tokenize;
///
/// assert_eq!(tokenize("What's RUST-lang?"), vec!["what", "s", "rust", "lang"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Counts how often each token occurs in `text`
pub fn term_frequencies(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}
