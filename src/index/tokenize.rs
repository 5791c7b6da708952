/// Splits text into lower-cased tokens
///
/// A token is a maximal run of letters and decimal digits; everything else
/// separates tokens, including numeric symbols such as `²` or `½`. Calling it twice on the same text yields the same tokens.
///
/// # Example
///
/// ```
/// use sumi_indexer::index::tokenize;
///
/// assert_eq!(tokenize("Hello, World-42!"), vec!["hello", "world", "42"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphabetic() || c.is_ascii_digit()))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
