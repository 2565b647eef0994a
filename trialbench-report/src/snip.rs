//! Text snipping for failure listings

/// Characters of expected/actual text shown per failed case
pub const SNIP_LIMIT: usize = 100;

/// Cut `text` to `limit` characters, noting how many were dropped.
///
/// ```text
/// snip("abcdef", 4) == "abcd... and 2 more"
/// ```
pub fn snip(text: &str, limit: usize) -> String {
    let total = text.chars().count();
    if total <= limit {
        return text.to_string();
    }
    let kept: String = text.chars().take(limit).collect();
    format!("{}... and {} more", kept, total - limit)
}
