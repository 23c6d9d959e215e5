//! Wiki link parsing.
//!
//! Links are derived from content on demand and never stored.

use once_cell::sync::Lazy;
use regex::Regex;

static WIKI_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("valid wiki link regex"));

/// Returns every `[[title]]` target in `content`, in order of appearance.
///
/// Titles are returned verbatim (case and inner whitespace preserved);
/// duplicates are kept.
pub fn extract_links(content: &str) -> Vec<String> {
    WIKI_LINK_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// The literal token a note must contain to link to `title`.
pub fn wiki_link_token(title: &str) -> String {
    format!("[[{title}]]")
}

/// Whether `content` links to `title` (exact, case-sensitive).
pub fn links_to(content: &str, title: &str) -> bool {
    content.contains(&wiki_link_token(title))
}
