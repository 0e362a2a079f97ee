//! Reference links embedded in the model's markdown.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use dermascan_core::models::response::Citation;

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]\n]+)\]\((https?://[^\s)]+)\)").expect("valid link regex")
});

/// Collect `[title](http…)` links as citations, first occurrence per URI.
pub fn extract_link_citations(text: &str) -> Vec<Citation> {
    let mut seen = HashSet::new();
    LINK_RE
        .captures_iter(text)
        .filter_map(|c| {
            let title = c.get(1)?.as_str().trim();
            let uri = c.get(2)?.as_str();
            seen.insert(uri.to_string()).then(|| Citation {
                uri: uri.to_string(),
                title: title.to_string(),
            })
        })
        .collect()
}
