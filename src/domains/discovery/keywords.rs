//! Keyword ability extraction.

/// Lowercase `text` and collapse it into single-space separated tokens.
///
/// Anything other than ASCII alphanumerics, apostrophes and hyphens separates
/// tokens, so `"Flying, vigilance"` becomes `"flying vigilance"` and
/// `"Jump-start"` stays one token.
fn normalize(text: &str) -> String {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .filter(|token| !token.is_empty())
        .map(|token| token.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keyword abilities present in `text`.
///
/// A keyword matches only as a whole token sequence: both sides are
/// normalized and padded with spaces, then `" keyword "` is searched in
/// `" text "`. Results are lowercase, in `keywords` order, without duplicates.
pub fn extract_keywords(text: &str, keywords: &[String]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    if text.is_empty() {
        return found;
    }

    let haystack = format!(" {} ", normalize(text));

    for keyword in keywords {
        let keyword = normalize(keyword);
        if keyword.is_empty() || found.contains(&keyword) {
            continue;
        }
        if haystack.contains(&format!(" {} ", keyword)) {
            found.push(keyword);
        }
    }

    found
}
