//! Scryfall search expressions.
//!
//! The discovery engine owns query construction; the provider only executes
//! the strings built here. Names and artists are quoted literals, and every
//! follow-up query excludes the main card by name.

/// Quote a literal, escaping embedded double quotes.
pub fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}

/// `-name:"<name>"`
pub fn exclude_name(name: &str) -> String {
    format!("-name:{}", quoted(name))
}

/// Exact-name lookup used to resolve the main card.
pub fn exact_name(name: &str) -> String {
    format!("!{}", quoted(name))
}

/// Partial name search.
pub fn name(name: &str) -> String {
    format!("name:{}", quoted(name))
}

/// Rules-text search.
pub fn oracle_text(text: &str) -> String {
    format!("oracle:{}", quoted(text))
}

/// Color search.
pub fn color(codes: &str) -> String {
    format!("color:{}", codes.trim())
}

/// Every printing of the card with the given oracle id.
pub fn oracle_id(id: &str) -> String {
    format!("oracle_id:{}", id)
}

/// Cards whose rules text contains `keyword`, excluding `main`.
pub fn keyword_excluding(keyword: &str, main: &str) -> String {
    format!("{} {}", oracle_text(keyword), exclude_name(main))
}

/// Cards by `artist`, excluding `main`.
pub fn artist_excluding(artist: &str, main: &str) -> String {
    format!("artist:{} {}", quoted(artist), exclude_name(main))
}

/// Cards from the set `code`, excluding `main`.
pub fn set_excluding(code: &str, main: &str) -> String {
    format!("set:{} {}", code, exclude_name(main))
}

/// Cards with `creature_type` in their type line, excluding `main`.
pub fn type_excluding(creature_type: &str, main: &str) -> String {
    let value = if creature_type.contains(char::is_whitespace) {
        quoted(creature_type)
    } else {
        creature_type.to_string()
    };
    format!("type:{} {}", value, exclude_name(main))
}

/// A theme's configured synergy query, excluding `main`.
pub fn theme_excluding(synergy_query: &str, main: &str) -> String {
    format!("{} {}", synergy_query.trim(), exclude_name(main))
}

/// Cards of the given colors, excluding `main`.
pub fn color_excluding(codes: &str, main: &str) -> String {
    format!("{} {}", color(codes), exclude_name(main))
}
