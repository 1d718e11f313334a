//! Theme classification.
//!
//! A theme is a named set of rules-text patterns plus the query used to find
//! cards that support it. Patterns are case-insensitive regular expressions;
//! a pattern that does not compile is matched as a plain substring instead.
//! Patterns are compiled once, when the theme dataset is loaded.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::keywords::extract_keywords;
use super::reference::ReferenceCache;
use crate::scryfall::Card;

/// Name of the theme resolved through creature types instead of a query.
pub const TRIBAL_THEME: &str = "tribal";

/// Theme definition as stored in `themepatterns.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePattern {
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub synergy_query: String,
    #[serde(default)]
    pub synergy_description: String,
    #[serde(default)]
    pub synergy_type: String,
}

/// A single compiled pattern.
#[derive(Debug, Clone)]
pub enum PatternMatcher {
    Regex(Regex),
    /// Lowercased literal used when the pattern is not a valid regex.
    Substring(String),
}

impl PatternMatcher {
    /// Compile `pattern` for `theme`. Returns `None` for blank patterns.
    pub fn compile(theme: &str, pattern: &str) -> Option<Self> {
        if pattern.is_empty() {
            return None;
        }

        match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => Some(Self::Regex(regex)),
            Err(e) => {
                warn!(
                    "Invalid regex pattern '{}' for theme '{}', using substring match: {}",
                    pattern, theme, e
                );
                Some(Self::Substring(pattern.to_ascii_lowercase()))
            }
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Regex(regex) => regex.is_match(text),
            Self::Substring(needle) => text.to_ascii_lowercase().contains(needle.as_str()),
        }
    }
}

/// A named theme with its compiled patterns.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub pattern: ThemePattern,
    matchers: Vec<PatternMatcher>,
}

impl Theme {
    pub fn new(name: impl Into<String>, pattern: ThemePattern) -> Self {
        let name = name.into();
        let matchers = pattern
            .patterns
            .iter()
            .filter_map(|p| PatternMatcher::compile(&name, p))
            .collect();
        Self {
            name,
            pattern,
            matchers,
        }
    }

    /// Whether any pattern matches. Patterns are tried in order and the
    /// scan stops at the first hit.
    pub fn matches(&self, text: &str) -> bool {
        !text.is_empty() && self.matchers.iter().any(|m| m.is_match(text))
    }

    /// Whether this theme is resolved through creature types.
    pub fn is_tribal(&self) -> bool {
        self.name == TRIBAL_THEME && self.pattern.synergy_query.trim().is_empty()
    }
}

/// Ordered theme collection. Iteration follows definition order.
#[derive(Debug, Clone, Default)]
pub struct ThemePatterns {
    themes: Vec<Theme>,
}

impl ThemePatterns {
    /// Build from `(name, definition)` pairs, keeping the first definition of
    /// a repeated name.
    pub fn from_definitions<I, S>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (S, ThemePattern)>,
        S: Into<String>,
    {
        let mut themes: Vec<Theme> = Vec::new();
        for (name, pattern) in definitions {
            let name = name.into();
            if themes.iter().any(|t| t.name == name) {
                continue;
            }
            themes.push(Theme::new(name, pattern));
        }
        Self { themes }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// The definitions as a JSON object in definition order.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .themes
            .iter()
            .map(|t| {
                (
                    t.name.clone(),
                    serde_json::to_value(&t.pattern).unwrap_or_default(),
                )
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

/// Keywords and theme names found in a card's rules text.
///
/// Keywords come first, in extraction order, followed by every theme with a
/// matching pattern in definition order. No name appears twice.
pub fn extract_themes(card: &Card, reference: &ReferenceCache) -> Vec<String> {
    let text = card.oracle_text();
    let mut themes = extract_keywords(&text, reference.keyword_abilities());

    for theme in reference.theme_patterns().iter() {
        if theme.matches(&text) && !themes.contains(&theme.name) {
            themes.push(theme.name.clone());
        }
    }

    themes
}
