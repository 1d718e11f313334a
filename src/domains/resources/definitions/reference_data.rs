//! Reference dataset resources.
//!
//! Expose the loaded creature types, keyword abilities and theme patterns,
//! including built-in fallbacks when a dataset could not be read.

use super::ResourceDefinition;
use crate::domains::discovery::ReferenceCache;
use crate::domains::resources::error::ResourceError;
use crate::domains::resources::service::ResourceContent;

/// URI template covering every dataset.
pub const REFERENCE_TEMPLATE: &str = "scryfall://reference/{dataset}";

const REFERENCE_PREFIX: &str = "scryfall://reference/";

/// One of the reference datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceDataset {
    CreatureTypes,
    KeywordAbilities,
    ThemePatterns,
}

impl ReferenceDataset {
    pub const ALL: [ReferenceDataset; 3] = [
        ReferenceDataset::CreatureTypes,
        ReferenceDataset::KeywordAbilities,
        ReferenceDataset::ThemePatterns,
    ];

    /// Path segment used in the resource URI.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::CreatureTypes => "creature-types",
            Self::KeywordAbilities => "keyword-abilities",
            Self::ThemePatterns => "theme-patterns",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::ThemePatterns => "application/json",
            _ => "text/plain",
        }
    }

    /// Dataset addressed by a `scryfall://reference/...` URI.
    pub fn from_uri(uri: &str) -> Option<Self> {
        let slug = uri.strip_prefix(REFERENCE_PREFIX)?;
        Self::ALL.into_iter().find(|d| d.slug() == slug)
    }

    /// Render the dataset as served to clients.
    pub fn render(&self, reference: &ReferenceCache) -> Result<String, ResourceError> {
        match self {
            Self::CreatureTypes => Ok(reference.creature_types().join("\n")),
            Self::KeywordAbilities => Ok(reference.keyword_abilities().join("\n")),
            Self::ThemePatterns => serde_json::to_string_pretty(&reference.theme_patterns().to_json())
                .map_err(|e| ResourceError::internal(e.to_string())),
        }
    }
}

pub struct CreatureTypesResource;

impl ResourceDefinition for CreatureTypesResource {
    const URI: &'static str = "scryfall://reference/creature-types";
    const NAME: &'static str = "Creature Types";
    const DESCRIPTION: &'static str =
        "Creature types used for tribal synergy detection, one per line";
    const MIME_TYPE: &'static str = "text/plain";

    fn content() -> ResourceContent {
        ResourceContent::Reference(ReferenceDataset::CreatureTypes)
    }
}

pub struct KeywordAbilitiesResource;

impl ResourceDefinition for KeywordAbilitiesResource {
    const URI: &'static str = "scryfall://reference/keyword-abilities";
    const NAME: &'static str = "Keyword Abilities";
    const DESCRIPTION: &'static str =
        "Keyword abilities recognized in rules text, one per line";
    const MIME_TYPE: &'static str = "text/plain";

    fn content() -> ResourceContent {
        ResourceContent::Reference(ReferenceDataset::KeywordAbilities)
    }
}

pub struct ThemePatternsResource;

impl ResourceDefinition for ThemePatternsResource {
    const URI: &'static str = "scryfall://reference/theme-patterns";
    const NAME: &'static str = "Theme Patterns";
    const DESCRIPTION: &'static str =
        "Theme definitions: match patterns, synergy query, description and type";
    const MIME_TYPE: &'static str = "application/json";

    fn content() -> ResourceContent {
        ResourceContent::Reference(ReferenceDataset::ThemePatterns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::discovery::{ReferenceSource, ThemePatterns};

    #[test]
    fn test_uris_match_datasets() {
        assert_eq!(
            ReferenceDataset::from_uri(CreatureTypesResource::URI),
            Some(ReferenceDataset::CreatureTypes)
        );
        assert_eq!(
            ReferenceDataset::from_uri(KeywordAbilitiesResource::URI),
            Some(ReferenceDataset::KeywordAbilities)
        );
        assert_eq!(
            ReferenceDataset::from_uri(ThemePatternsResource::URI),
            Some(ReferenceDataset::ThemePatterns)
        );
        assert_eq!(ReferenceDataset::from_uri("scryfall://reference/sets"), None);
        assert_eq!(ReferenceDataset::from_uri("file:///creature-types"), None);
    }

    #[test]
    fn test_render_lists() {
        let reference = ReferenceCache::with_data(
            vec!["Elf".into(), "Goblin".into()],
            vec!["Flying".into()],
            ThemePatterns::default(),
        );
        assert_eq!(
            ReferenceDataset::CreatureTypes.render(&reference).unwrap(),
            "Elf\nGoblin"
        );
        assert_eq!(ReferenceDataset::ThemePatterns.render(&reference).unwrap(), "{}");
    }

    #[test]
    fn test_render_embedded_themes_is_json() {
        let reference = ReferenceCache::new(ReferenceSource::Embedded);
        let rendered = ReferenceDataset::ThemePatterns.render(&reference).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert!(value.get("tribal").is_some());
    }
}
