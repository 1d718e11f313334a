//! Related-card categories.
//!
//! Each relation type issues its own follow-up queries. A failed or empty
//! query only omits that category.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::keywords::extract_keywords;
use super::lookup::{capped, follow_up, limit_cards};
use super::reference::ReferenceCache;
use crate::scryfall::{query, Card, CardProvider, RequestScope, SearchOptions};

/// Number of extracted keywords tried for the mechanics category.
const MECHANIC_KEYWORDS: usize = 2;

/// Kind of relationship to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Reprints,
    Tokens,
    Mechanics,
    SameArtist,
    SameSet,
}

impl RelationType {
    /// Types used when the caller requests none.
    pub const DEFAULTS: [RelationType; 4] = [
        RelationType::Reprints,
        RelationType::Tokens,
        RelationType::Mechanics,
        RelationType::SameSet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reprints => "reprints",
            Self::Tokens => "tokens",
            Self::Mechanics => "mechanics",
            Self::SameArtist => "same_artist",
            Self::SameSet => "same_set",
        }
    }
}

/// A labelled group of related cards.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelatedCardCategory {
    pub category_name: String,
    pub cards: Vec<Card>,
    /// Number of matches before truncation.
    pub count: usize,
}

impl RelatedCardCategory {
    fn new(name: impl Into<String>, cards: Vec<Card>, max: usize) -> Self {
        let count = cards.len();
        Self {
            category_name: name.into(),
            cards: limit_cards(cards, max),
            count,
        }
    }
}

/// Finds related-card categories for a resolved main card.
pub struct RelationFinder<'a> {
    provider: &'a dyn CardProvider,
    reference: &'a ReferenceCache,
    scope: &'a RequestScope,
}

impl<'a> RelationFinder<'a> {
    pub fn new(
        provider: &'a dyn CardProvider,
        reference: &'a ReferenceCache,
        scope: &'a RequestScope,
    ) -> Self {
        Self {
            provider,
            reference,
            scope,
        }
    }

    /// Categories for `requested` (or [`RelationType::DEFAULTS`] when
    /// empty), in request order. Repeated types are handled once.
    pub fn find(
        &self,
        main: &Card,
        requested: &[RelationType],
        max: usize,
    ) -> Vec<RelatedCardCategory> {
        let requested = if requested.is_empty() {
            &RelationType::DEFAULTS[..]
        } else {
            requested
        };

        let mut seen: Vec<RelationType> = Vec::with_capacity(requested.len());
        let mut categories = Vec::new();

        for relation in requested {
            if seen.contains(relation) {
                continue;
            }
            seen.push(*relation);

            let category = match relation {
                RelationType::Reprints => self.reprints(main, max),
                RelationType::Tokens => self.tokens(main, max),
                RelationType::Mechanics => self.mechanics(main, max),
                RelationType::SameArtist => self.same_artist(main, max),
                RelationType::SameSet => self.same_set(main, max),
            };

            match category {
                Some(category) => {
                    info!(
                        "Found {} cards for '{}'",
                        category.count, category.category_name
                    );
                    categories.push(category);
                }
                None => debug!("No {} for {}", relation.as_str(), main.name),
            }
        }

        categories
    }

    /// Other printings sharing the main card's oracle identity.
    fn reprints(&self, main: &Card, max: usize) -> Option<RelatedCardCategory> {
        let oracle_id = main.oracle_id.as_deref().filter(|id| !id.is_empty())?;
        debug!("Searching for reprints of {} (oracle_id: {})", main.name, oracle_id);

        let page = self
            .provider
            .search_cards(self.scope, &query::oracle_id(oracle_id), &SearchOptions::prints())
            .inspect_err(|e| debug!("Reprint search failed: {}", e))
            .ok()?;

        let cards: Vec<Card> = page
            .cards
            .into_iter()
            .filter(|card| card.id != main.id)
            .collect();

        (!cards.is_empty()).then(|| RelatedCardCategory::new("Reprints", cards, max))
    }

    /// Tokens listed among the main card's parts.
    fn tokens(&self, main: &Card, max: usize) -> Option<RelatedCardCategory> {
        let mut cards = Vec::new();
        for part in main.token_parts().filter(|part| part.id != main.id) {
            match self.provider.get_card(self.scope, &part.id) {
                Ok(token) => cards.push(token),
                Err(e) => debug!("Token {} ({}) unavailable: {}", part.name, part.id, e),
            }
        }

        (!cards.is_empty()).then(|| RelatedCardCategory::new("Tokens Created", cards, max))
    }

    /// The first of the leading keywords that other cards share.
    fn mechanics(&self, main: &Card, max: usize) -> Option<RelatedCardCategory> {
        let keywords = extract_keywords(&main.oracle_text(), self.reference.keyword_abilities());

        keywords.iter().take(MECHANIC_KEYWORDS).find_map(|keyword| {
            let cards = follow_up(
                self.provider,
                self.scope,
                main,
                &query::keyword_excluding(keyword, &main.name),
                &SearchOptions::default(),
            )?;
            Some(RelatedCardCategory::new(
                format!("Similar Mechanics ({})", keyword),
                cards,
                capped(max),
            ))
        })
    }

    fn same_artist(&self, main: &Card, max: usize) -> Option<RelatedCardCategory> {
        let artist = main.artist()?;
        let cards = follow_up(
            self.provider,
            self.scope,
            main,
            &query::artist_excluding(artist, &main.name),
            &SearchOptions::default(),
        )?;
        Some(RelatedCardCategory::new(
            format!("Same Artist ({})", artist),
            cards,
            max,
        ))
    }

    fn same_set(&self, main: &Card, max: usize) -> Option<RelatedCardCategory> {
        let code = main.set.trim();
        if code.is_empty() {
            return None;
        }

        let cards = follow_up(
            self.provider,
            self.scope,
            main,
            &query::set_excluding(code, &main.name),
            &SearchOptions::default(),
        )?;
        let set_name = if main.set_name.is_empty() {
            code
        } else {
            main.set_name.as_str()
        };
        Some(RelatedCardCategory::new(
            format!("Same Set ({})", set_name),
            cards,
            max,
        ))
    }
}
