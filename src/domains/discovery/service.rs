//! Discovery service: the blocking entry points used by the tools.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Serialize;
use tracing::{info, instrument};

use super::error::DiscoveryError;
use super::lookup::{
    effective_max, limit_cards, resolve_main_card, DEFAULT_RELATED_RESULTS,
    DEFAULT_SYNERGY_RESULTS,
};
use super::reference::ReferenceCache;
use super::related::{RelatedCardCategory, RelationFinder, RelationType};
use super::synergy::{SynergyAggregator, SynergyCategory};
use crate::scryfall::{query, Card, CardProvider, RequestScope, SearchOptions};

/// Field used by a direct card search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Name,
    Text,
    Color,
}

impl SearchKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Text => "text",
            Self::Color => "color",
        }
    }

    /// Query string for `term`.
    pub fn query(&self, term: &str) -> String {
        match self {
            Self::Name => query::name(term),
            Self::Text => query::oracle_text(term),
            Self::Color => query::color(term),
        }
    }
}

/// Result of a direct card search.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardSearchResult {
    pub cards: Vec<Card>,
    /// Matches reported by the provider, before `limit` was applied.
    pub total_count: usize,
    /// The query sent to the provider.
    pub query: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelatedCardsResult {
    pub main_card: Card,
    pub categories: Vec<RelatedCardCategory>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardSynergiesResult {
    pub main_card: Card,
    pub extracted_themes: Vec<String>,
    pub synergies: Vec<SynergyCategory>,
}

/// Card search, related-card and synergy discovery over a [`CardProvider`].
///
/// All methods block; call them from a blocking worker.
#[derive(Clone)]
pub struct DiscoveryService {
    provider: Arc<dyn CardProvider>,
    reference: &'static ReferenceCache,
}

impl DiscoveryService {
    pub fn new(provider: Arc<dyn CardProvider>, reference: &'static ReferenceCache) -> Self {
        Self {
            provider,
            reference,
        }
    }

    pub fn reference(&self) -> &'static ReferenceCache {
        self.reference
    }

    /// Search cards by name, rules text or color.
    #[instrument(skip(self, scope))]
    pub fn search_cards(
        &self,
        scope: &RequestScope,
        kind: SearchKind,
        term: &str,
        limit: usize,
    ) -> Result<CardSearchResult, DiscoveryError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(DiscoveryError::invalid_input(format!(
                "Card {} cannot be empty.",
                kind.label()
            )));
        }

        let query = kind.query(term);
        info!("Searching Scryfall for {}: {} (Query: {})", kind.label(), term, query);

        let page = self
            .provider
            .search_cards(scope, &query, &SearchOptions::default())
            .map_err(|source| DiscoveryError::Search {
                kind: kind.label(),
                term: term.to_string(),
                source,
            })?;

        info!("Found {} cards matching {}: {}", page.total_cards, kind.label(), term);
        Ok(CardSearchResult {
            cards: limit_cards(page.cards, limit),
            total_count: page.total_cards,
            query,
        })
    }

    /// Resolve `card_name` and group related cards by relation type.
    #[instrument(skip(self, scope))]
    pub fn related_cards(
        &self,
        scope: &RequestScope,
        card_name: &str,
        relation_types: &[RelationType],
        max_results: Option<usize>,
    ) -> Result<RelatedCardsResult, DiscoveryError> {
        let main_card = resolve_main_card(self.provider.as_ref(), scope, card_name)?;
        let max = effective_max(max_results, DEFAULT_RELATED_RESULTS);

        let categories = RelationFinder::new(self.provider.as_ref(), self.reference, scope).find(
            &main_card,
            relation_types,
            max,
        );

        Ok(RelatedCardsResult {
            main_card,
            categories,
        })
    }

    /// Resolve `card_name` and collect synergy categories.
    #[instrument(skip(self, scope))]
    pub fn card_synergies(
        &self,
        scope: &RequestScope,
        card_name: &str,
        theme: Option<&str>,
        max_results: Option<usize>,
    ) -> Result<CardSynergiesResult, DiscoveryError> {
        let main_card = resolve_main_card(self.provider.as_ref(), scope, card_name)?;
        let max = effective_max(max_results, DEFAULT_SYNERGY_RESULTS);

        let outcome = SynergyAggregator::new(self.provider.as_ref(), self.reference, scope).find(
            &main_card,
            theme,
            max,
        );

        Ok(CardSynergiesResult {
            main_card,
            extracted_themes: outcome.themes,
            synergies: outcome.synergies,
        })
    }
}
