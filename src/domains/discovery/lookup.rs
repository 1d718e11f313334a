//! Main-card resolution and helpers shared by the category finders.

use tracing::{debug, info, warn};

use super::error::DiscoveryError;
use crate::scryfall::{query, Card, CardProvider, RequestScope, SearchOptions};

/// Default number of cards per related-card category.
pub const DEFAULT_RELATED_RESULTS: usize = 10;

/// Default number of cards per synergy category.
pub const DEFAULT_SYNERGY_RESULTS: usize = 15;

/// Upper bound for a requested `maxResults`.
pub const MAX_RESULTS_LIMIT: usize = 100;

/// Hard cap for mechanics and synergy categories.
pub const CATEGORY_CARD_CAP: usize = 5;

/// Normalize a requested maximum: missing uses `default`, 0 becomes 1 and
/// anything above [`MAX_RESULTS_LIMIT`] is clamped.
pub fn effective_max(requested: Option<usize>, default: usize) -> usize {
    requested.unwrap_or(default).clamp(1, MAX_RESULTS_LIMIT)
}

/// Cap for categories with a hard limit of [`CATEGORY_CARD_CAP`].
pub fn capped(max: usize) -> usize {
    max.min(CATEGORY_CARD_CAP)
}

/// Keep at most `max` cards.
pub fn limit_cards(mut cards: Vec<Card>, max: usize) -> Vec<Card> {
    cards.truncate(max);
    cards
}

/// Resolve `name` through an exact-name search.
///
/// Unlike sub-queries, every failure here is fatal to the request.
pub fn resolve_main_card(
    provider: &dyn CardProvider,
    scope: &RequestScope,
    name: &str,
) -> Result<Card, DiscoveryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DiscoveryError::invalid_input("Card name cannot be empty."));
    }

    debug!("Resolving main card '{}'", name);
    let page = provider
        .search_cards(scope, &query::exact_name(name), &SearchOptions::default())
        .map_err(|source| {
            warn!("Main card lookup for '{}' failed: {}", name, source);
            DiscoveryError::Lookup {
                name: name.to_string(),
                source,
            }
        })?;

    let card = page
        .cards
        .into_iter()
        .next()
        .ok_or_else(|| DiscoveryError::CardNotFound {
            name: name.to_string(),
        })?;

    info!("Resolved main card: {} ({})", card.name, card.id);
    Ok(card)
}

/// Run a follow-up query and keep the cards that are not the main card.
///
/// Errors are logged and reported as `None`, as is an empty result.
pub(crate) fn follow_up(
    provider: &dyn CardProvider,
    scope: &RequestScope,
    main: &Card,
    query: &str,
    options: &SearchOptions,
) -> Option<Vec<Card>> {
    match provider.search_cards(scope, query, options) {
        Ok(page) => {
            let cards: Vec<Card> = page
                .cards
                .into_iter()
                .filter(|card| card.id != main.id && card.name != main.name)
                .collect();
            if cards.is_empty() { None } else { Some(cards) }
        }
        Err(e) if e.is_interrupted() => {
            debug!("Skipping '{}': {}", query, e);
            None
        }
        Err(e) => {
            warn!("Query '{}' failed: {}", query, e);
            None
        }
    }
}
