//! In-memory provider for engine tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::scryfall::{
    Card, CardProvider, ProviderError, ProviderResult, RequestScope, SearchOptions, SearchPage,
};

/// Card with an id and a name.
pub fn card(id: &str, name: &str) -> Card {
    Card {
        id: id.to_string(),
        name: name.to_string(),
        ..Default::default()
    }
}

/// `n` distinct filler cards.
pub fn cards(prefix: &str, n: usize) -> Vec<Card> {
    (0..n)
        .map(|i| card(&format!("{prefix}-{i}"), &format!("{prefix} {i}")))
        .collect()
}

/// Provider answering from fixed query results.
///
/// Unknown queries return an empty page, like a Scryfall 404.
#[derive(Default)]
pub struct FakeProvider {
    results: HashMap<String, Vec<Card>>,
    failures: HashSet<String>,
    by_id: HashMap<String, Card>,
    queries: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, query: &str, cards: Vec<Card>) -> Self {
        self.results.insert(query.to_string(), cards);
        self
    }

    pub fn with_failure(mut self, query: &str) -> Self {
        self.failures.insert(query.to_string());
        self
    }

    pub fn with_card(mut self, card: Card) -> Self {
        self.by_id.insert(card.id.clone(), card);
        self
    }

    /// Queries and ids requested so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl CardProvider for FakeProvider {
    fn search_cards(
        &self,
        scope: &RequestScope,
        query: &str,
        _options: &SearchOptions,
    ) -> ProviderResult<SearchPage> {
        scope.check()?;
        self.queries.lock().unwrap().push(query.to_string());
        if self.failures.contains(query) {
            return Err(ProviderError::api(400, "bad_request", "forced failure"));
        }
        let cards = self.results.get(query).cloned().unwrap_or_default();
        Ok(SearchPage::from_cards(cards))
    }

    fn get_card(&self, scope: &RequestScope, id: &str) -> ProviderResult<Card> {
        scope.check()?;
        self.queries.lock().unwrap().push(format!("id:{id}"));
        self.by_id
            .get(id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))
    }
}
