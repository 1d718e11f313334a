//! Synergy aggregation.
//!
//! Three passes run in order and append to one category list:
//!
//! 1. keyword pass, one category per shared keyword until the list holds
//!    [`KEYWORD_PASS_LIMIT`] entries;
//! 2. theme pass, at most [`THEME_PASS_LIMIT`] successful themes, with the
//!    tribal theme resolved through the card's creature types;
//! 3. color pass, only while the list holds fewer than
//!    [`COLOR_PASS_LIMIT`] entries.
//!
//! Every category holds at most `min(5, maxResults)` cards.

use schemars::JsonSchema;
use serde::Serialize;
use tracing::{debug, info};

use super::keywords::extract_keywords;
use super::lookup::{capped, follow_up, limit_cards};
use super::reference::ReferenceCache;
use super::themes::{extract_themes, Theme};
use crate::scryfall::{query, Card, CardProvider, RequestScope, SearchOptions};

const KEYWORD_PASS_LIMIT: usize = 3;
const THEME_PASS_LIMIT: usize = 2;
const COLOR_PASS_LIMIT: usize = 4;

pub const KEYWORD_SYNERGY: &str = "Keyword Synergy";
pub const COLOR_IDENTITY_SYNERGY: &str = "Color Identity Synergy";

/// A labelled group of synergistic cards.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SynergyCategory {
    pub synergy_type: String,
    pub description: String,
    pub cards: Vec<Card>,
    /// Number of matches before truncation.
    pub count: usize,
}

/// Themes used for the search and the categories they produced.
#[derive(Debug, Clone, Default)]
pub struct SynergyOutcome {
    pub themes: Vec<String>,
    pub synergies: Vec<SynergyCategory>,
}

/// Builds synergy categories for a resolved main card.
pub struct SynergyAggregator<'a> {
    provider: &'a dyn CardProvider,
    reference: &'a ReferenceCache,
    scope: &'a RequestScope,
}

impl<'a> SynergyAggregator<'a> {
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

    /// Run all passes. An explicit `theme` replaces classification and
    /// becomes the only search theme.
    pub fn find(&self, main: &Card, theme: Option<&str>, max: usize) -> SynergyOutcome {
        let themes = match theme.map(str::trim).filter(|t| !t.is_empty()) {
            Some(theme) => vec![theme.to_lowercase()],
            None => extract_themes(main, self.reference),
        };
        debug!("Search themes for {}: {:?}", main.name, themes);

        let cap = capped(max);
        let mut synergies = Vec::new();
        self.keyword_pass(main, cap, &mut synergies);
        self.theme_pass(main, &themes, cap, &mut synergies);
        self.color_pass(main, cap, &mut synergies);

        info!("Found {} synergy categories for {}", synergies.len(), main.name);
        SynergyOutcome { themes, synergies }
    }

    fn keyword_pass(&self, main: &Card, cap: usize, synergies: &mut Vec<SynergyCategory>) {
        let keywords = extract_keywords(&main.oracle_text(), self.reference.keyword_abilities());

        for keyword in keywords {
            if synergies.len() >= KEYWORD_PASS_LIMIT {
                break;
            }
            debug!("Searching for keyword synergy: {}", keyword);
            let query = query::keyword_excluding(&keyword, &main.name);
            if let Some(cards) = self.search(main, &query) {
                push_unique(
                    synergies,
                    KEYWORD_SYNERGY,
                    format!("Cards that share the '{}' keyword ability", keyword),
                    cards,
                    cap,
                );
            }
        }
    }

    fn theme_pass(
        &self,
        main: &Card,
        themes: &[String],
        cap: usize,
        synergies: &mut Vec<SynergyCategory>,
    ) {
        let patterns = self.reference.theme_patterns();
        let mut matched = 0;

        for name in themes {
            if matched >= THEME_PASS_LIMIT {
                break;
            }
            let Some(theme) = patterns.get(name) else {
                continue;
            };

            let found = if theme.is_tribal() {
                self.tribal(main, theme, cap, synergies)
            } else if !theme.pattern.synergy_query.trim().is_empty() {
                debug!("Searching for theme synergy: {}", theme.name);
                let query = query::theme_excluding(&theme.pattern.synergy_query, &main.name);
                match self.search(main, &query) {
                    Some(cards) => push_unique(
                        synergies,
                        &theme.pattern.synergy_type,
                        theme.pattern.synergy_description.clone(),
                        cards,
                        cap,
                    ),
                    None => false,
                }
            } else {
                false
            };

            if found {
                matched += 1;
            }
        }
    }

    /// Query the first known creature type found in the main card's type line.
    fn tribal(
        &self,
        main: &Card,
        theme: &Theme,
        cap: usize,
        synergies: &mut Vec<SynergyCategory>,
    ) -> bool {
        let type_line = main.type_line().to_ascii_lowercase();
        if type_line.is_empty() {
            return false;
        }

        let Some(creature_type) = self
            .reference
            .creature_types()
            .iter()
            .find(|t| !t.is_empty() && type_line.contains(&t.to_ascii_lowercase()))
        else {
            return false;
        };

        debug!("Searching for tribal synergy: {}", creature_type);
        let query = query::type_excluding(creature_type, &main.name);
        match self.search(main, &query) {
            Some(cards) => push_unique(
                synergies,
                &theme.pattern.synergy_type,
                format!("Cards that share the {} creature type", creature_type),
                cards,
                cap,
            ),
            None => false,
        }
    }

    fn color_pass(&self, main: &Card, cap: usize, synergies: &mut Vec<SynergyCategory>) {
        if synergies.len() >= COLOR_PASS_LIMIT {
            return;
        }
        let codes: String = main.colors().concat();
        if codes.is_empty() {
            return;
        }

        debug!("Searching for color identity synergy: {}", codes);
        let query = query::color_excluding(&codes, &main.name);
        if let Some(cards) = self.search(main, &query) {
            push_unique(
                synergies,
                COLOR_IDENTITY_SYNERGY,
                "Cards that share the same color identity".to_string(),
                cards,
                cap,
            );
        }
    }

    fn search(&self, main: &Card, query: &str) -> Option<Vec<Card>> {
        follow_up(
            self.provider,
            self.scope,
            main,
            query,
            &SearchOptions::default(),
        )
    }
}

/// Append a category unless one with the same type and description exists.
fn push_unique(
    synergies: &mut Vec<SynergyCategory>,
    synergy_type: &str,
    description: String,
    cards: Vec<Card>,
    cap: usize,
) -> bool {
    if synergies
        .iter()
        .any(|s| s.synergy_type == synergy_type && s.description == description)
    {
        return false;
    }

    let count = cards.len();
    synergies.push(SynergyCategory {
        synergy_type: synergy_type.to_string(),
        description,
        cards: limit_cards(cards, cap),
        count,
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::discovery::testing::{card, cards, FakeProvider};
    use crate::domains::discovery::themes::{ThemePattern, ThemePatterns, TRIBAL_THEME};

    fn theme(query: &str, kind: &str, patterns: &[&str]) -> ThemePattern {
        ThemePattern {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            synergy_query: query.to_string(),
            synergy_description: format!("{kind} cards"),
            synergy_type: kind.to_string(),
        }
    }

    fn reference() -> ReferenceCache {
        ReferenceCache::with_data(
            vec!["Druid".to_string(), "Elf".to_string()],
            vec![
                "flying".to_string(),
                "haste".to_string(),
                "trample".to_string(),
                "vigilance".to_string(),
            ],
            ThemePatterns::from_definitions([
                ("sacrifice", theme("(o:sacrifice)", "Sacrifice Synergy", &["sacrifice"])),
                ("tokens", theme("(o:token)", "Token Synergy", &["token"])),
                ("counters", theme("(o:counter)", "Counter Synergy", &["counter"])),
                (TRIBAL_THEME, theme("", "Tribal Synergy", &["elf"])),
            ]),
        )
    }

    #[test]
    fn test_no_themes_and_no_colors_is_empty_success() {
        let main = card("rock", "Plain Rock");
        let provider = FakeProvider::new();
        let reference = reference();
        let scope = RequestScope::unbounded();

        let outcome = SynergyAggregator::new(&provider, &reference, &scope).find(&main, None, 15);
        assert!(outcome.themes.is_empty());
        assert!(outcome.synergies.is_empty());
        assert!(provider.queries().is_empty());
    }

    #[test]
    fn test_keyword_pass_stops_at_three_categories() {
        let mut main = card("dragon", "Big Dragon");
        main.oracle_text = Some("Flying, haste, trample, vigilance".into());
        let mut provider = FakeProvider::new();
        for kw in ["flying", "haste", "trample", "vigilance"] {
            provider = provider.with_results(
                &format!(r#"oracle:"{kw}" -name:"Big Dragon""#),
                cards(kw, 9),
            );
        }
        let reference = reference();
        let scope = RequestScope::unbounded();

        let outcome = SynergyAggregator::new(&provider, &reference, &scope).find(&main, None, 15);
        assert_eq!(outcome.synergies.len(), 3);
        assert!(outcome.synergies.iter().all(|s| s.synergy_type == KEYWORD_SYNERGY));
        assert!(outcome.synergies.iter().all(|s| s.cards.len() == 5 && s.count == 9));
        assert!(!provider.queries().iter().any(|q| q.contains("vigilance")));
    }

    #[test]
    fn test_theme_pass_limits_to_two_themes() {
        let mut main = card("engine", "Engine");
        main.oracle_text = Some("Sacrifice a token: put a +1/+1 counter on target creature.".into());
        let provider = FakeProvider::new()
            .with_results(r#"(o:sacrifice) -name:"Engine""#, cards("s", 2))
            .with_results(r#"(o:token) -name:"Engine""#, cards("t", 2))
            .with_results(r#"(o:counter) -name:"Engine""#, cards("c", 2));
        let reference = reference();
        let scope = RequestScope::unbounded();

        let outcome = SynergyAggregator::new(&provider, &reference, &scope).find(&main, None, 15);
        assert_eq!(outcome.themes, vec!["sacrifice", "tokens", "counters"]);
        let kinds: Vec<_> = outcome.synergies.iter().map(|s| s.synergy_type.as_str()).collect();
        assert_eq!(kinds, vec!["Sacrifice Synergy", "Token Synergy"]);
    }

    #[test]
    fn test_failed_theme_does_not_count() {
        let mut main = card("engine", "Engine");
        main.oracle_text = Some("Sacrifice a token: put a counter on it.".into());
        let provider = FakeProvider::new()
            .with_failure(r#"(o:sacrifice) -name:"Engine""#)
            .with_results(r#"(o:token) -name:"Engine""#, cards("t", 2))
            .with_results(r#"(o:counter) -name:"Engine""#, cards("c", 2));
        let reference = reference();
        let scope = RequestScope::unbounded();

        let outcome = SynergyAggregator::new(&provider, &reference, &scope).find(&main, None, 15);
        let kinds: Vec<_> = outcome.synergies.iter().map(|s| s.synergy_type.as_str()).collect();
        assert_eq!(kinds, vec!["Token Synergy", "Counter Synergy"]);
    }

    #[test]
    fn test_tribal_and_color_passes() {
        let main = Card {
            id: "elves".into(),
            name: "Llanowar Elves".into(),
            type_line: Some("Creature — Elf Druid".into()),
            oracle_text: Some("Tap: Add G.".into()),
            colors: Some(vec!["G".into()]),
            ..Default::default()
        };
        let provider = FakeProvider::new()
            .with_results(r#"type:Druid -name:"Llanowar Elves""#, cards("d", 3))
            .with_results(r#"color:G -name:"Llanowar Elves""#, cards("g", 7));
        let reference = reference();
        let scope = RequestScope::unbounded();

        let outcome = SynergyAggregator::new(&provider, &reference, &scope).find(
            &main,
            Some(" Tribal "),
            2,
        );
        assert_eq!(outcome.themes, vec!["tribal"]);
        assert_eq!(outcome.synergies.len(), 2);
        assert_eq!(outcome.synergies[0].synergy_type, "Tribal Synergy");
        assert_eq!(
            outcome.synergies[0].description,
            "Cards that share the Druid creature type"
        );
        assert_eq!(outcome.synergies[0].cards.len(), 2);
        assert_eq!(outcome.synergies[1].synergy_type, COLOR_IDENTITY_SYNERGY);
        assert_eq!(outcome.synergies[1].count, 7);
        assert!(!provider.queries().iter().any(|q| q.contains("type:Elf")));
    }

    #[test]
    fn test_color_pass_skipped_at_four_categories() {
        let mut main = card("goblin", "Furnace Goblin");
        main.oracle_text = Some("Flying, haste, trample. Sacrifice a creature: draw a card.".into());
        main.colors = Some(vec!["R".into()]);
        let mut provider = FakeProvider::new()
            .with_results(r#"(o:sacrifice) -name:"Furnace Goblin""#, cards("s", 2))
            .with_results(r#"color:R -name:"Furnace Goblin""#, cards("r", 2));
        for kw in ["flying", "haste", "trample"] {
            provider = provider.with_results(
                &format!(r#"oracle:"{kw}" -name:"Furnace Goblin""#),
                cards(kw, 2),
            );
        }
        let reference = reference();
        let scope = RequestScope::unbounded();

        let outcome = SynergyAggregator::new(&provider, &reference, &scope).find(&main, None, 15);
        let kinds: Vec<_> = outcome.synergies.iter().map(|s| s.synergy_type.as_str()).collect();
        assert_eq!(
            kinds,
            vec![KEYWORD_SYNERGY, KEYWORD_SYNERGY, KEYWORD_SYNERGY, "Sacrifice Synergy"]
        );
        assert!(!provider.queries().iter().any(|q| q.starts_with("color:")));
    }

    #[test]
    fn test_color_pass_appends_after_three_categories() {
        let mut main = card("goblin", "Furnace Goblin");
        main.oracle_text = Some("Flying, haste, trample".into());
        main.colors = Some(vec!["R".into()]);
        let mut provider = FakeProvider::new()
            .with_results(r#"color:R -name:"Furnace Goblin""#, cards("r", 6));
        for kw in ["flying", "haste", "trample"] {
            provider = provider.with_results(
                &format!(r#"oracle:"{kw}" -name:"Furnace Goblin""#),
                cards(kw, 2),
            );
        }
        let reference = reference();
        let scope = RequestScope::unbounded();

        let outcome = SynergyAggregator::new(&provider, &reference, &scope).find(&main, None, 15);
        assert_eq!(outcome.synergies.len(), 4);
        assert_eq!(outcome.synergies[3].synergy_type, COLOR_IDENTITY_SYNERGY);
        assert_eq!(outcome.synergies[3].cards.len(), 5);
        assert_eq!(outcome.synergies[3].count, 6);
    }

    #[test]
    fn test_unknown_creature_type_does_not_count_as_theme() {
        let mut main = card("goblin", "Goblin Engine");
        main.type_line = Some("Creature — Goblin Warrior".into());
        let provider = FakeProvider::new()
            .with_results(r#"(o:sacrifice) -name:"Goblin Engine""#, cards("s", 2))
            .with_results(r#"(o:token) -name:"Goblin Engine""#, cards("t", 2));
        let reference = reference();
        let scope = RequestScope::unbounded();
        let aggregator = SynergyAggregator::new(&provider, &reference, &scope);

        let themes: Vec<String> = ["tribal", "sacrifice", "tokens"].map(String::from).into();
        let mut synergies = Vec::new();
        aggregator.theme_pass(&main, &themes, 5, &mut synergies);

        let kinds: Vec<_> = synergies.iter().map(|s| s.synergy_type.as_str()).collect();
        assert_eq!(kinds, vec!["Sacrifice Synergy", "Token Synergy"]);
        assert!(!provider.queries().iter().any(|q| q.starts_with("type:")));
    }

    #[test]
    fn test_empty_tribal_search_does_not_count_as_theme() {
        let mut main = card("elves", "Elvish Engine");
        main.type_line = Some("Creature — Elf Druid".into());
        let provider = FakeProvider::new()
            .with_results(r#"(o:sacrifice) -name:"Elvish Engine""#, cards("s", 2))
            .with_results(r#"(o:token) -name:"Elvish Engine""#, cards("t", 2));
        let reference = reference();
        let scope = RequestScope::unbounded();
        let aggregator = SynergyAggregator::new(&provider, &reference, &scope);

        let themes: Vec<String> = ["tribal", "sacrifice", "tokens"].map(String::from).into();
        let mut synergies = Vec::new();
        aggregator.theme_pass(&main, &themes, 5, &mut synergies);

        let kinds: Vec<_> = synergies.iter().map(|s| s.synergy_type.as_str()).collect();
        assert_eq!(kinds, vec!["Sacrifice Synergy", "Token Synergy"]);
        assert_eq!(
            provider.queries()[0],
            r#"type:Druid -name:"Elvish Engine""#
        );
    }

    #[test]
    fn test_double_faced_card_uses_face_text_types_and_colors() {
        let main: Card = serde_json::from_str(
            r#"{
                "id": "delver",
                "name": "Delver of Secrets // Insectile Aberration",
                "layout": "transform",
                "card_faces": [
                    {
                        "name": "Delver of Secrets",
                        "type_line": "Creature — Human Wizard",
                        "oracle_text": "At the beginning of your upkeep, look at the top card of your library.",
                        "colors": ["U"]
                    },
                    {
                        "name": "Insectile Aberration",
                        "type_line": "Creature — Human Insect",
                        "oracle_text": "Flying",
                        "colors": ["U"]
                    }
                ]
            }"#,
        )
        .unwrap();
        let reference = ReferenceCache::with_data(
            vec!["Human".to_string()],
            vec!["flying".to_string()],
            ThemePatterns::from_definitions([(
                TRIBAL_THEME,
                theme("", "Tribal Synergy", &["insect"]),
            )]),
        );
        let name = r#"-name:"Delver of Secrets // Insectile Aberration""#;
        let provider = FakeProvider::new()
            .with_results(&format!(r#"oracle:"flying" {name}"#), cards("f", 3))
            .with_results(&format!("type:Human {name}"), cards("h", 3))
            .with_results(&format!("color:U {name}"), cards("u", 3));
        let scope = RequestScope::unbounded();
        let aggregator = SynergyAggregator::new(&provider, &reference, &scope);

        let outcome = aggregator.find(&main, None, 15);
        assert_eq!(outcome.themes, vec!["flying"]);
        let kinds: Vec<_> = outcome.synergies.iter().map(|s| s.synergy_type.as_str()).collect();
        assert_eq!(kinds, vec![KEYWORD_SYNERGY, COLOR_IDENTITY_SYNERGY]);

        let outcome = aggregator.find(&main, Some("tribal"), 15);
        assert_eq!(
            outcome.synergies[1].description,
            "Cards that share the Human creature type"
        );
        assert_eq!(outcome.synergies.len(), 3);
    }

    #[test]
    fn test_unknown_explicit_theme_only_skips_theme_pass() {
        let mut main = card("angel", "Serra Angel");
        main.oracle_text = Some("Flying".into());
        let provider = FakeProvider::new()
            .with_results(r#"oracle:"flying" -name:"Serra Angel""#, cards("f", 1));
        let reference = reference();
        let scope = RequestScope::unbounded();

        let outcome = SynergyAggregator::new(&provider, &reference, &scope).find(
            &main,
            Some("Landfall"),
            15,
        );
        assert_eq!(outcome.themes, vec!["landfall"]);
        assert_eq!(outcome.synergies.len(), 1);
        assert_eq!(
            outcome.synergies[0].description,
            "Cards that share the 'flying' keyword ability"
        );
    }

    #[test]
    fn test_cancellation_keeps_collected_categories() {
        let mut main = card("angel", "Serra Angel");
        main.oracle_text = Some("Flying".into());
        main.colors = Some(vec!["W".into()]);
        let provider = FakeProvider::new()
            .with_results(r#"oracle:"flying" -name:"Serra Angel""#, cards("f", 1));
        let reference = reference();
        let scope = RequestScope::unbounded();
        let aggregator = SynergyAggregator::new(&provider, &reference, &scope);

        let mut synergies = Vec::new();
        aggregator.keyword_pass(&main, 5, &mut synergies);
        scope.cancel();
        aggregator.color_pass(&main, 5, &mut synergies);
        assert_eq!(synergies.len(), 1);
    }

    #[test]
    fn test_duplicate_labels_are_dropped() {
        let mut synergies = Vec::new();
        assert!(push_unique(&mut synergies, "T", "d".into(), cards("a", 1), 5));
        assert!(!push_unique(&mut synergies, "T", "d".into(), cards("b", 1), 5));
        assert!(push_unique(&mut synergies, "T", "e".into(), cards("c", 1), 5));
        assert_eq!(synergies.len(), 2);
    }
}
