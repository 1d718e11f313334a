//! Fixtures for card tool tests.

use std::sync::Arc;

use rmcp::model::{CallToolResult, RawContent};

use crate::core::config::Config;
use crate::domains::discovery::testing::FakeProvider;
use crate::domains::discovery::{
    DiscoveryService, ReferenceCache, ThemePattern, ThemePatterns,
};
use crate::domains::tools::context::ToolContext;
use crate::scryfall::Card;

fn reference() -> &'static ReferenceCache {
    Box::leak(Box::new(ReferenceCache::with_data(
        vec!["Elf".to_string(), "Druid".to_string()],
        vec!["flying".to_string(), "trample".to_string()],
        ThemePatterns::from_definitions([(
            "tribal",
            ThemePattern {
                patterns: vec!["creatures? you control".to_string()],
                synergy_query: String::new(),
                synergy_description: "Creatures sharing a type".to_string(),
                synergy_type: "Tribal Synergy".to_string(),
            },
        )]),
    )))
}

/// Tool context over `provider`, plus a handle to inspect its queries.
pub fn context(provider: FakeProvider) -> (Arc<ToolContext>, Arc<FakeProvider>) {
    let provider = Arc::new(provider);
    let discovery = DiscoveryService::new(provider.clone(), reference());
    let context = ToolContext::new(discovery, &Config::default());
    (Arc::new(context), provider)
}

pub fn llanowar() -> Card {
    Card {
        id: "elves-m19".into(),
        oracle_id: Some("ora-elves".into()),
        name: "Llanowar Elves".into(),
        mana_cost: Some("{G}".into()),
        type_line: Some("Creature — Elf Druid".into()),
        oracle_text: Some("Tap: Add G.".into()),
        colors: Some(vec!["G".into()]),
        set: "m19".into(),
        set_name: "Core Set 2019".into(),
        ..Default::default()
    }
}

/// Text of the first content block.
pub fn result_text(result: &CallToolResult) -> String {
    match &result.content[0].raw {
        RawContent::Text(text) => text.text.clone(),
        _ => String::new(),
    }
}
