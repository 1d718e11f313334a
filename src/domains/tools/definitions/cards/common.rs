//! Common utilities shared across card tools.
//!
//! Result builders, limit handling and the rendering of discovery errors
//! as client-facing messages.

use std::fmt::Write as _;

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use tracing::{info, warn};

use crate::domains::discovery::{DiscoveryError, DiscoveryService, SearchKind};
use crate::scryfall::{Card, ProviderError, RequestScope};

/// Largest page Scryfall returns for a search.
pub const MAX_SEARCH_LIMIT: usize = 175;

/// Cards listed by name in a text summary.
const SUMMARY_CARDS: usize = 10;

/// Default limit for card searches.
pub fn default_limit() -> usize {
    20
}

/// Validate and clamp limit to allowed range (1-175).
pub fn validate_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_SEARCH_LIMIT)
}

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create a success result with a text summary and structured content.
pub fn structured_result<T: Serialize>(summary: String, data: T) -> CallToolResult {
    match serde_json::to_value(&data) {
        Ok(structured) => CallToolResult {
            content: vec![Content::text(summary)],
            structured_content: Some(structured),
            is_error: Some(false),
            meta: None,
        },
        Err(e) => {
            warn!("Failed to serialize structured content: {}", e);
            CallToolResult::success(vec![Content::text(summary)])
        }
    }
}

/// Render a discovery failure as an error result.
pub fn discovery_error_result(error: &DiscoveryError) -> CallToolResult {
    let message = match error {
        DiscoveryError::InvalidInput(msg) => format!("Error: {}", msg),
        DiscoveryError::Search {
            kind,
            term,
            source: ProviderError::Api {
                status, details, ..
            },
        } => format!(
            "Scryfall API error searching for {} '{}': {} (Status: {})",
            kind, term, details, status
        ),
        other => other.to_string(),
    };
    error_result(&message)
}

/// One summary line per card.
pub fn card_line(card: &Card) -> String {
    let mut line = card.name.clone();
    if let Some(cost) = card.mana_cost.as_deref().filter(|c| !c.is_empty()) {
        let _ = write!(line, " {}", cost);
    }
    let type_line = card.type_line();
    if !type_line.is_empty() {
        let _ = write!(line, " | {}", type_line);
    }
    if !card.set.is_empty() {
        let _ = write!(line, " ({})", card.set.to_uppercase());
    }
    line
}

/// Append up to [`SUMMARY_CARDS`] card lines to `summary`.
pub fn append_cards(summary: &mut String, cards: &[Card], indent: &str) {
    for card in cards.iter().take(SUMMARY_CARDS) {
        let _ = write!(summary, "\n{}- {}", indent, card_line(card));
    }
    if cards.len() > SUMMARY_CARDS {
        let _ = write!(
            summary,
            "\n{}... and {} more",
            indent,
            cards.len() - SUMMARY_CARDS
        );
    }
}

/// Body shared by the three search tools.
pub fn search_tool(
    discovery: &DiscoveryService,
    scope: &RequestScope,
    kind: SearchKind,
    term: &str,
    limit: usize,
) -> CallToolResult {
    match discovery.search_cards(scope, kind, term, validate_limit(limit)) {
        Ok(result) if result.cards.is_empty() => {
            info!("No cards found matching {}: {}", kind.label(), term);
            let summary = format!("No cards found matching the {} '{}'.", kind.label(), term.trim());
            structured_result(summary, result)
        }
        Ok(result) => {
            let mut summary = format!(
                "Found {} card(s) matching the {} '{}'",
                result.total_count,
                kind.label(),
                term.trim()
            );
            if result.cards.len() < result.total_count {
                let _ = write!(summary, ", showing {}", result.cards.len());
            }
            summary.push(':');
            append_cards(&mut summary, &result.cards, "");
            structured_result(summary, result)
        }
        Err(e) => discovery_error_result(&e),
    }
}

/// Shape of a tool result for the HTTP transport.
#[cfg(feature = "http")]
pub fn http_response(result: CallToolResult) -> serde_json::Value {
    let mut response = serde_json::json!({
        "content": result.content,
        "isError": result.is_error.unwrap_or(false)
    });

    if let (Some(structured), Some(object)) =
        (result.structured_content, response.as_object_mut())
    {
        object.insert("structuredContent".to_string(), structured);
    }

    response
}
