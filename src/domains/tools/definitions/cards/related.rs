//! Related-card discovery tool.
//!
//! Resolves a card by exact name, then groups other cards related to it:
//! reprints, tokens it creates, cards sharing its mechanics, its artist or
//! its set.

use std::fmt::Write as _;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::common::{append_cards, discovery_error_result, structured_result};
use crate::domains::discovery::{DiscoveryService, RelationType};
use crate::domains::tools::context::ToolContext;
#[cfg(feature = "http")]
use crate::domains::tools::error::ToolError;
use crate::scryfall::RequestScope;

/// Parameters for related-card discovery.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FindRelatedCardsParams {
    /// Exact card name.
    #[schemars(description = "The exact name of the card to find related cards for")]
    #[serde(default)]
    pub card_name: String,

    #[schemars(
        description = "Relations to look for: reprints, tokens, mechanics, same_artist, same_set (default: reprints, tokens, mechanics, same_set)"
    )]
    #[serde(default)]
    pub relation_types: Vec<RelationType>,

    #[schemars(description = "Maximum cards per category (default: 10, max: 100)")]
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Related-card discovery tool implementation.
#[derive(Debug, Clone, Default)]
pub struct FindRelatedCardsTool;

impl FindRelatedCardsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "find_related_cards";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Finds cards related to a Magic: The Gathering card: other printings, tokens it creates, cards with similar mechanics, cards by the same artist or from the same set. Results are grouped into categories, each with the total match count.";

    /// Execute the tool logic.
    #[instrument(skip(discovery, scope))]
    pub fn execute(
        params: &FindRelatedCardsParams,
        discovery: &DiscoveryService,
        scope: &RequestScope,
    ) -> CallToolResult {
        let result = match discovery.related_cards(
            scope,
            &params.card_name,
            &params.relation_types,
            params.max_results,
        ) {
            Ok(result) => result,
            Err(e) => return discovery_error_result(&e),
        };

        info!(
            "Found {} related categories for {}",
            result.categories.len(),
            result.main_card.name
        );

        let mut summary = if result.categories.is_empty() {
            format!("No related cards found for '{}'.", result.main_card.name)
        } else {
            format!(
                "Found {} related card categor{} for '{}':",
                result.categories.len(),
                if result.categories.len() == 1 { "y" } else { "ies" },
                result.main_card.name
            )
        };
        for category in &result.categories {
            let _ = write!(
                summary,
                "\n\n{} ({} total)",
                category.category_name, category.count
            );
            append_cards(&mut summary, &category.cards, "  ");
        }

        structured_result(summary, result)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        context: Arc<ToolContext>,
    ) -> Result<serde_json::Value, String> {
        let params: FindRelatedCardsParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()).to_string())?;

        let result = context
            .run(move |discovery, scope| Self::execute(&params, discovery, scope))
            .await
            .map_err(|e| e.to_string())?;

        Ok(super::common::http_response(result))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<FindRelatedCardsParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(context: Arc<ToolContext>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let context = context.clone();
            async move {
                let params: FindRelatedCardsParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

                context
                    .run(move |discovery, scope| Self::execute(&params, discovery, scope))
                    .await
                    .map_err(|e| McpError::internal_error(e.to_string(), None))
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::discovery::testing::FakeProvider;
    use crate::domains::tools::definitions::cards::testing::{context, llanowar, result_text};

    #[test]
    fn test_params_camel_case() {
        let params: FindRelatedCardsParams = serde_json::from_str(
            r#"{"cardName": "Llanowar Elves", "relationTypes": ["reprints", "same_artist"], "maxResults": 3}"#,
        )
        .unwrap();
        assert_eq!(params.card_name, "Llanowar Elves");
        assert_eq!(
            params.relation_types,
            vec![RelationType::Reprints, RelationType::SameArtist]
        );
        assert_eq!(params.max_results, Some(3));
    }

    #[test]
    fn test_unknown_relation_type_is_rejected() {
        let parsed = serde_json::from_str::<FindRelatedCardsParams>(
            r#"{"cardName": "X", "relationTypes": ["rulings"]}"#,
        );
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn test_llanowar_reprints() {
        let mut dom = llanowar();
        dom.id = "elves-dom".into();
        let mut lea = llanowar();
        lea.id = "elves-lea".into();
        let provider = FakeProvider::new()
            .with_results(r#"!"Llanowar Elves""#, vec![llanowar()])
            .with_results("oracle_id:ora-elves", vec![llanowar(), dom, lea]);
        let (context, _) = context(provider);

        let params = FindRelatedCardsParams {
            card_name: "Llanowar Elves".into(),
            relation_types: vec![],
            max_results: None,
        };
        let result = context
            .run(move |discovery, scope| FindRelatedCardsTool::execute(&params, discovery, scope))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert!(result_text(&result).contains("Reprints (2 total)"));
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["mainCard"]["id"], "elves-m19");
        assert_eq!(structured["categories"][0]["categoryName"], "Reprints");
        assert_eq!(structured["categories"][0]["count"], 2);
    }

    #[tokio::test]
    async fn test_unknown_card_is_error_result() {
        let (context, _) = context(FakeProvider::new());
        let params = FindRelatedCardsParams {
            card_name: "Not A Card".into(),
            relation_types: vec![],
            max_results: None,
        };
        let result = context
            .run(move |discovery, scope| FindRelatedCardsTool::execute(&params, discovery, scope))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result_text(&result),
            "No card found matching the name 'Not A Card'"
        );
    }
}
