//! Card synergy discovery tool.

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
use crate::domains::discovery::DiscoveryService;
use crate::domains::tools::context::ToolContext;
#[cfg(feature = "http")]
use crate::domains::tools::error::ToolError;
use crate::scryfall::RequestScope;

/// Parameters for synergy discovery.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FindCardSynergiesParams {
    #[schemars(description = "The exact name of the card to find synergies for")]
    #[serde(default)]
    pub card_name: String,

    /// Explicit theme replacing the themes extracted from the card.
    #[schemars(
        description = "Optional theme to search for instead of the card's own themes (e.g. sacrifice, tokens, tribal)"
    )]
    #[serde(default)]
    pub theme: Option<String>,

    #[schemars(description = "Maximum cards per category (default: 15, at most 5 are returned per category)")]
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Synergy discovery tool implementation.
#[derive(Debug, Clone, Default)]
pub struct FindCardSynergiesTool;

impl FindCardSynergiesTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "find_card_synergies";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Finds cards that synergize with a Magic: The Gathering card. Extracts the card's keyword abilities and themes (sacrifice, tokens, counters, tribal, ...) from its rules text and returns categories of cards sharing keywords, supporting its themes or sharing its colors.";

    /// Execute the tool logic.
    #[instrument(skip(discovery, scope))]
    pub fn execute(
        params: &FindCardSynergiesParams,
        discovery: &DiscoveryService,
        scope: &RequestScope,
    ) -> CallToolResult {
        let result = match discovery.card_synergies(
            scope,
            &params.card_name,
            params.theme.as_deref(),
            params.max_results,
        ) {
            Ok(result) => result,
            Err(e) => return discovery_error_result(&e),
        };

        info!(
            "Found {} synergy categories for {}",
            result.synergies.len(),
            result.main_card.name
        );

        let themes = if result.extracted_themes.is_empty() {
            "none".to_string()
        } else {
            result.extracted_themes.join(", ")
        };

        let mut summary = if result.synergies.is_empty() {
            format!(
                "No synergies found for '{}' (themes: {}).",
                result.main_card.name, themes
            )
        } else {
            format!(
                "Found {} synergy categor{} for '{}' (themes: {}):",
                result.synergies.len(),
                if result.synergies.len() == 1 { "y" } else { "ies" },
                result.main_card.name,
                themes
            )
        };
        for synergy in &result.synergies {
            let _ = write!(
                summary,
                "\n\n{}: {} ({} total)",
                synergy.synergy_type, synergy.description, synergy.count
            );
            append_cards(&mut summary, &synergy.cards, "  ");
        }

        structured_result(summary, result)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        context: Arc<ToolContext>,
    ) -> Result<serde_json::Value, String> {
        let params: FindCardSynergiesParams = serde_json::from_value(arguments)
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
            input_schema: cached_schema_for_type::<FindCardSynergiesParams>(),
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
                let params: FindCardSynergiesParams =
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
    use crate::domains::discovery::testing::{card, cards, FakeProvider};
    use crate::domains::tools::definitions::cards::testing::{context, llanowar, result_text};

    #[tokio::test]
    async fn test_card_without_synergies_is_success() {
        let provider =
            FakeProvider::new().with_results(r#"!"Vanilla Rock""#, vec![card("rock", "Vanilla Rock")]);
        let (context, _) = context(provider);
        let params = FindCardSynergiesParams {
            card_name: "Vanilla Rock".into(),
            theme: None,
            max_results: None,
        };
        let result = context
            .run(move |discovery, scope| FindCardSynergiesTool::execute(&params, discovery, scope))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(
            result_text(&result),
            "No synergies found for 'Vanilla Rock' (themes: none)."
        );
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["synergies"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_tribal_theme_for_llanowar() {
        let provider = FakeProvider::new()
            .with_results(r#"!"Llanowar Elves""#, vec![llanowar()])
            .with_results(r#"type:Elf -name:"Llanowar Elves""#, cards("elf", 40))
            .with_results(r#"color:G -name:"Llanowar Elves""#, cards("green", 3));
        let (context, _) = context(provider);
        let params = FindCardSynergiesParams {
            card_name: "Llanowar Elves".into(),
            theme: Some("tribal".into()),
            max_results: Some(4),
        };
        let result = context
            .run(move |discovery, scope| FindCardSynergiesTool::execute(&params, discovery, scope))
            .await
            .unwrap();

        assert!(result_text(&result).contains("Tribal Synergy: Cards that share the Elf creature type (40 total)"));
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["extractedThemes"], serde_json::json!(["tribal"]));
        let synergies = structured["synergies"].as_array().unwrap();
        assert_eq!(synergies.len(), 2);
        assert_eq!(synergies[0]["cards"].as_array().unwrap().len(), 4);
        assert_eq!(synergies[1]["synergyType"], "Color Identity Synergy");
    }

    #[test]
    fn test_missing_card_name_is_empty() {
        let params: FindCardSynergiesParams = serde_json::from_str("{}").unwrap();
        assert!(params.card_name.is_empty());
        assert!(params.theme.is_none());
    }
}
