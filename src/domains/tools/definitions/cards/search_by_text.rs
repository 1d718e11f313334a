//! Card search by rules text.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use super::common::{default_limit, search_tool};
use crate::domains::discovery::{DiscoveryService, SearchKind};
use crate::domains::tools::context::ToolContext;
#[cfg(feature = "http")]
use crate::domains::tools::error::ToolError;
use crate::scryfall::RequestScope;

/// Parameters for a rules-text search.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchCardByTextParams {
    /// Text that must appear in the oracle text.
    #[schemars(description = "Text to look for in the card's oracle (rules) text")]
    #[serde(default)]
    pub text: String,

    /// Maximum number of cards to return.
    #[schemars(description = "Maximum number of cards (default: 20, max: 175)")]
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Rules-text search tool implementation.
#[derive(Debug, Clone, Default)]
pub struct SearchCardByTextTool;

impl SearchCardByTextTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "search_card_by_text";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Searches Scryfall for Magic: The Gathering cards whose oracle text contains the given phrase. Returns a summary plus structured card data (mana cost, type line, oracle text, set, prices, images).";

    /// Execute the tool logic.
    pub fn execute(
        params: &SearchCardByTextParams,
        discovery: &DiscoveryService,
        scope: &RequestScope,
    ) -> CallToolResult {
        info!("Card text search: {:?}", params.text);
        search_tool(discovery, scope, SearchKind::Text, &params.text, params.limit)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        context: Arc<ToolContext>,
    ) -> Result<serde_json::Value, String> {
        let params: SearchCardByTextParams = serde_json::from_value(arguments)
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
            input_schema: cached_schema_for_type::<SearchCardByTextParams>(),
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
                let params: SearchCardByTextParams =
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
    use crate::domains::tools::definitions::cards::testing::{context, result_text};

    #[test]
    fn test_params_default_limit() {
        let params: SearchCardByTextParams =
            serde_json::from_str(r#"{"text": "draw a card"}"#).unwrap();
        assert_eq!(params.limit, 20);
    }

    #[tokio::test]
    async fn test_empty_text_is_error_result() {
        let (context, provider) = context(Default::default());
        let params = SearchCardByTextParams {
            text: String::new(),
            limit: 20,
        };
        let result = context
            .run(move |discovery, scope| SearchCardByTextTool::execute(&params, discovery, scope))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result_text(&result), "Error: Card text cannot be empty.");
        assert!(provider.queries().is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_is_error_result() {
        let provider = FakeProvider::new().with_failure(r#"oracle:"draw a card""#);
        let (context, _) = context(provider);
        let params = SearchCardByTextParams {
            text: "draw a card".into(),
            limit: 20,
        };
        let result = context
            .run(move |discovery, scope| SearchCardByTextTool::execute(&params, discovery, scope))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).starts_with("Scryfall API error searching for text 'draw a card'"));
    }
}
