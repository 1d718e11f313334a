//! Card search by color.

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

/// Parameters for a color search.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchCardByColorParams {
    /// Color codes such as `g`, `ub` or `wubrg`.
    #[schemars(description = "Color codes (w, u, b, r, g) or a color name, e.g. 'ub' or 'green'")]
    #[serde(default)]
    pub color: String,

    /// Maximum number of cards to return.
    #[schemars(description = "Maximum number of cards (default: 20, max: 175)")]
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Color search tool implementation.
#[derive(Debug, Clone, Default)]
pub struct SearchCardByColorTool;

impl SearchCardByColorTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "search_card_by_color";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Searches Scryfall for Magic: The Gathering cards of the given colors. Returns a summary plus structured card data (mana cost, type line, oracle text, set, prices, images).";

    /// Execute the tool logic.
    pub fn execute(
        params: &SearchCardByColorParams,
        discovery: &DiscoveryService,
        scope: &RequestScope,
    ) -> CallToolResult {
        info!("Card color search: {:?}", params.color);
        search_tool(discovery, scope, SearchKind::Color, &params.color, params.limit)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        context: Arc<ToolContext>,
    ) -> Result<serde_json::Value, String> {
        let params: SearchCardByColorParams = serde_json::from_value(arguments)
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
            input_schema: cached_schema_for_type::<SearchCardByColorParams>(),
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
                let params: SearchCardByColorParams =
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
