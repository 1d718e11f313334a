//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use super::context::ToolContext;
#[cfg(feature = "http")]
use super::error::ToolError;
use super::definitions::{
    FindCardSynergiesTool, FindRelatedCardsTool, SearchCardByColorTool, SearchCardByNameTool,
    SearchCardByTextTool,
};

/// Tool registry - manages all available tools.
///
/// This struct provides a central point for:
/// - Listing all available tools
/// - Dispatching HTTP tool calls (when http feature is enabled)
pub struct ToolRegistry {
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    context: Arc<ToolContext>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            SearchCardByNameTool::NAME,
            SearchCardByTextTool::NAME,
            SearchCardByColorTool::NAME,
            FindRelatedCardsTool::NAME,
            FindCardSynergiesTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            SearchCardByNameTool::to_tool(),
            SearchCardByTextTool::to_tool(),
            SearchCardByColorTool::to_tool(),
            FindRelatedCardsTool::to_tool(),
            FindCardSynergiesTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    ///
    /// This is used by the HTTP transport to call tools.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let context = self.context.clone();
        match name {
            SearchCardByNameTool::NAME => SearchCardByNameTool::http_handler(arguments, context).await,
            SearchCardByTextTool::NAME => SearchCardByTextTool::http_handler(arguments, context).await,
            SearchCardByColorTool::NAME => {
                SearchCardByColorTool::http_handler(arguments, context).await
            }
            FindRelatedCardsTool::NAME => FindRelatedCardsTool::http_handler(arguments, context).await,
            FindCardSynergiesTool::NAME => {
                FindCardSynergiesTool::http_handler(arguments, context).await
            }
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name).to_string())
            }
        }
    }
}
