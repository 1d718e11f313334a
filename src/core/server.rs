//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to domain-specific services.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! Each tool defines:
//! - Parameters struct (for rmcp)
//! - `execute()` method (core logic)
//! - `http_handler()` method (called via ToolRegistry for HTTP transport)
//!
//! The ToolRouter is built dynamically in `domains/tools/router.rs`.
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use crate::domains::discovery::{DiscoveryService, ReferenceCache, ReferenceSource};
use crate::domains::{
    resources::{ResourceError, ResourceService},
    tools::{ToolContext, build_tool_router},
};
use crate::scryfall::{CardProvider, ScryfallClient};

#[cfg(feature = "http")]
use crate::domains::tools::ToolRegistry;

pub(crate) const INSTRUCTIONS: &str = "Magic: The Gathering card search backed by Scryfall. \
Use search_card_by_name, search_card_by_text or search_card_by_color to look cards up, \
find_related_cards for reprints, tokens, shared mechanics, artist or set, and \
find_card_synergies for cards that fit the same keywords, themes, tribe or colors. \
Reference datasets are available as resources under scryfall://reference/.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and coordinates
/// between different domain services to handle MCP protocol messages.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Shared state for tool calls.
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    tool_context: Arc<ToolContext>,

    /// Service for handling resource-related requests.
    resource_service: Arc<ResourceService>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a server backed by the Scryfall API.
    ///
    /// Installs the process-wide reference cache from the configured data
    /// directory on first call.
    pub fn new(config: Config) -> Self {
        let provider = Arc::new(ScryfallClient::new(config.scryfall.clone()));
        let reference =
            ReferenceCache::install(ReferenceSource::from_dir(config.resources.data_dir.as_deref()));
        Self::with_provider(config, provider, reference)
    }

    /// Create a server with an explicit card provider and reference cache.
    pub fn with_provider(
        config: Config,
        provider: Arc<dyn CardProvider>,
        reference: &'static ReferenceCache,
    ) -> Self {
        let config = Arc::new(config);

        let discovery = DiscoveryService::new(provider, reference);
        let tool_context = Arc::new(ToolContext::new(discovery, &config));
        let resource_service = Arc::new(ResourceService::new(&config, reference));

        Self {
            tool_router: build_tool_router::<Self>(tool_context.clone()),
            config,
            tool_context,
            resource_service,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let registry = ToolRegistry::new(self.tool_context.clone());
        registry.call_tool(name, arguments).await
    }

    /// List all available resources (for HTTP transport).
    pub async fn list_resources(&self) -> Vec<serde_json::Value> {
        let resources = self.resource_service.list_resources().await;

        resources
            .into_iter()
            .map(|r| {
                serde_json::json!({
                    "uri": r.uri,
                    "name": r.name,
                    "description": r.description,
                    "mimeType": r.mime_type
                })
            })
            .collect()
    }

    /// Read a resource by URI (for HTTP transport).
    pub async fn read_resource(&self, uri: &str) -> Result<serde_json::Value, String> {
        match self.resource_service.read_resource(uri).await {
            Ok(result) => Ok(serde_json::json!({
                "contents": result.contents
            })),
            Err(e) => Err(e.to_string()),
        }
    }

    /// List all available resource templates (for HTTP transport).
    pub async fn list_resource_templates(&self) -> Vec<serde_json::Value> {
        let templates = self.resource_service.list_resource_templates().await;

        templates
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "uriTemplate": t.raw.uri_template,
                    "name": t.raw.name,
                    "title": t.raw.title,
                    "description": t.raw.description,
                    "mimeType": t.raw.mime_type
                })
            })
            .collect()
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        let resources = self.resource_service.list_resources().await;
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        info!("Listing resource templates");
        let templates = self.resource_service.list_resource_templates().await;
        Ok(ListResourceTemplatesResult {
            resource_templates: templates,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.resource_service
            .read_resource(&request.uri)
            .await
            .map_err(|e| match e {
                ResourceError::NotFound(_) => McpError::resource_not_found(e.to_string(), None),
                ResourceError::Internal(_) => McpError::internal_error(e.to_string(), None),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::discovery::testing::FakeProvider;
    use crate::domains::discovery::ThemePatterns;

    fn server() -> McpServer {
        let reference: &'static ReferenceCache = Box::leak(Box::new(ReferenceCache::with_data(
            vec!["Elf".into()],
            vec!["flying".into()],
            ThemePatterns::default(),
        )));
        McpServer::with_provider(Config::default(), Arc::new(FakeProvider::new()), reference)
    }

    #[test]
    fn test_server_info() {
        let server = server();
        let info = server.get_info();
        assert_eq!(info.server_info.name, "scryfall-card-search-server");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.prompts.is_none());
    }

    #[test]
    fn test_lists_card_tools() {
        let tools = server().list_tools();
        assert_eq!(tools.len(), 5);
        assert!(tools.iter().any(|t| t["name"] == "find_card_synergies"));
    }

    #[tokio::test]
    async fn test_lists_and_reads_resources() {
        let server = server();
        assert_eq!(server.list_resources().await.len(), 4);
        assert_eq!(server.list_resource_templates().await.len(), 1);

        let value = server
            .read_resource("scryfall://reference/creature-types")
            .await
            .unwrap();
        assert_eq!(value["contents"][0]["text"], "Elf");
        assert!(server.read_resource("scryfall://nowhere").await.is_err());
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_call_tool_over_registry() {
        let result = server()
            .call_tool("search_card_by_color", serde_json::json!({ "color": "r" }))
            .await
            .unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["structuredContent"]["totalCount"], 0);
    }
}
