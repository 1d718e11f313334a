//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! This module builds the ToolRouter for STDIO/TCP transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own route.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::context::ToolContext;
use super::definitions::{
    FindCardSynergiesTool, FindRelatedCardsTool, SearchCardByColorTool, SearchCardByNameTool,
    SearchCardByTextTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(context: Arc<ToolContext>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(SearchCardByNameTool::create_route(context.clone()))
        .with_route(SearchCardByTextTool::create_route(context.clone()))
        .with_route(SearchCardByColorTool::create_route(context.clone()))
        .with_route(FindRelatedCardsTool::create_route(context.clone()))
        .with_route(FindCardSynergiesTool::create_route(context))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;
    use crate::domains::discovery::testing::FakeProvider;
    use crate::domains::tools::definitions::cards::testing;

    struct TestServer {}

    #[test]
    fn test_build_router() {
        let (context, _) = testing::context(FakeProvider::new());
        let router: ToolRouter<TestServer> = build_tool_router(context);
        let tools = router.list_all();
        assert_eq!(tools.len(), 5);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"search_card_by_name"));
        assert!(names.contains(&"search_card_by_text"));
        assert!(names.contains(&"search_card_by_color"));
        assert!(names.contains(&"find_related_cards"));
        assert!(names.contains(&"find_card_synergies"));
    }

    #[test]
    fn test_router_matches_registry() {
        let (context, _) = testing::context(FakeProvider::new());
        let router: ToolRouter<TestServer> = build_tool_router(context);
        let mut routed: Vec<String> = router.list_all().iter().map(|t| t.name.to_string()).collect();
        let mut registered: Vec<String> = ToolRegistry::get_all_tools()
            .iter()
            .map(|t| t.name.to_string())
            .collect();
        routed.sort();
        registered.sort();
        assert_eq!(routed, registered);
    }
}
