//! Shared state handed to every tool route.

use std::time::Duration;

use rmcp::model::CallToolResult;

use super::error::ToolError;
use crate::core::config::Config;
use crate::domains::discovery::DiscoveryService;
use crate::scryfall::RequestScope;

/// Discovery service plus per-invocation limits.
#[derive(Clone)]
pub struct ToolContext {
    discovery: DiscoveryService,
    timeout: Duration,
}

impl ToolContext {
    pub fn new(discovery: DiscoveryService, config: &Config) -> Self {
        Self {
            discovery,
            timeout: Duration::from_secs(config.tools.timeout_secs),
        }
    }

    pub fn discovery(&self) -> &DiscoveryService {
        &self.discovery
    }

    /// A fresh scope with the configured deadline.
    pub fn scope(&self) -> RequestScope {
        if self.timeout.is_zero() {
            RequestScope::unbounded()
        } else {
            RequestScope::with_timeout(self.timeout)
        }
    }

    /// Run a blocking tool body on the blocking pool.
    ///
    /// If the returned future is dropped before completion the scope is
    /// cancelled, so the worker stops issuing provider calls.
    pub async fn run<F>(&self, body: F) -> Result<CallToolResult, ToolError>
    where
        F: FnOnce(&DiscoveryService, &RequestScope) -> CallToolResult + Send + 'static,
    {
        let scope = self.scope();
        let guard = scope.cancel_on_drop();
        let discovery = self.discovery.clone();

        let result = tokio::task::spawn_blocking(move || body(&discovery, &scope)).await;
        guard.disarm();

        result.map_err(|e| ToolError::internal(format!("Task failed: {}", e)))
    }
}
