//! Scryfall MCP Server Library
//!
//! A Model Context Protocol (MCP) server for Magic: The Gathering card
//! search and discovery backed by the Scryfall API.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server and transports
//! - **scryfall**: card model, query builders and the HTTP card provider
//! - **domains**: business logic organized by bounded contexts
//!   - **discovery**: theme extraction, related cards and synergy search
//!   - **tools**: MCP tools that can be executed by clients
//!   - **resources**: reference datasets that can be read by clients
//!
//! # Example
//!
//! ```rust,no_run
//! use scryfall_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;
pub mod scryfall;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
