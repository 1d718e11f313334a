//! Resources domain module.
//!
//! Resources expose read-only data to MCP clients: the reference datasets
//! driving theme and synergy discovery, and a server information document.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual resource definitions (one file per resource family)
//! - `registry.rs` - Central resource registration
//! - `service.rs` - Resource service for listing and reading
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file in `definitions/` (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `registry.rs`

pub mod definitions;
mod error;
mod registry;
mod service;

pub use definitions::ResourceDefinition;
pub use error::ResourceError;
pub use registry::{get_all_resource_templates, get_all_resources, resource_uris};
pub use service::{ResourceContent, ResourceEntry, ResourceService};
