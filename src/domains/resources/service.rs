//! Resource service implementation.
//!
//! The ResourceService manages resource discovery and access.
//! Resources are defined in `definitions/` and registered via `registry.rs`.
//! Reference datasets are rendered on read from the shared
//! [`ReferenceCache`], so a dataset that failed to load is served as its
//! built-in fallback.

use rmcp::model::{ReadResourceResult, Resource, ResourceContents, ResourceTemplate};
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::definitions::{ReferenceDataset, ServerInfoResource};
use super::error::ResourceError;
use super::registry::{get_all_resource_templates, get_all_resources};
use crate::core::config::Config;
use crate::domains::discovery::ReferenceCache;

/// Service for listing and reading resources.
pub struct ResourceService {
    config: Config,
    reference: &'static ReferenceCache,

    /// Key: resource URI.
    resources: BTreeMap<String, ResourceEntry>,

    templates: Vec<ResourceTemplate>,
}

/// An entry in the resource registry.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    /// The resource metadata.
    pub resource: Resource,

    /// The content provider for this resource.
    pub content: ResourceContent,
}

/// Content rendered when a resource is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceContent {
    /// Server and reference data summary.
    ServerInfo,

    /// One of the reference datasets.
    Reference(ReferenceDataset),
}

impl ResourceService {
    pub fn new(config: &Config, reference: &'static ReferenceCache) -> Self {
        info!("Initializing ResourceService");

        let mut service = Self {
            config: config.clone(),
            reference,
            resources: BTreeMap::new(),
            templates: get_all_resource_templates(),
        };

        for entry in get_all_resources() {
            service.register_resource(entry);
        }

        service
    }

    /// Register a resource, replacing any entry with the same URI.
    pub fn register_resource(&mut self, entry: ResourceEntry) {
        debug!("Registering resource: {}", entry.resource.raw.uri);
        self.resources
            .insert(entry.resource.raw.uri.to_string(), entry);
    }

    /// List all available resources, ordered by URI.
    pub async fn list_resources(&self) -> Vec<Resource> {
        self.resources
            .values()
            .map(|entry| entry.resource.clone())
            .collect()
    }

    pub async fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.templates.clone()
    }

    /// Read a resource by URI.
    ///
    /// URIs matching the reference template resolve even when they are not
    /// registered under that exact spelling.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let (content, mime_type) = match self.resources.get(uri) {
            Some(entry) => (entry.content, entry.resource.raw.mime_type.clone()),
            None => {
                let dataset =
                    ReferenceDataset::from_uri(uri).ok_or_else(|| ResourceError::not_found(uri))?;
                (
                    ResourceContent::Reference(dataset),
                    Some(dataset.mime_type().to_string()),
                )
            }
        };

        let text = self.render(content)?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type,
                text,
                meta: None,
            }],
        })
    }

    fn render(&self, content: ResourceContent) -> Result<String, ResourceError> {
        match content {
            ResourceContent::ServerInfo => {
                let info = ServerInfoResource::info(&self.config, self.reference);
                serde_json::to_string_pretty(&info)
                    .map_err(|e| ResourceError::internal(e.to_string()))
            }
            ResourceContent::Reference(dataset) => dataset.render(self.reference),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::discovery::ThemePatterns;
    use rmcp::model::{AnnotateAble, RawResource};

    fn service() -> ResourceService {
        let reference: &'static ReferenceCache = Box::leak(Box::new(ReferenceCache::with_data(
            vec!["Elf".into(), "Druid".into()],
            vec!["flying".into()],
            ThemePatterns::default(),
        )));
        ResourceService::new(&Config::default(), reference)
    }

    fn text_of(result: &ReadResourceResult) -> (&str, Option<&str>) {
        match &result.contents[0] {
            ResourceContents::TextResourceContents {
                text, mime_type, ..
            } => (text.as_str(), mime_type.as_deref()),
            other => panic!("unexpected contents: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_lists_all_resources() {
        let resources = service().list_resources().await;
        assert_eq!(resources.len(), 4);
        assert_eq!(service().list_resource_templates().await.len(), 1);
    }

    #[tokio::test]
    async fn test_read_creature_types() {
        let result = service()
            .read_resource("scryfall://reference/creature-types")
            .await
            .unwrap();
        assert_eq!(text_of(&result), ("Elf\nDruid", Some("text/plain")));
    }

    #[tokio::test]
    async fn test_read_theme_patterns_is_json() {
        let result = service()
            .read_resource("scryfall://reference/theme-patterns")
            .await
            .unwrap();
        let (text, mime) = text_of(&result);
        assert_eq!(mime, Some("application/json"));
        assert_eq!(text, "{}");
    }

    #[tokio::test]
    async fn test_read_server_info() {
        let result = service().read_resource("scryfall://server/info").await.unwrap();
        let info: serde_json::Value = serde_json::from_str(text_of(&result).0).unwrap();
        assert_eq!(info["reference"]["creatureTypes"], 2);
        assert_eq!(info["reference"]["keywordAbilities"], 1);
    }

    #[tokio::test]
    async fn test_registered_entry_replaces_content_by_uri() {
        let mut service = service();
        let mut raw = RawResource::new("scryfall://reference/creature-types", "Keywords");
        raw.mime_type = Some("text/plain".to_string());
        service.register_resource(ResourceEntry {
            resource: raw.no_annotation(),
            content: ResourceContent::Reference(ReferenceDataset::KeywordAbilities),
        });

        let result = service
            .read_resource("scryfall://reference/creature-types")
            .await
            .unwrap();
        assert_eq!(text_of(&result).0, "flying");
        assert_eq!(service.list_resources().await.len(), 4);
    }

    #[tokio::test]
    async fn test_read_nonexistent_resource() {
        let service = service();
        let err = service
            .read_resource("scryfall://reference/sets")
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::NotFound(ref uri) if uri == "scryfall://reference/sets"));
        assert!(service.read_resource("mcp://server/info").await.is_err());
    }
}
