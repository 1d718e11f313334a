//! Server info resource definition.

use super::ResourceDefinition;
use crate::core::config::Config;
use crate::domains::discovery::{ReferenceCache, ReferenceSource};
use crate::domains::resources::service::ResourceContent;

/// Server information resource (dynamic).
pub struct ServerInfoResource;

impl ResourceDefinition for ServerInfoResource {
    const URI: &'static str = "scryfall://server/info";
    const NAME: &'static str = "Server Information";
    const DESCRIPTION: &'static str =
        "Server name and version, card provider endpoint and loaded reference data";
    const MIME_TYPE: &'static str = "application/json";

    fn content() -> ResourceContent {
        ResourceContent::ServerInfo
    }
}

impl ServerInfoResource {
    /// Current server information.
    pub fn info(config: &Config, reference: &ReferenceCache) -> serde_json::Value {
        let source = match reference.source() {
            ReferenceSource::Embedded => "embedded".to_string(),
            ReferenceSource::Directory(dir) => dir.display().to_string(),
        };

        serde_json::json!({
            "server": config.server.name,
            "version": config.server.version,
            "provider": config.scryfall.base_url,
            "reference": {
                "source": source,
                "creatureTypes": reference.creature_types().len(),
                "keywordAbilities": reference.keyword_abilities().len(),
                "themes": reference.theme_patterns().iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            },
        })
    }
}
